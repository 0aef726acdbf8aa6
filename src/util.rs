use crate::{Scalar, Vec3};

pub trait VecExt {
    fn component_min(&self, other: &Self) -> Self;

    fn component_max(&self, other: &Self) -> Self;

    fn component_clamp(&self, min: &Self, max: &Self) -> Self;
}

impl VecExt for Vec3 {
    fn component_min(&self, other: &Self) -> Self {
        self.zip_map(other, Scalar::min)
    }

    fn component_max(&self, other: &Self) -> Self {
        self.zip_map(other, Scalar::max)
    }

    fn component_clamp(&self, min: &Self, max: &Self) -> Self {
        self.component_max(min).component_min(max)
    }
}
