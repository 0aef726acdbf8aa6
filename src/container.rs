use crate::util::VecExt;
use crate::{Scalar, Vec3};

/// A movable bounding volume that particles may never leave.
///
/// The volume itself only stores its extent; its center is supplied per call,
/// since the container is pushed around by user input every frame.
pub trait Container {
    /// Project the center `x` of a sphere with the given `radius` back inside
    /// the volume centered at `center`. Positions already inside are returned
    /// unchanged.
    fn constrain(&self, center: Vec3, x: Vec3, radius: Scalar) -> Vec3;

    /// Whether a sphere at `x` lies fully inside the volume, within `tol`.
    fn contains(&self, center: Vec3, x: Vec3, radius: Scalar, tol: Scalar) -> bool;
}

/// An axis-aligned cube with the given half-extent.
pub struct Cube {
    pub extent: Scalar,
}

impl Container for Cube {
    fn constrain(&self, center: Vec3, x: Vec3, radius: Scalar) -> Vec3 {
        let inner = Vec3::from_element(self.extent - radius);
        x.component_clamp(&(center - inner), &(center + inner))
    }

    fn contains(&self, center: Vec3, x: Vec3, radius: Scalar, tol: Scalar) -> bool {
        let offset = x - center;
        offset.amax() <= self.extent - radius + tol
    }
}

/// A sphere with the given radius.
pub struct Sphere {
    pub radius: Scalar,
}

impl Container for Sphere {
    fn constrain(&self, center: Vec3, x: Vec3, radius: Scalar) -> Vec3 {
        let inner = self.radius - radius;
        let offset = x - center;
        let dist = offset.magnitude();

        if dist > inner {
            center + offset * (inner / dist)
        } else {
            x
        }
    }

    fn contains(&self, center: Vec3, x: Vec3, radius: Scalar, tol: Scalar) -> bool {
        (x - center).magnitude() <= self.radius - radius + tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: Scalar = 0.5;

    #[test]
    fn cube_clamps_each_axis_independently() {
        let cube = Cube { extent: 2. };
        let center = Vec3::new(1., 0., 0.);

        let clamped = cube.constrain(center, Vec3::new(5., 0.5, -4.), RADIUS);
        assert_eq!(clamped, Vec3::new(2.5, 0.5, -1.5));
        assert!(cube.contains(center, clamped, RADIUS, 1e-6));
    }

    #[test]
    fn cube_leaves_interior_points_alone() {
        let cube = Cube { extent: 2. };
        let x = Vec3::new(0.3, -1.2, 1.4);
        assert_eq!(cube.constrain(Vec3::zeros(), x, RADIUS), x);
    }

    #[test]
    fn sphere_projects_radially() {
        let sphere = Sphere { radius: 3. };
        let center = Vec3::new(0., 1., 0.);

        let clamped = sphere.constrain(center, Vec3::new(10., 1., 0.), RADIUS);
        let dist = (clamped - center).magnitude();
        assert!((dist - (sphere.radius - RADIUS)).abs() < 1e-5);

        // Direction from the center is preserved.
        assert!((clamped - center).normalize().x > 0.999);
    }

    #[test]
    fn sphere_leaves_interior_points_alone() {
        let sphere = Sphere { radius: 3. };
        let x = Vec3::new(0.5, 0.5, -0.5);
        assert_eq!(sphere.constrain(Vec3::zeros(), x, RADIUS), x);
        assert!(sphere.contains(Vec3::zeros(), x, RADIUS, 1e-6));
    }
}
