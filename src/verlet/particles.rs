use crate::{Scalar, Vec3};

/// Fixed-capacity storage for all particle state: positions, the positions
/// one sub-step prior, and per-sub-step force accumulators.
///
/// Only the first `active` entries participate in physics. The remainder are
/// pre-seeded and inert until activated; activation never shrinks and never
/// exceeds capacity.
pub struct VerletParticles {
    pub current: Vec<Vec3>,
    pub previous: Vec<Vec3>,
    pub acceleration: Vec<Vec3>,
    pub radius: Vec<Scalar>,
    active: usize,
}

impl VerletParticles {
    /// Allocates every slot up front; no allocation happens after this.
    pub fn with_capacity(capacity: usize, radius: Scalar) -> Self {
        VerletParticles {
            current: vec![Vec3::zeros(); capacity],
            previous: vec![Vec3::zeros(); capacity],
            acceleration: vec![Vec3::zeros(); capacity],
            radius: vec![radius; capacity],
            active: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.current.len()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Exposes `count` more pre-seeded particles to the simulation, clamped
    /// to capacity. Returns the new active count.
    pub fn activate(&mut self, count: usize) -> usize {
        self.active = usize::min(self.active + count, self.capacity());
        self.active
    }

    /// Implicit velocity of particle `i`: the displacement over the last
    /// sub-step. No explicit velocity is ever stored.
    pub fn velocity(&self, i: usize) -> Vec3 {
        self.current[i] - self.previous[i]
    }

    pub fn reset_accelerations(&mut self) {
        for a in &mut self.acceleration[..self.active] {
            *a = Vec3::zeros();
        }
    }

    /// Adds `accel` to every active particle. Calls within one sub-step are
    /// cumulative.
    pub fn add_acceleration(&mut self, accel: Vec3) {
        for a in &mut self.acceleration[..self.active] {
            *a += accel;
        }
    }
}
