use crate::verlet::VerletParticles;
use crate::{Scalar, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Seeds every slot of a particle store with its starting `current`/`previous`
/// pair. The tiny offset between the two is what gives the particles their
/// initial velocity.
pub trait InitialCondition {
    fn place(&self, particles: &mut VerletParticles);
}

/// Particles arranged on a horizontal ring, drifting slowly outward.
pub struct Ring {
    pub radius: Scalar,
    /// `previous` is `current` scaled by this in x/z, which seeds a small
    /// radial velocity.
    pub velocity_bias: Scalar,
}

impl Default for Ring {
    fn default() -> Self {
        Ring {
            radius: 7.,
            velocity_bias: 0.999,
        }
    }
}

impl InitialCondition for Ring {
    fn place(&self, particles: &mut VerletParticles) {
        // Seeded so every run produces the same layout.
        let mut rng = StdRng::from_seed([0; 32]);

        for i in 0..particles.capacity() {
            let (sin, cos) = (i as Scalar).sin_cos();
            let x = sin * self.radius;
            let z = cos * self.radius;
            let y = rng.gen_range(1..=2) as Scalar;

            particles.current[i] = Vec3::new(x, y, z);
            particles.previous[i] =
                Vec3::new(x * self.velocity_bias, y, z * self.velocity_bias);
            particles.acceleration[i] = Vec3::zeros();
        }
    }
}

/// Particles emitted from a short horizontal line, all moving the same way.
pub struct Stream {
    pub spread: Scalar,
    pub velocity_bias: Vec3,
}

impl Default for Stream {
    fn default() -> Self {
        Stream {
            spread: 7.,
            velocity_bias: Vec3::new(1.005, 1.002, 1.005),
        }
    }
}

impl InitialCondition for Stream {
    fn place(&self, particles: &mut VerletParticles) {
        for i in 0..particles.capacity() {
            let x = (i % self.spread as usize) as Scalar - self.spread / 2.;
            let current = Vec3::new(x, -2., -4.);

            particles.current[i] = current;
            particles.previous[i] = current.component_mul(&self.velocity_bias);
            particles.acceleration[i] = Vec3::zeros();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_is_deterministic() {
        let mut a = VerletParticles::with_capacity(64, 0.15);
        let mut b = VerletParticles::with_capacity(64, 0.15);
        Ring::default().place(&mut a);
        Ring::default().place(&mut b);

        assert_eq!(a.current, b.current);
        assert_eq!(a.previous, b.previous);
    }

    #[test]
    fn ring_heights_and_radius() {
        let ring = Ring::default();
        let mut particles = VerletParticles::with_capacity(128, 0.15);
        ring.place(&mut particles);

        for i in 0..particles.capacity() {
            let pos = particles.current[i];
            assert!(pos.y == 1. || pos.y == 2.);

            let planar = (pos.x * pos.x + pos.z * pos.z).sqrt();
            assert!((planar - ring.radius).abs() < 1e-4);

            // The seeded velocity points outward, never up or down.
            let velocity = pos - particles.previous[i];
            assert_eq!(velocity.y, 0.);
            assert!(velocity.dot(&Vec3::new(pos.x, 0., pos.z)) > 0.);
        }
    }

    #[test]
    fn stream_stays_within_spread() {
        let stream = Stream::default();
        let mut particles = VerletParticles::with_capacity(64, 0.15);
        stream.place(&mut particles);

        for pos in &particles.current {
            assert!(pos.x.abs() <= stream.spread / 2.);
            assert_eq!(pos.y, -2.);
            assert_eq!(pos.z, -4.);
        }
    }
}
