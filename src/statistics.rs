use crate::container::Container;
use crate::verlet::VerletSimulation;
use crate::Scalar;

/// Per-frame diagnostics, cheap enough to compute every time the window
/// title or the headless log wants them.
impl<C: Container> VerletSimulation<C> {
    pub fn active_count(&self) -> usize {
        self.particles.active()
    }

    /// Largest reported speed among the active particles.
    pub fn max_speed(&self) -> Scalar {
        self.speeds().fold(0., Scalar::max)
    }

    pub fn mean_speed(&self) -> Scalar {
        let active = self.particles.active();
        if active == 0 {
            return 0.;
        }

        self.speeds().sum::<Scalar>() / active as Scalar
    }
}
