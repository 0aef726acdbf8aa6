//! Position-based dynamics for colliding spheres in a moving container.
//!
//! Velocity is never stored; it is always the difference between a particle's
//! position and its position one sub-step prior (Verlet integration). Each
//! rendered frame is split into several fixed sub-steps, which keeps the
//! pairwise collision resolution stable even when the frame time jitters.

pub(crate) mod grid;
pub(crate) mod particles;

pub use particles::VerletParticles;

use grid::SpatialGrid;

use crate::container::Container;
use crate::initial_condition::InitialCondition;
use crate::{Scalar, Vec3};
use serde::{Deserialize, Serialize};

/// Everything the windowing layer hands the simulation once per frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Displacement applied to the container this frame.
    pub container_delta: Vec3,
    /// While held, `burst_acceleration` is added to every active particle.
    pub burst: bool,
    /// While held, more pre-seeded particles activate each frame, as long as
    /// the frame rate holds up.
    pub grow: bool,
}

impl Default for FrameInput {
    fn default() -> Self {
        FrameInput {
            container_delta: Vec3::zeros(),
            burst: false,
            grow: false,
        }
    }
}

pub struct VerletSimulation<C> {
    pub particles: VerletParticles,
    pub grid: SpatialGrid,
    pub container: C,
    pub container_position: Vec3,
    pub params: VerletParameters,
}

impl<C: Container> VerletSimulation<C> {
    pub fn new(params: VerletParameters, container: C, layout: &dyn InitialCondition) -> Self {
        let mut particles =
            VerletParticles::with_capacity(params.max_particles, params.particle_radius);
        layout.place(&mut particles);

        VerletSimulation {
            // One diameter per cell, so a collision never spans more than one
            // cell boundary and the 27-cell stencil finds every pair.
            grid: SpatialGrid::new(2. * params.particle_radius),
            particles,
            container,
            container_position: Vec3::zeros(),
            params,
        }
    }

    /// Advances the simulation by one rendered frame of duration `dt`.
    pub fn step_frame(&mut self, dt: Scalar, input: &FrameInput) {
        self.container_position += input.container_delta;

        if input.grow && 1. / dt >= self.params.target_fps - 5. {
            let active = self.particles.activate(self.params.addition_speed);
            tracing::debug!(active, "activated particles");
        }

        let dt_sub = dt / self.params.substeps as Scalar;
        for _ in 0..self.params.substeps {
            // Order matters: constraints run after collisions so a collision
            // push cannot leave the container, and integration runs last so
            // the position delta reflects every correction this sub-step.
            apply_forces(self, input.burst);
            resolve_collisions(self);
            apply_constraints(self);
            integrate(self, dt_sub);
        }
    }

    /// Positions of the active particles, in activation order.
    pub fn positions(&self) -> &[Vec3] {
        &self.particles.current[..self.particles.active()]
    }

    /// Scalar speeds indexed identically to [`Self::positions`].
    pub fn speeds(&self) -> impl Iterator<Item = Scalar> + '_ {
        (0..self.particles.active())
            .map(move |i| self.particles.velocity(i).magnitude() * self.params.speed_scale)
    }
}

fn apply_forces<C: Container>(s: &mut VerletSimulation<C>, burst: bool) {
    s.particles.reset_accelerations();
    s.particles.add_acceleration(s.params.gravity);

    if burst {
        s.particles.add_acceleration(s.params.burst_acceleration);
    }
}

fn resolve_collisions<C: Container>(s: &mut VerletSimulation<C>) {
    let VerletSimulation {
        particles, grid, ..
    } = s;

    let active = particles.active();
    grid.rebuild(&particles.current[..active]);

    for i in 0..active {
        let coord = grid.position_to_coord(particles.current[i]);
        for j in grid.neighbors(coord) {
            // Each unordered pair is resolved exactly once.
            if j <= i {
                continue;
            }

            let axis = particles.current[i] - particles.current[j];
            let combined = particles.radius[i] + particles.radius[j];
            let dist2 = axis.magnitude_squared();
            if dist2 >= combined * combined {
                continue;
            }

            let dist = dist2.sqrt();
            // Coincident centers leave no separation axis to push along.
            let normal = if dist > 1e-6 { axis / dist } else { Vec3::x() };

            // Half the penetration each, which keeps the pair's combined
            // center of mass fixed.
            let correction = 0.5 * (combined - dist) * normal;
            particles.current[i] += correction;
            particles.current[j] -= correction;
        }
    }
}

fn apply_constraints<C: Container>(s: &mut VerletSimulation<C>) {
    let VerletSimulation {
        particles,
        container,
        container_position,
        ..
    } = s;

    for i in 0..particles.active() {
        // Only `current` is overwritten; `previous` keeps its value, so the
        // velocity component into the wall dissipates at the next step.
        particles.current[i] =
            container.constrain(*container_position, particles.current[i], particles.radius[i]);
    }
}

fn integrate<C: Container>(s: &mut VerletSimulation<C>, dt_sub: Scalar) {
    let particles = &mut s.particles;

    for i in 0..particles.active() {
        let velocity = particles.velocity(i);
        let next =
            particles.current[i] + velocity + particles.acceleration[i] * (dt_sub * dt_sub);

        particles.previous[i] = particles.current[i];
        particles.current[i] = next;
    }
}

/// High-level parameters for the simulation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VerletParameters {
    /// Fixed particle capacity; the store never grows past this.
    pub max_particles: usize,
    /// Sub-steps per rendered frame. More sub-steps are slower but keep fast
    /// particles from tunneling through walls.
    pub substeps: usize,
    /// Radius shared by every particle.
    pub particle_radius: Scalar,
    /// Half-extent of a cube container, or radius of a sphere container.
    pub container_extent: Scalar,
    /// Gravitational acceleration.
    pub gravity: Vec3,
    /// Acceleration added to every active particle while the burst trigger
    /// is held.
    pub burst_acceleration: Vec3,
    /// Particles activated per frame while the growth trigger is held.
    pub addition_speed: usize,
    /// Frame rate the frame loop tries to hold; growth pauses whenever the
    /// measured rate drops more than 5 fps below it.
    pub target_fps: Scalar,
    /// Scale applied to the per-sub-step displacement when reporting speeds
    /// to the render layer.
    pub speed_scale: Scalar,
}

impl Default for VerletParameters {
    fn default() -> Self {
        VerletParameters {
            max_particles: 20_000,
            substeps: 8,
            particle_radius: 0.15,
            container_extent: 8.,
            gravity: Vec3::new(0., -9.81, 0.),
            burst_acceleration: Vec3::new(0., 240., 0.),
            addition_speed: 10,
            target_fps: 60.,
            speed_scale: 10.,
        }
    }
}
