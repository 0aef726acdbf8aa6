mod container;
mod initial_condition;
mod render;
mod statistics;
mod util;
mod verlet;

extern crate nalgebra as na;

use crate::container::{Container, Cube, Sphere};
use crate::initial_condition::{Ring, Stream};
use crate::verlet::{FrameInput, VerletParameters, VerletSimulation};

use structopt::StructOpt;

type Scalar = f32;
type Vec3 = na::Vector3<Scalar>;

#[derive(Debug, Clone, Copy)]
enum ContainerShape {
    Cube,
    Sphere,
}

impl std::str::FromStr for ContainerShape {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cube" => Ok(ContainerShape::Cube),
            "sphere" => Ok(ContainerShape::Sphere),
            other => Err(eyre::eyre!("Unknown container shape: {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Layout {
    Ring,
    Stream,
}

impl std::str::FromStr for Layout {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ring" => Ok(Layout::Ring),
            "stream" => Ok(Layout::Stream),
            other => Err(eyre::eyre!("Unknown layout: {:?}", other)),
        }
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = "verlet_simulator")]
struct Opt {
    /// JSON file overriding the default simulation parameters.
    #[structopt(short, long)]
    config: Option<std::path::PathBuf>,
    /// Container shape: "cube" or "sphere".
    #[structopt(long, default_value = "cube")]
    container: ContainerShape,
    /// Initial particle layout: "ring" or "stream".
    #[structopt(long, default_value = "ring")]
    layout: Layout,
    /// Run this many frames headless (no window) and exit.
    #[structopt(short, long)]
    frames: Option<usize>,
    /// Directory to write headless frame snapshots into.
    #[structopt(short, long)]
    output_dir: Option<std::path::PathBuf>,
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = Opt::from_args();

    use eyre::WrapErr;

    let params: VerletParameters = match &opt.config {
        Some(path) => std::fs::read(path)
            .wrap_err_with(|| format!("Failed to read JSON settings file: {:?}", path))
            .and_then(|json| {
                serde_json::from_slice(&json).wrap_err("Serde failed to deserialize JSON.")
            })?,
        None => VerletParameters::default(),
    };

    tracing::info!(
        max_particles = params.max_particles,
        substeps = params.substeps,
        "starting simulation"
    );

    match opt.container {
        ContainerShape::Cube => {
            let cube = Cube {
                extent: params.container_extent,
            };
            run(&opt, params, cube)
        }
        ContainerShape::Sphere => {
            let sphere = Sphere {
                radius: params.container_extent,
            };
            run(&opt, params, sphere)
        }
    }
}

fn run<C: Container + 'static>(
    opt: &Opt,
    params: VerletParameters,
    container: C,
) -> eyre::Result<()> {
    let sim = match opt.layout {
        Layout::Ring => VerletSimulation::new(params, container, &Ring::default()),
        Layout::Stream => VerletSimulation::new(params, container, &Stream::default()),
    };

    match opt.frames {
        Some(frames) => run_headless(sim, frames, opt.output_dir.as_deref()),
        None => render::open_window(sim),
    }
}

/// Drives the simulation at the target frame time without a window, with the
/// growth trigger held, so the particle count ramps just like an interactive
/// session where `V` is held down.
fn run_headless<C: Container>(
    mut sim: VerletSimulation<C>,
    frames: usize,
    output_dir: Option<&std::path::Path>,
) -> eyre::Result<()> {
    let dt = 1. / sim.params.target_fps;
    let input = FrameInput {
        grow: true,
        ..FrameInput::default()
    };

    for frame in 0..frames {
        sim.step_frame(dt, &input);

        if frame % 60 == 0 {
            tracing::info!(
                frame,
                active = sim.active_count(),
                max_speed = sim.max_speed() as f64,
                mean_speed = sim.mean_speed() as f64,
                "headless frame"
            );
        }

        if let Some(dir) = output_dir {
            let verts = render::particle_verts(&sim);
            let mut path = dir.to_path_buf();
            path.push(format!("{:03}.dat", frame));
            let mut writer = std::fs::File::create(&path)?;
            rmp_serde::encode::write(&mut writer, &verts)?;
        }
    }

    Ok(())
}
