use crate::container::Container;
use crate::verlet::{FrameInput, VerletSimulation};
use crate::{Scalar, Vec3};

use futures::executor::block_on;
use std::time::{Duration, Instant};
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

mod camera;
mod scene;
mod state;

pub use camera::{Camera, CameraController};
pub use scene::{Scene, Vertex};
pub use state::State;

/// How far the container moves per frame while an arrow key is held.
const CONTAINER_SPEED: Scalar = 0.05;

/// Builds this frame's vertices from the simulation's flat position and
/// speed snapshots. Faster particles are tinted toward white.
pub fn particle_verts<C: Container>(sim: &VerletSimulation<C>) -> Vec<Vertex> {
    sim.positions()
        .iter()
        .zip(sim.speeds())
        .map(|(pos, speed)| Vertex {
            position: [pos.x, pos.y, pos.z],
            color: [speed, 0.5 * speed + 0.5, 1.],
        })
        .collect()
}

/// Like [`particle_verts`], but covering every pre-seeded slot, so the
/// vertex buffer can be allocated at full capacity once.
fn capacity_verts<C: Container>(sim: &VerletSimulation<C>) -> Vec<Vertex> {
    sim.particles
        .current
        .iter()
        .map(|pos| Vertex {
            position: [pos.x, pos.y, pos.z],
            color: [0., 0.5, 1.],
        })
        .collect()
}

/// Keys held down this frame, folded into a [`FrameInput`] once per frame.
#[derive(Debug, Default)]
struct InputState {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    burst: bool,
    grow: bool,
}

impl InputState {
    /// Returns whether the event was consumed.
    fn process_events(&mut self, input: &KeyboardInput) -> bool {
        let held = input.state == ElementState::Pressed;

        match input.virtual_keycode {
            Some(VirtualKeyCode::Left) => self.left = held,
            Some(VirtualKeyCode::Right) => self.right = held,
            Some(VirtualKeyCode::Up) => self.up = held,
            Some(VirtualKeyCode::Down) => self.down = held,
            Some(VirtualKeyCode::G) => self.burst = held,
            Some(VirtualKeyCode::V) => self.grow = held,
            _ => return false,
        }

        true
    }

    fn frame_input(&self) -> FrameInput {
        let mut delta = Vec3::zeros();
        if self.left {
            delta.x -= CONTAINER_SPEED;
        }
        if self.right {
            delta.x += CONTAINER_SPEED;
        }
        if self.down {
            delta.y -= CONTAINER_SPEED;
        }
        if self.up {
            delta.y += CONTAINER_SPEED;
        }

        FrameInput {
            container_delta: delta,
            burst: self.burst,
            grow: self.grow,
        }
    }
}

/// Runs the simulation inside a window until the user closes it.
///
/// Everything happens on this one thread: input, the sub-stepped physics
/// frame, buffer upload, and the draw. The loop spin-waits up to the target
/// frame duration rather than sleeping, so the frame cadence stays tight.
pub fn open_window<C: Container + 'static>(mut sim: VerletSimulation<C>) -> ! {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Verlet Integration")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .build(&event_loop)
        .expect("Failed to create window");

    let mut state = block_on(State::new(&window));

    let initial_verts = capacity_verts(&sim);
    let mut scene = Scene::new(
        &state.device,
        &initial_verts,
        (state.size.width, state.size.height),
    );

    let mut input = InputState::default();
    let target_frame = Duration::from_secs_f64(1. / sim.params.target_fps as f64);
    let mut last_frame = Instant::now();
    let mut title_timer = Instant::now();

    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent {
            ref event,
            window_id,
        } if window_id == window.id() => match event {
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
            WindowEvent::KeyboardInput { input: key, .. } => {
                if key.virtual_keycode == Some(VirtualKeyCode::Escape) {
                    *control_flow = ControlFlow::Exit;
                } else if !input.process_events(key) {
                    scene.camera_controller.process_events(key);
                }
            }
            WindowEvent::Resized(physical_size) => {
                state.resize(*physical_size);
                scene.camera.resize(physical_size.width, physical_size.height);
            }
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                // new_inner_size is &&mut so we have to dereference it twice
                state.resize(**new_inner_size);
                scene
                    .camera
                    .resize(new_inner_size.width, new_inner_size.height);
            }
            _ => {}
        },
        Event::RedrawRequested(_) => {
            // Frame-rate floor: busy-wait out the remainder of the frame.
            while last_frame.elapsed() < target_frame {
                std::hint::spin_loop();
            }
            let dt: Scalar = last_frame.elapsed().as_secs_f32();
            last_frame = Instant::now();

            sim.step_frame(dt, &input.frame_input());
            scene.camera_controller.update_camera(&mut scene.camera, dt);

            let verts = particle_verts(&sim);
            scene.num_particles = verts.len() as u32;
            state.update(&mut scene, &verts);

            if title_timer.elapsed() >= Duration::from_secs(1) {
                window.set_title(&format!(
                    "FPS : {:<4.0} | Balls : {:<10}",
                    1. / dt,
                    sim.active_count()
                ));
                title_timer = Instant::now();
            }

            match state.render(&scene) {
                Ok(_) => {}
                // Recreate the swap_chain if lost
                Err(wgpu::SwapChainError::Lost) => state.resize(state.size),
                // The system is out of memory, we should probably quit
                Err(wgpu::SwapChainError::OutOfMemory) => *control_flow = ControlFlow::Exit,
                // All other errors (Outdated, Timeout) should be resolved by the next frame
                Err(e) => tracing::warn!("render error: {:?}", e),
            }
        }
        Event::MainEventsCleared => {
            // RedrawRequested only fires once unless we keep asking for it.
            window.request_redraw();
        }
        _ => {}
    })
}
