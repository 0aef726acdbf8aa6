use na::Point3;

/// Camera orbiting the container on its own, the way a turntable shot would.
/// User input only pulls the orbit radius in and out.
#[derive(Debug)]
pub struct Camera {
    pub radius: f32,
    pub height: f32,
    pub angle: f32,
    aspect: f32,
    fovy: f32,
    znear: f32,
    zfar: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            radius: 24.,
            height: 6.,
            angle: 0.,
            aspect: width as f32 / height as f32,
            fovy: 45.0_f32.to_radians(),
            znear: 0.1,
            zfar: 200.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn build_view_projection_matrix(&self) -> na::Matrix4<f32> {
        #[rustfmt::skip]
        pub const OPENGL_TO_WGPU_MATRIX: na::Matrix4<f32> = na::Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 0.5, 0.0,
            0.0, 0.0, 0.5, 1.0,
        );

        let eye = Point3::new(
            self.angle.cos() * self.radius,
            self.height,
            self.angle.sin() * self.radius,
        );
        let view = na::Matrix4::look_at_rh(&eye, &Point3::origin(), &na::Vector3::y());
        let proj = na::Matrix4::new_perspective(self.aspect, self.fovy, self.znear, self.zfar);

        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}

/// Advances the orbit every frame and applies dolly input from the keyboard.
pub struct CameraController {
    orbit_speed: f32,
    dolly: f32,
}

impl CameraController {
    pub fn new(orbit_speed: f32) -> Self {
        Self {
            orbit_speed,
            dolly: 0.,
        }
    }

    /// Returns whether the event was consumed.
    pub fn process_events(&mut self, input: &winit::event::KeyboardInput) -> bool {
        use winit::event::{ElementState, VirtualKeyCode};

        let held = match input.state {
            ElementState::Pressed => 1.,
            ElementState::Released => 0.,
        };

        match input.virtual_keycode {
            Some(VirtualKeyCode::W) => {
                self.dolly = -held;
                true
            }
            Some(VirtualKeyCode::S) => {
                self.dolly = held;
                true
            }
            _ => false,
        }
    }

    pub fn update_camera(&mut self, camera: &mut Camera, dt: f32) {
        camera.angle += self.orbit_speed * dt;
        camera.radius = (camera.radius + 8. * self.dolly * dt).max(2.);
    }
}
