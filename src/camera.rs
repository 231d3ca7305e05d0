//! Camera types, controllers and uniforms for view/projection.
//!
//! [`Camera`] is a free camera described by position, yaw and pitch;
//! [`Projection`] produces the perspective matrix (with the OpenGL-to-WGPU
//! depth-range correction). Two controllers are provided: a free-look
//! [`CameraController`] driven by keyboard/mouse input and a smoothed
//! [`FollowCamera`] that tracks a target from behind.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use cgmath::{
    EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3, Vector4, perspective,
};
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::data_structures::bounds::{Frustum, Ray};

/// WGPU clip-space depth runs in [0, 1] while cgmath's `perspective` emits
/// the OpenGL [-1, 1] range; this matrix remaps it.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// A free camera: position plus yaw/pitch angles.
#[derive(Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    /// View frustum for the current pose, used for conservative culling.
    pub fn frustum(&self, projection: &Projection) -> Frustum {
        Frustum::from_matrix(&(projection.calc_matrix() * self.calc_matrix()))
    }

    /// Ray through a point in normalized device coordinates (both axes in
    /// [-1, 1], y up), e.g. an unprojected mouse position for picking.
    pub fn ray_through_ndc(&self, ndc_x: f32, ndc_y: f32, projection: &Projection) -> Option<Ray> {
        let view_proj = projection.calc_matrix() * self.calc_matrix();
        let inverse = view_proj.invert()?;
        let near = inverse * Vector4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inverse * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near.w.abs() < f32::EPSILON || far.w.abs() < f32::EPSILON {
            return None;
        }
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Some(Ray::new(near, (far - near).normalize()))
    }
}

/// Perspective projection parameters.
#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// The camera data as laid out for the shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Free-look controller: WASD/space/shift for movement, mouse for look,
/// wheel for zoom-style dolly.
#[derive(Debug)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,
    rotate_horizontal: f32,
    rotate_vertical: f32,
    scroll: f32,
    speed: f32,
    sensitivity: f32,
}

impl CameraController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            scroll: 0.0,
            speed,
            sensitivity,
        }
    }

    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state == ElementState::Pressed {
            1.0
        } else {
            0.0
        };
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => {
                self.amount_forward = amount;
                true
            }
            KeyCode::KeyS | KeyCode::ArrowDown => {
                self.amount_backward = amount;
                true
            }
            KeyCode::KeyA | KeyCode::ArrowLeft => {
                self.amount_left = amount;
                true
            }
            KeyCode::KeyD | KeyCode::ArrowRight => {
                self.amount_right = amount;
                true
            }
            KeyCode::Space => {
                self.amount_up = amount;
                true
            }
            KeyCode::ShiftLeft => {
                self.amount_down = amount;
                true
            }
            _ => false,
        }
    }

    pub fn handle_mouse(&mut self, mouse_dx: f64, mouse_dy: f64) {
        self.rotate_horizontal = mouse_dx as f32;
        self.rotate_vertical = mouse_dy as f32;
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.process_keyboard(code, event.state);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll = match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => -scroll * 0.5,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
            }
            _ => (),
        }
    }

    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        // Move forward/backward and left/right on the horizontal plane
        let (yaw_sin, yaw_cos) = camera.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        camera.position += forward * (self.amount_forward - self.amount_backward) * self.speed * dt;
        camera.position += right * (self.amount_right - self.amount_left) * self.speed * dt;

        // Dolly along the full look direction on scroll
        let (pitch_sin, pitch_cos) = camera.pitch.0.sin_cos();
        let scrollward =
            Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize();
        camera.position -= scrollward * self.scroll * self.speed * self.sensitivity * dt;
        self.scroll = 0.0;

        camera.position.y += (self.amount_up - self.amount_down) * self.speed * dt;

        camera.yaw += Rad(self.rotate_horizontal) * self.sensitivity * dt;
        camera.pitch += Rad(-self.rotate_vertical) * self.sensitivity * dt;

        // Mouse deltas only apply for the frame they arrived in
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;

        // Keep the camera from flipping over the poles
        if camera.pitch < -Rad(SAFE_FRAC_PI_2) {
            camera.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if camera.pitch > Rad(SAFE_FRAC_PI_2) {
            camera.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}

/// Camera-follow behavior: keeps the camera at a configured distance and
/// height behind a moving target, smoothing the chase exponentially so fast
/// target motion doesn't snap the view.
#[derive(Debug)]
pub struct FollowCamera {
    pub distance: f32,
    pub height: f32,
    /// Higher values converge faster; the blend factor per update is
    /// `1 - exp(-stiffness * dt)`.
    pub stiffness: f32,
}

impl FollowCamera {
    pub fn new(distance: f32, height: f32, stiffness: f32) -> Self {
        Self {
            distance,
            height,
            stiffness,
        }
    }

    pub fn update(&self, camera: &mut Camera, target: Point3<f32>, dt: Duration) {
        // Keep the current horizontal direction from target to camera so the
        // follow orbit is stable; fall back to -Z when degenerate.
        let mut to_camera = camera.position - target;
        to_camera.y = 0.0;
        let dir = if to_camera.magnitude2() < 1e-6 {
            -Vector3::unit_z()
        } else {
            to_camera.normalize()
        };
        let desired = target + dir * self.distance + Vector3::unit_y() * self.height;

        let blend = 1.0 - (-self.stiffness * dt.as_secs_f32()).exp();
        camera.position += (desired - camera.position) * blend;

        // Aim at the target
        let look = target - camera.position;
        if look.magnitude2() > 1e-6 {
            let look_n = look.normalize();
            camera.yaw = Rad(look_n.z.atan2(look_n.x));
            camera.pitch = Rad(look_n.y.asin().clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));
        }
    }
}

/// Camera GPU resources bundled with the camera state.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}
