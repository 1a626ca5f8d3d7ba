use glam::{Mat4, Vec3};
use seascape_scene::CameraConfig;

use crate::renderer::{Controls, RenderView};

/// Keeps the polar angle off the poles so `look_at` stays well defined.
const POLE_EPSILON: f32 = 1e-4;

/// Orbit camera with damped rotation, modelled on three.js `OrbitControls`
/// with `enableDamping`.
///
/// Drag input accumulates into a pending angular delta. Each `update` applies
/// `damping` of that delta and keeps the rest, so the camera glides to a stop.
/// Damping is per update, not per second. Camera motion lives outside the
/// wave functions entirely: nothing flows from it into the scene.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    /// Azimuth around +y, measured from +z toward +x.
    pub theta: f32,
    /// Polar angle from +y.
    pub phi: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub damping: f32,
    /// Radians of orbit per pixel of drag.
    pub sensitivity: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let target = Vec3::from_array(config.target);
        let offset = Vec3::from_array(config.position) - target;
        let radius = offset.length().max(POLE_EPSILON);
        Self {
            target,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            fov: config.fov_degrees.to_radians(),
            aspect: 16.0 / 9.0,
            near: config.near,
            far: config.far,
            damping: config.damping,
            sensitivity: 0.005,
            min_radius: 0.2,
            max_radius: config.far * 0.5,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
        }
    }

    /// Queue an orbit from a pointer drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending_theta -= dx * self.sensitivity;
        self.pending_phi -= dy * self.sensitivity;
    }

    /// Queue a dolly from scroll input. Positive `steps` move closer.
    pub fn zoom(&mut self, steps: f32) {
        self.pending_scale *= 0.95_f32.powf(steps);
    }

    /// True while queued rotation is still being applied.
    pub fn is_moving(&self) -> bool {
        self.pending_theta.abs() > 1e-6 || self.pending_phi.abs() > 1e-6
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.target + Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * self.radius
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Controls for OrbitCamera {
    fn update(&mut self, _dt: f32) {
        self.theta += self.pending_theta * self.damping;
        self.phi = (self.phi + self.pending_phi * self.damping)
            .clamp(POLE_EPSILON, std::f32::consts::PI - POLE_EPSILON);
        self.pending_theta *= 1.0 - self.damping;
        self.pending_phi *= 1.0 - self.damping;

        self.radius = (self.radius * self.pending_scale).clamp(self.min_radius, self.max_radius);
        self.pending_scale = 1.0;
    }

    fn view(&self) -> RenderView {
        RenderView {
            view_proj: self.view_projection(),
            eye: self.eye(),
            target: self.target,
            fov_degrees: self.fov.to_degrees(),
        }
    }
}
