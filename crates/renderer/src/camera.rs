//! Orbit camera circling the tree.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// The scene is drawn with its root lowered by this offset so the tree sits
/// in frame around the orbit target.
pub const SCENE_ROOT: Vec3 = Vec3::new(0.0, -5.0, 0.0);

pub const MIN_DISTANCE: f32 = 20.0;
pub const MAX_DISTANCE: f32 = 70.0;
pub const MIN_POLAR: f32 = 0.01;
pub const MAX_POLAR: f32 = PI / 1.8;

/// Auto-rotate speed factor; one unit is a full turn per minute.
pub const AUTO_ROTATE_SPEED: f32 = 0.8;

/// Per scroll line the distance shrinks by this factor.
const ZOOM_STEP: f32 = 0.95;

/// Orbit camera: spherical coordinates around a fixed target.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    distance: f32,
    /// Angle from +Y, radians.
    polar: f32,
    /// Angle around Y measured from +Z, radians.
    azimuth: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_from(Vec3::new(0.0, 5.0, 45.0))
    }
}

impl OrbitCamera {
    /// Place the camera at `eye` looking at the origin. Limits still apply.
    pub fn looking_from(eye: Vec3) -> Self {
        let mut camera = Self {
            target: Vec3::ZERO,
            fov_degrees: 35.0,
            near: 0.1,
            far: 500.0,
            aspect: 16.0 / 9.0,
            distance: MIN_DISTANCE,
            polar: PI / 2.0,
            azimuth: 0.0,
        };
        let offset = eye - camera.target;
        let distance = offset.length();
        if distance > f32::EPSILON {
            camera.distance = distance;
            camera.polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
            camera.azimuth = offset.x.atan2(offset.z);
        }
        camera.clamp();
        camera
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Drag in pixels; a drag the full viewport height turns a full circle.
    pub fn orbit(&mut self, drag: Vec2, viewport_height: u32) {
        let per_pixel = TAU / viewport_height.max(1) as f32;
        self.azimuth -= drag.x * per_pixel;
        self.polar -= drag.y * per_pixel;
        self.clamp();
    }

    /// Positive lines move closer.
    pub fn zoom(&mut self, lines: f32) {
        if lines.is_finite() {
            self.distance *= ZOOM_STEP.powf(lines);
            self.clamp();
        }
    }

    /// Advance auto-rotation.
    pub fn update(&mut self, delta_time: f32, auto_rotate: bool) {
        if auto_rotate && delta_time > 0.0 {
            self.azimuth -= TAU / 60.0 * AUTO_ROTATE_SPEED * delta_time;
        }
        self.azimuth = self.azimuth.rem_euclid(TAU);
    }

    fn clamp(&mut self) {
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.polar = self.polar.clamp(MIN_POLAR, MAX_POLAR);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.target
            + self.distance * Vec3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth)
    }

    /// View matrix, with the scene root offset folded in.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y) * Mat4::from_translation(SCENE_ROOT)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Camera position in scene space, where instance positions live.
    pub fn scene_position(&self) -> Vec3 {
        self.position() - SCENE_ROOT
    }
}

/// Camera uniform for shaders.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = camera position in scene space, w unused
    pub position: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }

    pub fn update(&mut self, camera: &OrbitCamera) {
        self.view_proj = camera.view_projection_matrix().to_cols_array_2d();
        self.position = camera.scene_position().extend(1.0).to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_the_framing_shot() {
        let camera = OrbitCamera::default();
        assert!((camera.position() - Vec3::new(0.0, 5.0, 45.0)).length() < 1e-3);
        assert!(camera.distance() > MIN_DISTANCE && camera.distance() < MAX_DISTANCE);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom(1000.0);
        assert_eq!(camera.distance(), MIN_DISTANCE);
        camera.zoom(-1000.0);
        assert_eq!(camera.distance(), MAX_DISTANCE);
        camera.zoom(f32::NAN);
        assert_eq!(camera.distance(), MAX_DISTANCE);
    }

    #[test]
    fn cannot_orbit_below_the_limit() {
        let mut camera = OrbitCamera::default();
        camera.orbit(Vec2::new(0.0, -10_000.0), 720);
        assert_eq!(camera.polar(), MAX_POLAR);
        camera.orbit(Vec2::new(0.0, 10_000.0), 720);
        assert_eq!(camera.polar(), MIN_POLAR);
        assert!(camera.position().is_finite());
    }

    #[test]
    fn horizontal_drag_turns_around_the_target() {
        let mut camera = OrbitCamera::default();
        let before = camera.position();
        camera.orbit(Vec2::new(360.0, 0.0), 720);
        let after = camera.position();
        // Half the viewport height is half a turn
        assert!((after.x + before.x).abs() < 1e-3);
        assert!((after.z + before.z).abs() < 1e-3);
        assert!((after.y - before.y).abs() < 1e-3);
    }

    #[test]
    fn auto_rotate_only_when_asked() {
        let mut camera = OrbitCamera::default();
        let start = camera.azimuth();
        camera.update(1.0, false);
        assert_eq!(camera.azimuth(), start);

        camera.update(60.0 / AUTO_ROTATE_SPEED, true);
        // A full turn
        let diff = (camera.azimuth() - start).rem_euclid(TAU);
        assert!(diff < 1e-3 || TAU - diff < 1e-3);
    }

    #[test]
    fn view_includes_the_scene_root() {
        let camera = OrbitCamera::default();
        let lowered = camera.view_matrix().transform_point3(Vec3::ZERO);
        let plain = Mat4::look_at_rh(camera.position(), camera.target, Vec3::Y)
            .transform_point3(SCENE_ROOT);
        assert!((lowered - plain).length() < 1e-4);
    }

    #[test]
    fn uniform_position_is_in_scene_space() {
        let camera = OrbitCamera::default();
        let mut uniform = CameraUniform::new();
        uniform.update(&camera);
        assert!((uniform.position[1] - 10.0).abs() < 1e-3);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }
}
