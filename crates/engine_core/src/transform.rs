//! Transform component and utilities for spatial positioning.

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from a position, XYZ Euler angles (radians) and a uniform scale.
    pub fn from_euler(position: Vec3, euler: Vec3, scale: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z),
            scale: Vec3::splat(scale),
        }
    }

    /// Reset back to the identity transform.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set the rotation from XYZ Euler angles (radians).
    pub fn set_euler(&mut self, euler: Vec3) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
    }

    /// Set a uniform scale on all three axes.
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vec3::splat(scale);
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }
}

/// Raw transform data for GPU upload (instance data).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
}

impl TransformRaw {
    pub const IDENTITY: Self = Self {
        model: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// True when every matrix element is a finite number.
    pub fn is_finite(&self) -> bool {
        self.model.iter().flatten().all(|v| v.is_finite())
    }

    /// Translation column of the model matrix.
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

impl Default for TransformRaw {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<&Transform> for TransformRaw {
    fn from(transform: &Transform) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
        }
    }
}

impl From<Transform> for TransformRaw {
    fn from(transform: Transform) -> Self {
        Self::from(&transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_translation_matches_position() {
        let t = Transform::from_euler(Vec3::new(1.0, -2.0, 3.5), Vec3::new(0.3, 1.2, 0.0), 0.5);
        let raw = TransformRaw::from(t);
        assert!(raw.is_finite());
        assert!((raw.translation() - Vec3::new(1.0, -2.0, 3.5)).length() < 1e-6);
    }

    #[test]
    fn reset_restores_identity() {
        let mut t = Transform::from_euler(Vec3::ONE, Vec3::splat(0.7), 2.0);
        t.reset();
        assert_eq!(t, Transform::default());
        assert_eq!(TransformRaw::from(t), TransformRaw::IDENTITY);
    }

    #[test]
    fn uniform_scale_shows_up_in_basis_length() {
        let mut t = Transform::default();
        t.set_euler(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        t.set_uniform_scale(3.0);
        let m = t.to_matrix();
        assert!((m.x_axis.truncate().length() - 3.0).abs() < 1e-5);
    }
}
