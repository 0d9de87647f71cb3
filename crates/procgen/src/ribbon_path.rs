//! Control points for the ribbon that winds around the tree.

use crate::config::TreeConfig;
use crate::error::ConfigError;
use engine_core::Formation;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Full turns the ribbon makes around the assembled tree.
pub const RIBBON_TURNS: f32 = 6.0;
/// How far outside the foliage envelope the ribbon runs.
pub const RIBBON_CLEARANCE: f32 = 0.5;

/// One ordered point on the ribbon path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    scatter_target: Vec3,
    tree_target: Vec3,
    /// Current position, moved toward the active target every frame.
    pub live: Vec3,
}

impl ControlPoint {
    pub fn new(scatter_target: Vec3, tree_target: Vec3) -> Self {
        Self {
            scatter_target,
            tree_target,
            live: scatter_target,
        }
    }

    pub fn scatter_target(&self) -> Vec3 {
        self.scatter_target
    }

    pub fn tree_target(&self) -> Vec3 {
        self.tree_target
    }

    pub fn target(&self, formation: Formation) -> Vec3 {
        match formation {
            Formation::Scattered => self.scatter_target,
            Formation::TreeShape => self.tree_target,
        }
    }
}

/// Generate `segments + 1` control points: a tight spiral up the tree and a
/// loose, noisy spiral through the scatter cloud.
///
/// The scatter path is randomized once here and never regenerated.
pub fn generate_ribbon_path<R: Rng + ?Sized>(
    config: &TreeConfig,
    rng: &mut R,
) -> Result<Vec<ControlPoint>, ConfigError> {
    config.validate()?;
    let segments = config.ribbon_segments;
    let h = config.tree_height;
    let scatter_r = config.scatter_radius * 0.8;

    let points = (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;

            let angle = t * TAU * RIBBON_TURNS;
            let r = config.base_radius * (1.0 - t) + RIBBON_CLEARANCE;
            let tree = Vec3::new(angle.cos() * r, -h / 2.0 + t * h, angle.sin() * r);

            let noise = (rng.gen::<f32>() - 0.5) * 5.0;
            let loose_angle = t * TAU * 2.0 + noise;
            let scatter = Vec3::new(
                loose_angle.cos() * scatter_r * (rng.gen::<f32>() * 0.5 + 0.5),
                (t - 0.5) * config.scatter_radius + noise,
                loose_angle.sin() * scatter_r * (rng.gen::<f32>() * 0.5 + 0.5),
            );

            ControlPoint::new(scatter, tree)
        })
        .collect();

    Ok(points)
}
