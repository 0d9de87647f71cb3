//! Per-group motion tuning: speed multipliers, spin and idle motion.
//!
//! Idle motion is a display offset computed from the scene clock. It is added
//! when transforms are published and never written back into a particle's
//! live position.

use engine_core::Formation;
use glam::Vec3;
use procgen::{GroupKind, OrnamentVariant, Particle};

/// Angular frequency of the wind sway, in radians per second.
pub const SWAY_FREQUENCY: f32 = 2.0;
/// Angular frequency of the star's float, in radians per second.
pub const FLOAT_FREQUENCY: f32 = 1.5;

/// When a group's continuous spin advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinMode {
    Never,
    Always,
    WhileScattered,
}

/// How one particle group moves beyond the base interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionProfile {
    /// Scales the shared animation speed.
    pub speed_multiplier: f32,
    /// Spin rate in radians per second, per Euler axis.
    pub spin_rate: Vec3,
    pub spin_mode: SpinMode,
    /// Vertical bob amplitude while scattered.
    pub bob: f32,
    /// Keep bobbing after the tree assembles.
    pub bob_in_tree: bool,
    /// Sideways wind sway amplitude while assembled.
    pub sway: f32,
    /// Vertical float amplitude, independent of formation and phase.
    pub float: f32,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            spin_rate: Vec3::ZERO,
            spin_mode: SpinMode::Never,
            bob: 0.0,
            bob_in_tree: false,
            sway: 0.0,
            float: 0.0,
        }
    }
}

impl MotionProfile {
    /// Tuning for each group of the tree scene.
    pub fn for_kind(kind: GroupKind) -> Self {
        match kind {
            GroupKind::Foliage => Self {
                spin_rate: Vec3::new(0.2, 0.1, 0.0),
                spin_mode: SpinMode::Always,
                bob: 0.6,
                sway: 0.015,
                ..Default::default()
            },
            GroupKind::Ornament(OrnamentVariant::Round) => Self {
                speed_multiplier: 0.8,
                ..Default::default()
            },
            GroupKind::Ornament(OrnamentVariant::Faceted) => Self {
                speed_multiplier: 0.8,
                spin_rate: Vec3::new(0.0, 0.5, 0.0),
                spin_mode: SpinMode::Always,
                ..Default::default()
            },
            // Heavy boxes drift slower and tumble only in the air
            GroupKind::Gift => Self {
                speed_multiplier: 0.6,
                spin_rate: Vec3::new(0.2, 0.2, 0.0),
                spin_mode: SpinMode::WhileScattered,
                ..Default::default()
            },
            GroupKind::Star => Self {
                spin_rate: Vec3::new(0.0, 0.5, 0.0),
                spin_mode: SpinMode::Always,
                float: 0.1,
                ..Default::default()
            },
            GroupKind::Sparkle => Self {
                bob: 0.3,
                bob_in_tree: true,
                ..Default::default()
            },
        }
    }

    pub fn spins(&self, formation: Formation) -> bool {
        match self.spin_mode {
            SpinMode::Never => false,
            SpinMode::Always => true,
            SpinMode::WhileScattered => formation == Formation::Scattered,
        }
    }

    /// Spin to add this frame.
    pub fn spin_step(&self, delta_time: f32, formation: Formation) -> Vec3 {
        if self.spins(formation) && delta_time.is_finite() && delta_time > 0.0 {
            self.spin_rate * delta_time
        } else {
            Vec3::ZERO
        }
    }

    /// Idle motion offset for `particle` at scene time `clock`.
    pub fn offset(&self, particle: &Particle, formation: Formation, clock: f32) -> Vec3 {
        let mut offset = Vec3::ZERO;
        let scattered = formation == Formation::Scattered;

        if self.bob != 0.0 && (scattered || self.bob_in_tree) {
            offset.y += (clock + particle.phase()).sin() * self.bob;
        }
        if self.sway != 0.0 && !scattered {
            offset.x += (clock * SWAY_FREQUENCY + particle.live_position.y).sin() * self.sway;
        }
        if self.float != 0.0 {
            offset.y += (clock * FLOAT_FREQUENCY).sin() * self.float;
        }
        offset
    }
}
