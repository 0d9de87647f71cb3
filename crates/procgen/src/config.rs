//! Generation parameters for the tree scene. Read once at startup; changing
//! them means regenerating every particle field.

use crate::error::{ensure_non_negative, ensure_positive, ConfigError};
use serde::{Deserialize, Serialize};

/// Share of the ornament budget (in tenths) that goes to round baubles; the rest are faceted.
pub const ROUND_ORNAMENT_TENTHS: usize = 7;

/// Named numeric parameters for every particle group, the ribbon and the animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Needle particles forming the tree body.
    #[serde(default = "default_foliage_count")]
    pub foliage_count: usize,
    /// Ornaments, split between round and faceted layers.
    #[serde(default = "default_ornament_count")]
    pub ornament_count: usize,
    /// Gift boxes piled around the base.
    #[serde(default = "default_gift_count")]
    pub gift_count: usize,
    /// Floating gold dust around the scene.
    #[serde(default = "default_sparkle_count")]
    pub sparkle_count: usize,
    /// Curve segments along the ribbon (control points = segments + 1).
    #[serde(default = "default_ribbon_segments")]
    pub ribbon_segments: usize,
    /// Frames between ribbon surface rebuilds (1 = every frame).
    #[serde(default = "default_rebuild_interval")]
    pub ribbon_rebuild_interval: u32,
    #[serde(default = "default_tree_height")]
    pub tree_height: f32,
    /// Foliage radius at the bottom of the tree.
    #[serde(default = "default_base_radius")]
    pub base_radius: f32,
    /// Radius of the sphere the scattered cloud fills.
    #[serde(default = "default_scatter_radius")]
    pub scatter_radius: f32,
    /// Base convergence rate (per second) shared by all groups.
    #[serde(default = "default_animation_speed")]
    pub animation_speed: f32,
    /// Static star shell behind the scene.
    #[serde(default)]
    pub starfield: StarfieldConfig,
}

fn default_foliage_count() -> usize {
    4500
}
fn default_ornament_count() -> usize {
    1200
}
fn default_gift_count() -> usize {
    50
}
fn default_sparkle_count() -> usize {
    400
}
fn default_ribbon_segments() -> usize {
    200
}
fn default_rebuild_interval() -> u32 {
    1
}
fn default_tree_height() -> f32 {
    18.0
}
fn default_base_radius() -> f32 {
    6.0
}
fn default_scatter_radius() -> f32 {
    35.0
}
fn default_animation_speed() -> f32 {
    2.0
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            foliage_count: default_foliage_count(),
            ornament_count: default_ornament_count(),
            gift_count: default_gift_count(),
            sparkle_count: default_sparkle_count(),
            ribbon_segments: default_ribbon_segments(),
            ribbon_rebuild_interval: default_rebuild_interval(),
            tree_height: default_tree_height(),
            base_radius: default_base_radius(),
            scatter_radius: default_scatter_radius(),
            animation_speed: default_animation_speed(),
            starfield: StarfieldConfig::default(),
        }
    }
}

impl TreeConfig {
    /// Reject degenerate parameters before anything is generated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("foliage", self.foliage_count),
            ("gift", self.gift_count),
            ("sparkle", self.sparkle_count),
            ("ribbon segment", self.ribbon_segments),
        ];
        for (group, count) in counts {
            if count == 0 {
                return Err(ConfigError::EmptyGroup { group });
            }
        }
        if self.ornament_count < 2 {
            return Err(ConfigError::OrnamentSplit(self.ornament_count));
        }
        if self.ribbon_rebuild_interval == 0 {
            return Err(ConfigError::RebuildInterval);
        }
        ensure_positive("tree_height", self.tree_height)?;
        ensure_positive("base_radius", self.base_radius)?;
        ensure_positive("scatter_radius", self.scatter_radius)?;
        ensure_positive("animation_speed", self.animation_speed)?;
        self.starfield.validate()
    }

    /// Round and faceted ornament counts.
    pub fn ornament_split(&self) -> (usize, usize) {
        let round = self.ornament_count * ROUND_ORNAMENT_TENTHS / 10;
        (round, self.ornament_count - round)
    }

    /// Field parameters for a group of `count` particles.
    pub fn field(&self, count: usize) -> FieldConfig {
        FieldConfig {
            count,
            tree_height: self.tree_height,
            base_radius: self.base_radius,
            scatter_radius: self.scatter_radius,
        }
    }
}

/// Background star shell. Stars sit between `radius` and `radius + depth`
/// from the origin; a zero count leaves the background empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarfieldConfig {
    #[serde(default = "default_star_count")]
    pub count: usize,
    /// Inner radius of the shell.
    #[serde(default = "default_star_radius")]
    pub radius: f32,
    /// Shell thickness.
    #[serde(default = "default_star_depth")]
    pub depth: f32,
    /// Largest star size, in multiples of the base star size.
    #[serde(default = "default_star_size_factor")]
    pub size_factor: f32,
}

fn default_star_count() -> usize {
    5000
}
fn default_star_radius() -> f32 {
    100.0
}
fn default_star_depth() -> f32 {
    50.0
}
fn default_star_size_factor() -> f32 {
    4.0
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: default_star_count(),
            radius: default_star_radius(),
            depth: default_star_depth(),
            size_factor: default_star_size_factor(),
        }
    }
}

impl StarfieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("starfield.radius", self.radius)?;
        ensure_non_negative("starfield.depth", self.depth)?;
        ensure_positive("starfield.size_factor", self.size_factor)?;
        Ok(())
    }

    pub fn outer_radius(&self) -> f32 {
        self.radius + self.depth
    }
}

/// Parameters one particle field is generated from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    pub count: usize,
    pub tree_height: f32,
    pub base_radius: f32,
    pub scatter_radius: f32,
}

impl FieldConfig {
    pub fn validate(&self, group: &'static str) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::EmptyGroup { group });
        }
        ensure_positive("tree_height", self.tree_height)?;
        ensure_positive("base_radius", self.base_radius)?;
        ensure_positive("scatter_radius", self.scatter_radius)?;
        Ok(())
    }
}
