//! Per-group materials and the shape each group is instanced with.

use bytemuck::{Pod, Zeroable};
use engine_core::{theme, Color};
use glam::Vec3;
use procgen::{GroupKind, OrnamentVariant, ShapeMesh};

/// How a draw is blended into the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// Depth-tested and depth-written.
    Opaque,
    /// Additive glow drawn from the inside, no depth writes.
    HaloAdditive,
    /// Additive glow from both sides, no depth writes.
    GlowAdditive,
}

/// Material uniform (must match shader.wgsl MaterialUniform).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    /// Linear base tint; multiplied by the instance color. `a` is opacity.
    pub base_color: [f32; 4],
    /// Linear emissive color, pre-multiplied by its intensity.
    pub emissive: [f32; 4],
    /// x = metallic, y = roughness, z = unlit (0 or 1), w unused
    pub params: [f32; 4],
}

impl MaterialUniform {
    pub fn lit(base: Color, emissive: Color, emissive_intensity: f32, metallic: f32, roughness: f32) -> Self {
        Self {
            base_color: base.to_linear().to_rgba(1.0),
            emissive: emissive.to_linear().scaled(emissive_intensity).to_rgba(0.0),
            params: [metallic, roughness, 0.0, 0.0],
        }
    }

    pub fn unlit(color: Color, opacity: f32) -> Self {
        Self {
            base_color: color.to_linear().to_rgba(opacity),
            emissive: [0.0; 4],
            params: [0.0, 1.0, 1.0, 0.0],
        }
    }

    /// Material for a particle group. Colored groups use a white base so the
    /// instance color shows through.
    pub fn for_kind(kind: GroupKind) -> Self {
        match kind {
            GroupKind::Foliage => Self::lit(theme::EMERALD_WARM, theme::EMERALD_DARK, 0.1, 0.2, 0.7),
            GroupKind::Ornament(OrnamentVariant::Round) => {
                Self::lit(Color::WHITE, theme::GOLD_DARK, 0.1, 0.9, 0.15)
            }
            GroupKind::Ornament(OrnamentVariant::Faceted) => {
                Self::lit(Color::WHITE, Color::hex(0x444444), 0.2, 1.0, 0.0)
            }
            GroupKind::Gift => Self::lit(Color::WHITE, Color::WHITE, 0.0, 0.5, 0.2),
            GroupKind::Star => Self::lit(theme::GOLD, theme::GOLD, 0.5, 1.0, 0.1),
            GroupKind::Sparkle => Self::unlit(theme::GOLD, 0.6),
        }
    }

    pub fn ribbon() -> Self {
        Self::lit(theme::GOLD, theme::ORANGE_GOLD, 0.2, 0.8, 0.2)
    }

    pub fn halo() -> Self {
        Self::unlit(theme::GOLD_LIGHT, 0.3)
    }

    /// Colorless background stars.
    pub fn starfield() -> Self {
        Self::unlit(Color::rgb(0.9, 0.9, 0.9), 1.0)
    }

    pub fn opacity(&self) -> f32 {
        self.base_color[3]
    }

    pub fn is_unlit(&self) -> bool {
        self.params[2] > 0.5
    }
}

pub fn blend_for_kind(kind: GroupKind) -> Blend {
    match kind {
        GroupKind::Sparkle => Blend::GlowAdditive,
        _ => Blend::Opaque,
    }
}

pub const FOLIAGE_RADIUS: f32 = 0.2;
pub const ORNAMENT_RADIUS: f32 = 0.5;
pub const ROUND_ORNAMENT_DETAIL: u32 = 2;
pub const SPARKLE_RADIUS: f32 = 0.08;
pub const STAR_POINTS: u32 = 5;
pub const STAR_OUTER_RADIUS: f32 = 1.8;
pub const STAR_INNER_RADIUS: f32 = 0.8;
pub const STAR_DEPTH: f32 = 0.5;

/// Unit star; each background star's instance scale sets its size.
pub fn starfield_shape() -> ShapeMesh {
    ShapeMesh::octahedron(1.0)
}

/// Geometry every instance of `kind` is drawn with.
pub fn shape_for_kind(kind: GroupKind) -> ShapeMesh {
    match kind {
        GroupKind::Foliage => ShapeMesh::tetrahedron(FOLIAGE_RADIUS),
        GroupKind::Ornament(OrnamentVariant::Round) => {
            ShapeMesh::icosphere(ORNAMENT_RADIUS, ROUND_ORNAMENT_DETAIL)
        }
        GroupKind::Ornament(OrnamentVariant::Faceted) => ShapeMesh::octahedron(ORNAMENT_RADIUS),
        GroupKind::Gift => ShapeMesh::cuboid(Vec3::ONE),
        GroupKind::Star => {
            ShapeMesh::star_prism(STAR_POINTS, STAR_OUTER_RADIUS, STAR_INNER_RADIUS, STAR_DEPTH)
        }
        GroupKind::Sparkle => ShapeMesh::octahedron(SPARKLE_RADIUS),
    }
}
