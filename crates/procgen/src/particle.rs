//! Dual-target particle model shared by every decorative group.

use engine_core::{Color, Formation};
use glam::Vec3;

/// One decorative instance with a target for each formation.
///
/// Targets, rotation, scale, color and phase are fixed at generation. Only
/// `live_position` and `spin` change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    scatter_target: Vec3,
    tree_target: Vec3,
    rotation: Vec3,
    scale: f32,
    color: Option<Color>,
    phase: f32,
    /// Current position, moved toward the active target every frame.
    pub live_position: Vec3,
    /// Accumulated continuous spin (radians per axis) added on top of `rotation`.
    pub spin: Vec3,
}

impl Particle {
    /// A particle resting at its scatter target.
    pub fn new(
        scatter_target: Vec3,
        tree_target: Vec3,
        rotation: Vec3,
        scale: f32,
        color: Option<Color>,
        phase: f32,
    ) -> Self {
        Self {
            scatter_target,
            tree_target,
            rotation,
            scale,
            color,
            phase,
            live_position: scatter_target,
            spin: Vec3::ZERO,
        }
    }

    pub fn scatter_target(&self) -> Vec3 {
        self.scatter_target
    }

    pub fn tree_target(&self) -> Vec3 {
        self.tree_target
    }

    /// Target for the given formation.
    pub fn target(&self, formation: Formation) -> Vec3 {
        match formation {
            Formation::Scattered => self.scatter_target,
            Formation::TreeShape => self.tree_target,
        }
    }

    /// Fixed Euler rotation (XYZ, radians).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Phase offset for secondary motion, in `[0, 2π)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }
}

/// Ornament layer variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentVariant {
    /// Glossy baubles, 70% of the ornament budget.
    Round,
    /// Sharp crystals that stick out further from the foliage.
    Faceted,
}

/// Which placement rule a particle field was generated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Foliage,
    Ornament(OrnamentVariant),
    Gift,
    Star,
    Sparkle,
}

impl GroupKind {
    pub fn name(self) -> &'static str {
        match self {
            GroupKind::Foliage => "foliage",
            GroupKind::Ornament(OrnamentVariant::Round) => "round ornament",
            GroupKind::Ornament(OrnamentVariant::Faceted) => "faceted ornament",
            GroupKind::Gift => "gift",
            GroupKind::Star => "star",
            GroupKind::Sparkle => "sparkle",
        }
    }
}

/// A fixed-size set of particles generated with one placement rule.
#[derive(Debug, Clone)]
pub struct ParticleField {
    kind: GroupKind,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Wrap hand-placed particles, e.g. for a scripted scene.
    pub fn from_particles(kind: GroupKind, particles: Vec<Particle>) -> Self {
        Self { kind, particles }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the particles. A slice, so the count stays fixed.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// True when any particle carries its own color.
    pub fn has_colors(&self) -> bool {
        self.particles.iter().any(|p| p.color.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_particle_starts_at_scatter_target() {
        let p = Particle::new(Vec3::X, Vec3::Y, Vec3::ZERO, 1.0, None, 0.0);
        assert_eq!(p.live_position, Vec3::X);
        assert_eq!(p.spin, Vec3::ZERO);
    }

    #[test]
    fn target_follows_formation() {
        let p = Particle::new(Vec3::X, Vec3::Y, Vec3::ZERO, 1.0, None, 0.0);
        assert_eq!(p.target(Formation::Scattered), Vec3::X);
        assert_eq!(p.target(Formation::TreeShape), Vec3::Y);
    }
}
