//! Placement rules: where each group's particles sit in the scattered cloud
//! and in the assembled tree.

use crate::config::{FieldConfig, TreeConfig};
use crate::error::ConfigError;
use crate::palette::{PaletteSampler, GIFT_PALETTE, ORNAMENT_PALETTE};
use crate::particle::{GroupKind, OrnamentVariant, Particle, ParticleField};
use crate::scatter::{random_in_cube, random_in_sphere};
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

/// Angle step between consecutive ornaments (radians). Close to the golden
/// angle, so neighbours spiral around the trunk instead of clustering.
pub const ORNAMENT_ANGLE_STEP: f32 = 2.4;
/// Smallest ornament scale, reached near the tip.
pub const ORNAMENT_MIN_SCALE: f32 = 0.25;
/// Height above the tree's top where the star sits.
pub const STAR_APEX_OFFSET: f32 = 1.5;
/// Side length of the sparkle cube while scattered.
pub const SPARKLE_SCATTER_EXTENT: f32 = 50.0;
/// Side length of the sparkle cube once the tree has assembled.
pub const SPARKLE_TREE_EXTENT: f32 = 20.0;

impl OrnamentVariant {
    /// Distance the ornament hangs outside the foliage envelope.
    pub fn margin(self) -> f32 {
        match self {
            OrnamentVariant::Round => 0.3,
            OrnamentVariant::Faceted => 0.6,
        }
    }

    /// Scale at the bottom of the tree.
    pub fn base_scale(self) -> f32 {
        match self {
            OrnamentVariant::Round => 0.7,
            OrnamentVariant::Faceted => 0.5,
        }
    }

    /// Scale at a height fraction in `[0, 1]`: largest at the base, shrinking toward the tip.
    pub fn scale_at(self, height_fraction: f32) -> f32 {
        ORNAMENT_MIN_SCALE
            + (self.base_scale() - ORNAMENT_MIN_SCALE) * (1.0 - height_fraction * 0.8)
    }
}

impl GroupKind {
    /// Multiplier on the scatter radius for this group's cloud.
    pub fn scatter_scale(self) -> f32 {
        match self {
            GroupKind::Ornament(_) => 1.5,
            _ => 1.0,
        }
    }
}

/// Foliage radius at height `y` (measured from the base), shrinking linearly to 0 at the tip.
pub fn foliage_radius_at(config: &FieldConfig, y: f32) -> f32 {
    config.base_radius * (1.0 - y / config.tree_height)
}

impl ParticleField {
    /// Generate a field with the thread-local RNG.
    pub fn generate(kind: GroupKind, config: &FieldConfig) -> Result<Self, ConfigError> {
        Self::generate_with(kind, config, &mut rand::thread_rng())
    }

    /// Generate a reproducible field from a seed.
    pub fn generate_seeded(
        kind: GroupKind,
        config: &FieldConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::generate_with(kind, config, &mut StdRng::seed_from_u64(seed))
    }

    /// Generate `config.count` particles placed by the rule for `kind`.
    pub fn generate_with<R: Rng + ?Sized>(
        kind: GroupKind,
        config: &FieldConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate(kind.name())?;
        if kind == GroupKind::Star && config.count != 1 {
            return Err(ConfigError::StarCount(config.count));
        }

        let palette = match kind {
            GroupKind::Ornament(_) => Some(ORNAMENT_PALETTE.sampler()?),
            GroupKind::Gift => Some(GIFT_PALETTE.sampler()?),
            _ => None,
        };

        let particles = (0..config.count)
            .map(|i| match kind {
                GroupKind::Foliage => foliage(config, rng),
                GroupKind::Ornament(variant) => ornament(config, variant, i, palette.as_ref(), rng),
                GroupKind::Gift => gift(config, palette.as_ref(), rng),
                GroupKind::Star => star(config, rng),
                GroupKind::Sparkle => sparkle(rng),
            })
            .collect();

        log::debug!("Generated {} {} particles", config.count, kind.name());
        Ok(Self::from_particles(kind, particles))
    }
}

fn random_euler<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(rng.gen::<f32>() * PI, rng.gen::<f32>() * PI, rng.gen::<f32>() * PI)
}

fn phase<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>() * TAU
}

fn foliage<R: Rng + ?Sized>(config: &FieldConfig, rng: &mut R) -> Particle {
    let y = rng.gen::<f32>() * config.tree_height;
    let radius_at = foliage_radius_at(config, y);
    let angle = rng.gen::<f32>() * TAU;
    let r = (rng.gen::<f32>() * 0.2 + 0.8) * radius_at;

    let tree = Vec3::new(angle.cos() * r, y - config.tree_height / 2.0, angle.sin() * r);
    let scatter = random_in_sphere(rng, config.scatter_radius * GroupKind::Foliage.scatter_scale());

    Particle::new(scatter, tree, random_euler(rng), rng.gen::<f32>() * 0.5 + 0.5, None, phase(rng))
}

fn ornament<R: Rng + ?Sized>(
    config: &FieldConfig,
    variant: OrnamentVariant,
    index: usize,
    palette: Option<&PaletteSampler>,
    rng: &mut R,
) -> Particle {
    let y = rng.gen::<f32>() * config.tree_height;
    let height_fraction = y / config.tree_height;
    let r = foliage_radius_at(config, y) + variant.margin();
    let angle = index as f32 * ORNAMENT_ANGLE_STEP;

    let tree = Vec3::new(angle.cos() * r, y - config.tree_height / 2.0, angle.sin() * r);
    let scatter = random_in_sphere(
        rng,
        config.scatter_radius * GroupKind::Ornament(variant).scatter_scale(),
    );
    let rotation = Vec3::new(rng.gen::<f32>() * PI, rng.gen::<f32>() * PI, 0.0);
    let color = palette.map(|p| p.pick(rng));

    Particle::new(scatter, tree, rotation, variant.scale_at(height_fraction), color, phase(rng))
}

fn gift<R: Rng + ?Sized>(
    config: &FieldConfig,
    palette: Option<&PaletteSampler>,
    rng: &mut R,
) -> Particle {
    let r = (rng.gen::<f32>() * 0.8 + 0.4) * config.base_radius;
    let theta = rng.gen::<f32>() * TAU;
    // Piled on the floor, a few stacked
    let stack = rng.gen::<f32>() * 2.0;

    let tree = Vec3::new(
        r * theta.cos(),
        -config.tree_height / 2.0 + stack * 0.8,
        r * theta.sin(),
    );
    let scatter = random_in_sphere(rng, config.scatter_radius * GroupKind::Gift.scatter_scale());
    let rotation = random_euler(rng);
    let scale = rng.gen::<f32>() * 0.8 + 0.5;
    let color = palette.map(|p| p.pick(rng));

    Particle::new(scatter, tree, rotation, scale, color, phase(rng))
}

fn star<R: Rng + ?Sized>(config: &FieldConfig, rng: &mut R) -> Particle {
    let tree = Vec3::new(0.0, config.tree_height / 2.0 + STAR_APEX_OFFSET, 0.0);

    // Somewhere far up in the cloud
    let spread = config.scatter_radius * 0.8;
    let scatter = random_in_cube(rng, spread * 0.5) + Vec3::Y * 10.0;

    Particle::new(scatter, tree, Vec3::ZERO, 1.0, None, 0.0)
}

fn sparkle<R: Rng + ?Sized>(rng: &mut R) -> Particle {
    let scatter = random_in_cube(rng, SPARKLE_SCATTER_EXTENT * 0.5);
    let tree = scatter * (SPARKLE_TREE_EXTENT / SPARKLE_SCATTER_EXTENT);
    let scale = rng.gen::<f32>() * 0.4 + 0.6;

    Particle::new(scatter, tree, random_euler(rng), scale, None, phase(rng))
}

/// Every field the tree scene is built from.
#[derive(Debug, Clone)]
pub struct TreeFields {
    pub foliage: ParticleField,
    pub round_ornaments: ParticleField,
    pub faceted_ornaments: ParticleField,
    pub gifts: ParticleField,
    pub star: ParticleField,
    pub sparkles: ParticleField,
}

impl TreeFields {
    /// Validate `config` and generate every group from `rng`.
    pub fn generate<R: Rng + ?Sized>(config: &TreeConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let (round, faceted) = config.ornament_split();

        let fields = Self {
            foliage: ParticleField::generate_with(
                GroupKind::Foliage,
                &config.field(config.foliage_count),
                rng,
            )?,
            round_ornaments: ParticleField::generate_with(
                GroupKind::Ornament(OrnamentVariant::Round),
                &config.field(round),
                rng,
            )?,
            faceted_ornaments: ParticleField::generate_with(
                GroupKind::Ornament(OrnamentVariant::Faceted),
                &config.field(faceted),
                rng,
            )?,
            gifts: ParticleField::generate_with(GroupKind::Gift, &config.field(config.gift_count), rng)?,
            star: ParticleField::generate_with(GroupKind::Star, &config.field(1), rng)?,
            sparkles: ParticleField::generate_with(
                GroupKind::Sparkle,
                &config.field(config.sparkle_count),
                rng,
            )?,
        };

        log::info!(
            "Generated tree fields: {} foliage, {}+{} ornaments, {} gifts, {} sparkles",
            fields.foliage.len(),
            fields.round_ornaments.len(),
            fields.faceted_ornaments.len(),
            fields.gifts.len(),
            fields.sparkles.len(),
        );
        Ok(fields)
    }
}
