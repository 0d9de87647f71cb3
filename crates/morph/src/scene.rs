//! The whole tree scene: every particle group, the star halo, the ribbon and
//! the starfield behind them.

use crate::backdrop::Backdrop;
use crate::group::{ParticleGroup, StarHalo};
use crate::interpolator::MorphInterpolator;
use crate::ribbon::RibbonMorpher;
use engine_core::Formation;
use procgen::{ConfigError, GroupKind, Starfield, TreeConfig, TreeFields};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What changed during one [`TreeScene::frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub ribbon_rebuilt: bool,
}

/// Generated once at startup, then advanced once per redraw.
#[derive(Debug)]
pub struct TreeScene {
    config: TreeConfig,
    interpolator: MorphInterpolator,
    foliage: ParticleGroup,
    round_ornaments: ParticleGroup,
    faceted_ornaments: ParticleGroup,
    gifts: ParticleGroup,
    star: ParticleGroup,
    sparkles: ParticleGroup,
    halo: StarHalo,
    ribbon: RibbonMorpher,
    backdrop: Backdrop,
}

impl TreeScene {
    /// Validate `config`, generate every group and attach their buffers.
    pub fn generate<R: Rng + ?Sized>(config: &TreeConfig, rng: &mut R) -> Result<Self, ConfigError> {
        let fields = TreeFields::generate(config, rng)?;
        let ribbon = RibbonMorpher::generate(config, rng)?;
        let starfield = Starfield::generate(&config.starfield, rng)?;

        let mut scene = Self {
            config: config.clone(),
            interpolator: MorphInterpolator::new(config.animation_speed),
            foliage: ParticleGroup::new(fields.foliage),
            round_ornaments: ParticleGroup::new(fields.round_ornaments),
            faceted_ornaments: ParticleGroup::new(fields.faceted_ornaments),
            gifts: ParticleGroup::new(fields.gifts),
            star: ParticleGroup::new(fields.star),
            sparkles: ParticleGroup::new(fields.sparkles),
            halo: StarHalo::new(),
            ribbon,
            backdrop: Backdrop::new(starfield),
        };
        for group in scene.groups_mut() {
            group.attach_buffer();
        }
        scene.halo.publish(&scene.star, Formation::Scattered, 0.0);

        log::info!(
            "Tree scene ready: {} instances, ribbon with {} control points, {} background stars",
            scene.instance_count(),
            scene.ribbon.points().len(),
            scene.backdrop.len()
        );
        Ok(scene)
    }

    /// Reproducible scene for a fixed seed.
    pub fn generate_seeded(config: &TreeConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::generate(config, &mut StdRng::seed_from_u64(seed))
    }

    /// Advance one frame: interpolate and publish every group, then morph the
    /// ribbon. `clock` is the monotonic scene time in seconds.
    pub fn frame(&mut self, delta_time: f32, clock: f32, formation: Formation) -> FrameReport {
        let interpolator = self.interpolator;
        for group in self.groups_mut() {
            group.frame(&interpolator, formation, delta_time, clock);
        }
        self.halo.publish(&self.star, formation, clock);

        FrameReport {
            ribbon_rebuilt: self.ribbon.step(&interpolator, formation, delta_time),
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn interpolator(&self) -> &MorphInterpolator {
        &self.interpolator
    }

    pub fn groups(&self) -> [&ParticleGroup; 6] {
        [
            &self.foliage,
            &self.round_ornaments,
            &self.faceted_ornaments,
            &self.gifts,
            &self.star,
            &self.sparkles,
        ]
    }

    pub fn groups_mut(&mut self) -> [&mut ParticleGroup; 6] {
        [
            &mut self.foliage,
            &mut self.round_ornaments,
            &mut self.faceted_ornaments,
            &mut self.gifts,
            &mut self.star,
            &mut self.sparkles,
        ]
    }

    pub fn group(&self, kind: GroupKind) -> Option<&ParticleGroup> {
        self.groups().into_iter().find(|g| g.kind() == kind)
    }

    pub fn star(&self) -> &ParticleGroup {
        &self.star
    }

    pub fn halo(&self) -> &StarHalo {
        &self.halo
    }

    pub fn halo_mut(&mut self) -> &mut StarHalo {
        &mut self.halo
    }

    pub fn ribbon(&self) -> &RibbonMorpher {
        &self.ribbon
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn backdrop_mut(&mut self) -> &mut Backdrop {
        &mut self.backdrop
    }

    /// Total particle instances across every group, not counting the starfield.
    pub fn instance_count(&self) -> usize {
        self.groups().iter().map(|g| g.len()).sum()
    }
}
