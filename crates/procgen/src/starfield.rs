//! Background star shell.

use crate::config::StarfieldConfig;
use crate::error::ConfigError;
use crate::scatter::random_in_shell;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// World-space radius of a star at size factor 1.
pub const BASE_STAR_SIZE: f32 = 0.06;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundStar {
    pub position: Vec3,
    pub scale: f32,
}

/// Fixed stars scattered through a spherical shell around the scene. Never
/// moves once generated.
#[derive(Debug, Clone, Default)]
pub struct Starfield {
    stars: Vec<BackgroundStar>,
}

impl Starfield {
    pub fn generate<R: Rng + ?Sized>(config: &StarfieldConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;

        let max_scale = config.size_factor * BASE_STAR_SIZE;
        let stars: Vec<BackgroundStar> = (0..config.count)
            .map(|_| BackgroundStar {
                position: random_in_shell(rng, config.radius, config.outer_radius()),
                scale: (0.5 + 0.5 * rng.gen::<f32>()) * max_scale,
            })
            .collect();

        log::debug!(
            "Generated {} background stars between radius {} and {}",
            stars.len(),
            config.radius,
            config.outer_radius()
        );
        Ok(Self { stars })
    }

    pub fn generate_seeded(config: &StarfieldConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::generate(config, &mut StdRng::seed_from_u64(seed))
    }

    pub fn stars(&self) -> &[BackgroundStar] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_fill_the_shell() {
        let config = StarfieldConfig::default();
        let field = Starfield::generate_seeded(&config, 1).unwrap();
        assert_eq!(field.len(), 5000);
        for star in field.stars() {
            let d = star.position.length();
            assert!(d >= 100.0 - 1e-2 && d <= 150.0 + 1e-2, "distance {d}");
        }
    }

    #[test]
    fn sizes_span_half_to_full_factor() {
        let config = StarfieldConfig::default();
        let field = Starfield::generate_seeded(&config, 2).unwrap();
        let max = config.size_factor * BASE_STAR_SIZE;
        for star in field.stars() {
            assert!(star.scale >= 0.5 * max - 1e-6 && star.scale <= max + 1e-6);
        }
    }

    #[test]
    fn zero_depth_puts_every_star_on_the_sphere() {
        let config = StarfieldConfig {
            count: 200,
            depth: 0.0,
            ..Default::default()
        };
        let field = Starfield::generate_seeded(&config, 3).unwrap();
        assert!(field.stars().iter().all(|s| (s.position.length() - 100.0).abs() < 1e-2));
    }

    #[test]
    fn empty_starfield_is_allowed() {
        let config = StarfieldConfig {
            count: 0,
            ..Default::default()
        };
        assert!(Starfield::generate_seeded(&config, 4).unwrap().is_empty());
    }

    #[test]
    fn bad_radius_is_rejected() {
        let config = StarfieldConfig {
            radius: 0.0,
            ..Default::default()
        };
        assert!(Starfield::generate_seeded(&config, 5).is_err());
    }

    #[test]
    fn same_seed_same_sky() {
        let config = StarfieldConfig {
            count: 50,
            ..Default::default()
        };
        let a = Starfield::generate_seeded(&config, 9).unwrap();
        let b = Starfield::generate_seeded(&config, 9).unwrap();
        assert_eq!(a.stars(), b.stars());
    }
}
