//! Weighted color tables for the colored groups.

use crate::error::ConfigError;
use engine_core::{theme, Color};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// A fixed color table where each entry is drawn in proportion to its weight.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    entries: &'static [(Color, u32)],
}

/// Warm golds with a pearl and a velvet red accent. Gold is drawn twice as often.
pub const ORNAMENT_PALETTE: Palette = Palette::new(&[
    (theme::GOLD, 2),
    (theme::AMBER, 1),
    (theme::ORANGE_GOLD, 1),
    (theme::BRONZE, 1),
    (theme::CHAMPAGNE, 1),
    (theme::PEARL, 1),
    (theme::DEEP_RED, 1),
]);

/// Gift wrapping colors.
pub const GIFT_PALETTE: Palette = Palette::new(&[
    (theme::GIFT_RED, 1),
    (theme::GIFT_GREEN, 1),
    (theme::GIFT_GOLD, 1),
    (theme::GIFT_WHITE, 1),
    (theme::GOLD_DARK, 1),
]);

impl Palette {
    pub const fn new(entries: &'static [(Color, u32)]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [(Color, u32)] {
        self.entries
    }

    /// Build a reusable sampler for this table.
    pub fn sampler(&self) -> Result<PaletteSampler, ConfigError> {
        let index = WeightedIndex::new(self.entries.iter().map(|(_, w)| *w))
            .map_err(|e| ConfigError::Palette(e.to_string()))?;
        Ok(PaletteSampler {
            entries: self.entries,
            index,
        })
    }
}

/// Draws colors from a [`Palette`].
#[derive(Debug, Clone)]
pub struct PaletteSampler {
    entries: &'static [(Color, u32)],
    index: WeightedIndex<u32>,
}

impl PaletteSampler {
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.entries[self.index.sample(rng)].0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn picks_only_palette_colors() {
        let sampler = GIFT_PALETTE.sampler().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let c = sampler.pick(&mut rng);
            assert!(GIFT_PALETTE.entries().iter().any(|(e, _)| *e == c));
        }
    }

    #[test]
    fn doubled_weight_is_drawn_about_twice_as_often() {
        let sampler = ORNAMENT_PALETTE.sampler().unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let n = 16_000;
        let gold = (0..n).filter(|_| sampler.pick(&mut rng) == theme::GOLD).count();
        // 2 of 8 weight units
        let frac = gold as f32 / n as f32;
        assert!((frac - 0.25).abs() < 0.02, "gold fraction {frac}");
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        static EMPTY: [(Color, u32); 1] = [(Color::WHITE, 0)];
        assert!(matches!(
            Palette::new(&EMPTY).sampler(),
            Err(ConfigError::Palette(_))
        ));
    }
}
