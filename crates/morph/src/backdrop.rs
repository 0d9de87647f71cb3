//! The background starfield. Published once at generation and never updated.

use crate::publisher::InstanceBuffer;
use engine_core::{Transform, TransformRaw};
use glam::Vec3;
use procgen::Starfield;

#[derive(Debug)]
pub struct Backdrop {
    starfield: Starfield,
    buffer: InstanceBuffer,
}

impl Backdrop {
    pub fn new(starfield: Starfield) -> Self {
        let mut buffer = InstanceBuffer::new(starfield.len(), false);
        for (i, star) in starfield.stars().iter().enumerate() {
            let transform = Transform::from_euler(star.position, Vec3::ZERO, star.scale);
            buffer.write(i, TransformRaw::from(&transform));
        }
        buffer.mark_transforms_dirty();
        Self { starfield, buffer }
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn len(&self) -> usize {
        self.starfield.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starfield.is_empty()
    }

    pub fn buffer(&self) -> &InstanceBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut InstanceBuffer {
        &mut self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::StarfieldConfig;

    #[test]
    fn every_star_gets_a_slot_at_its_position() {
        let config = StarfieldConfig {
            count: 300,
            ..Default::default()
        };
        let backdrop = Backdrop::new(Starfield::generate_seeded(&config, 1).unwrap());
        assert_eq!(backdrop.buffer().len(), 300);
        assert!(backdrop.buffer().colors().is_none());
        assert!(backdrop.buffer().transforms_dirty());

        for (raw, star) in backdrop.buffer().transforms().iter().zip(backdrop.starfield().stars()) {
            assert!((raw.translation() - star.position).length() < 1e-3);
            let d = raw.translation().length();
            assert!(d >= 100.0 - 1e-2 && d <= 150.0 + 1e-2);
        }
    }

    #[test]
    fn empty_starfield_gives_empty_buffer() {
        let backdrop = Backdrop::new(Starfield::default());
        assert!(backdrop.is_empty());
        assert!(backdrop.buffer().is_empty());
    }
}
