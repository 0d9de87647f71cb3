//! Per-instance transform and color buffers, and the publisher that fills them.

use crate::motion::MotionProfile;
use engine_core::{Formation, Transform, TransformRaw};
use glam::Vec3;
use procgen::Particle;

/// CPU-side instance data for one group, read by the renderer after each frame.
///
/// Transforms and colors are separate sub-buffers with their own dirty flags,
/// so a color table written once is not re-uploaded every frame.
#[derive(Debug, Clone)]
pub struct InstanceBuffer {
    transforms: Vec<TransformRaw>,
    colors: Option<Vec<[f32; 4]>>,
    transforms_dirty: bool,
    colors_dirty: bool,
}

impl InstanceBuffer {
    /// `count` identity transforms, with a white color slot per instance if
    /// `with_colors` is set.
    pub fn new(count: usize, with_colors: bool) -> Self {
        Self {
            transforms: vec![TransformRaw::IDENTITY; count],
            colors: with_colors.then(|| vec![[1.0; 4]; count]),
            transforms_dirty: true,
            colors_dirty: with_colors,
        }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transforms(&self) -> &[TransformRaw] {
        &self.transforms
    }

    pub fn colors(&self) -> Option<&[[f32; 4]]> {
        self.colors.as_deref()
    }

    pub fn transforms_dirty(&self) -> bool {
        self.transforms_dirty
    }

    pub fn colors_dirty(&self) -> bool {
        self.colors_dirty
    }

    /// Clear the transform dirty flag, returning whether it was set.
    pub fn take_transforms_dirty(&mut self) -> bool {
        std::mem::take(&mut self.transforms_dirty)
    }

    /// Clear the color dirty flag, returning whether it was set.
    pub fn take_colors_dirty(&mut self) -> bool {
        std::mem::take(&mut self.colors_dirty)
    }

    /// Grow or truncate to exactly `count` slots. New slots are identity/white.
    pub fn resize(&mut self, count: usize) {
        if count == self.transforms.len() {
            return;
        }
        self.transforms.resize(count, TransformRaw::IDENTITY);
        if let Some(colors) = &mut self.colors {
            colors.resize(count, [1.0; 4]);
            self.colors_dirty = true;
        }
        self.transforms_dirty = true;
    }

    /// Overwrite slot `index`. Out-of-range writes are ignored. Does not
    /// touch the dirty flag; call [`Self::mark_transforms_dirty`] once after
    /// the batch.
    pub fn write(&mut self, index: usize, raw: TransformRaw) {
        if let Some(slot) = self.transforms.get_mut(index) {
            *slot = raw;
        }
    }

    pub fn mark_transforms_dirty(&mut self) {
        self.transforms_dirty = true;
    }

    fn set_color(&mut self, index: usize, color: [f32; 4]) {
        if let Some(slot) = self.colors.as_mut().and_then(|c| c.get_mut(index)) {
            *slot = color;
        }
    }
}

/// Composes particle transforms into an [`InstanceBuffer`].
///
/// Holds its own scratch transform, reset for every particle.
#[derive(Debug, Default)]
pub struct InstancePublisher {
    scratch: Transform,
}

impl InstancePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial fill: every slot at its scatter target with fixed rotation and
    /// scale, plus colors. Runs once before the first frame.
    pub fn seed(&mut self, particles: &[Particle], buffer: Option<&mut InstanceBuffer>) {
        let Some(buffer) = buffer else {
            return;
        };
        buffer.resize(particles.len());

        for (i, particle) in particles.iter().enumerate() {
            self.compose(particle.scatter_target(), particle.rotation(), particle.scale());
            buffer.write(i, TransformRaw::from(&self.scratch));
            if let Some(color) = particle.color() {
                buffer.set_color(i, color.to_linear().to_rgba(1.0));
            }
        }

        buffer.transforms_dirty = true;
        buffer.colors_dirty = buffer.colors.is_some();
    }

    /// Write this frame's transform for every particle and flag the transform
    /// sub-buffer dirty once. No-op without a buffer.
    pub fn publish(
        &mut self,
        particles: &[Particle],
        profile: &MotionProfile,
        formation: Formation,
        clock: f32,
        buffer: Option<&mut InstanceBuffer>,
    ) {
        let Some(buffer) = buffer else {
            return;
        };
        buffer.resize(particles.len());

        for (i, particle) in particles.iter().enumerate() {
            let position = particle.live_position + profile.offset(particle, formation, clock);
            self.compose(position, particle.rotation() + particle.spin, particle.scale());
            buffer.write(i, TransformRaw::from(&self.scratch));
        }

        buffer.mark_transforms_dirty();
    }

    fn compose(&mut self, position: Vec3, euler: Vec3, scale: f32) {
        self.scratch.reset();
        self.scratch.translate(position);
        self.scratch.set_euler(euler);
        self.scratch.set_uniform_scale(scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::theme;
    use procgen::{GroupKind, OrnamentVariant, ParticleField, TreeConfig};

    fn ornaments(count: usize) -> ParticleField {
        let config = TreeConfig::default().field(count);
        ParticleField::generate_seeded(GroupKind::Ornament(OrnamentVariant::Round), &config, 9)
            .unwrap()
    }

    #[test]
    fn seed_places_instances_at_scatter_targets() {
        let field = ornaments(32);
        let mut buffer = InstanceBuffer::new(field.len(), true);
        InstancePublisher::new().seed(field.particles(), Some(&mut buffer));

        for (raw, p) in buffer.transforms().iter().zip(field.particles()) {
            assert!((raw.translation() - p.scatter_target()).length() < 1e-4);
        }
        let colors = buffer.colors().unwrap();
        for (c, p) in colors.iter().zip(field.particles()) {
            assert_eq!(*c, p.color().unwrap().to_linear().to_rgba(1.0));
        }
        assert!(buffer.colors_dirty());
    }

    #[test]
    fn publish_writes_exactly_count_finite_transforms() {
        let field = ornaments(50);
        // Stale oversized buffer
        let mut buffer = InstanceBuffer::new(80, true);
        let mut publisher = InstancePublisher::new();
        let profile = MotionProfile::for_kind(field.kind());

        publisher.publish(field.particles(), &profile, Formation::Scattered, 0.0, Some(&mut buffer));

        assert_eq!(buffer.len(), 50);
        assert_eq!(buffer.colors().map(<[_]>::len), Some(50));
        assert!(buffer.transforms().iter().all(TransformRaw::is_finite));
    }

    #[test]
    fn publish_marks_transforms_dirty_but_not_colors() {
        let field = ornaments(4);
        let mut buffer = InstanceBuffer::new(4, true);
        let mut publisher = InstancePublisher::new();
        publisher.seed(field.particles(), Some(&mut buffer));
        assert!(buffer.take_transforms_dirty());
        assert!(buffer.take_colors_dirty());
        assert!(!buffer.take_transforms_dirty());

        let profile = MotionProfile::for_kind(field.kind());
        publisher.publish(field.particles(), &profile, Formation::TreeShape, 1.0, Some(&mut buffer));
        assert!(buffer.transforms_dirty());
        assert!(!buffer.colors_dirty());
    }

    #[test]
    fn missing_buffer_is_a_no_op() {
        let field = ornaments(3);
        let mut publisher = InstancePublisher::new();
        let profile = MotionProfile::default();
        publisher.seed(field.particles(), None);
        publisher.publish(field.particles(), &profile, Formation::Scattered, 0.0, None);
    }

    #[test]
    fn published_matrix_includes_spin_scale_and_offset() {
        let mut p = Particle::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::ZERO,
            Vec3::ZERO,
            2.0,
            Some(theme::GOLD),
            0.0,
        );
        p.spin = Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0);
        let profile = MotionProfile {
            float: 0.1,
            ..Default::default()
        };
        let clock = std::f32::consts::FRAC_PI_2 / crate::FLOAT_FREQUENCY;
        let mut buffer = InstanceBuffer::new(1, true);
        InstancePublisher::new().publish(
            std::slice::from_ref(&p),
            &profile,
            Formation::Scattered,
            clock,
            Some(&mut buffer),
        );

        let expected = Transform::from_euler(Vec3::new(1.0, 2.1, 3.0), p.spin, 2.0);
        let raw = buffer.transforms()[0];
        let want = TransformRaw::from(expected);
        for (a, b) in raw.model.iter().flatten().zip(want.model.iter().flatten()) {
            assert!((a - b).abs() < 1e-5);
        }
        // Offset is display-only
        assert_eq!(p.live_position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn resize_keeps_colors_in_step() {
        let mut buffer = InstanceBuffer::new(2, true);
        buffer.take_colors_dirty();
        buffer.resize(5);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.colors().map(<[_]>::len), Some(5));
        assert!(buffer.colors_dirty());

        let mut plain = InstanceBuffer::new(3, false);
        plain.resize(1);
        assert!(plain.colors().is_none());
        assert!(!plain.colors_dirty());
    }
}
