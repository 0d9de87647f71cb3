//! A particle field together with its motion profile and instance buffer.

use crate::interpolator::MorphInterpolator;
use crate::motion::MotionProfile;
use crate::publisher::{InstanceBuffer, InstancePublisher};
use engine_core::{Formation, Transform, TransformRaw};
use procgen::{GroupKind, Particle, ParticleField};

/// One instanced group: generate once, then update and publish every frame.
#[derive(Debug)]
pub struct ParticleGroup {
    field: ParticleField,
    profile: MotionProfile,
    publisher: InstancePublisher,
    buffer: Option<InstanceBuffer>,
}

impl ParticleGroup {
    /// Wrap a field with the standard profile for its kind. No buffer is
    /// attached yet.
    pub fn new(field: ParticleField) -> Self {
        let profile = MotionProfile::for_kind(field.kind());
        Self::with_profile(field, profile)
    }

    pub fn with_profile(field: ParticleField, profile: MotionProfile) -> Self {
        Self {
            field,
            profile,
            publisher: InstancePublisher::new(),
            buffer: None,
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.field.kind()
    }

    pub fn len(&self) -> usize {
        self.field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        self.field.particles()
    }

    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Create the instance buffer and seed it from the scatter targets.
    pub fn attach_buffer(&mut self) -> &mut InstanceBuffer {
        let mut buffer = InstanceBuffer::new(self.field.len(), self.field.has_colors());
        self.publisher.seed(self.field.particles(), Some(&mut buffer));
        self.buffer.insert(buffer)
    }

    pub fn buffer(&self) -> Option<&InstanceBuffer> {
        self.buffer.as_ref()
    }

    pub fn buffer_mut(&mut self) -> Option<&mut InstanceBuffer> {
        self.buffer.as_mut()
    }

    /// Move live positions and accumulate spin for one frame.
    pub fn update(&mut self, interpolator: &MorphInterpolator, formation: Formation, delta_time: f32) {
        interpolator.step(self.field.particles_mut(), formation, delta_time, &self.profile);
    }

    /// Write this frame's transforms into the attached buffer, if any.
    pub fn publish(&mut self, formation: Formation, clock: f32) {
        self.publisher.publish(
            self.field.particles(),
            &self.profile,
            formation,
            clock,
            self.buffer.as_mut(),
        );
    }

    pub fn frame(
        &mut self,
        interpolator: &MorphInterpolator,
        formation: Formation,
        delta_time: f32,
        clock: f32,
    ) {
        self.update(interpolator, formation, delta_time);
        self.publish(formation, clock);
    }
}

/// Pulsing glow copy of the star, drawn into its own one-slot buffer.
#[derive(Debug)]
pub struct StarHalo {
    buffer: InstanceBuffer,
    scratch: Transform,
}

impl StarHalo {
    pub const PULSE_BASE: f32 = 1.1;
    pub const PULSE_AMPLITUDE: f32 = 0.1;
    pub const PULSE_FREQUENCY: f32 = 4.0;

    pub fn new() -> Self {
        Self {
            buffer: InstanceBuffer::new(1, false),
            scratch: Transform::default(),
        }
    }

    /// Scale multiplier at scene time `clock`.
    pub fn pulse(clock: f32) -> f32 {
        Self::PULSE_BASE + (clock * Self::PULSE_FREQUENCY).sin() * Self::PULSE_AMPLITUDE
    }

    /// Mirror the star's displayed position and rotation with a pulsing scale.
    pub fn publish(&mut self, star: &ParticleGroup, formation: Formation, clock: f32) {
        let Some(particle) = star.particles().first() else {
            return;
        };
        let offset = star.profile().offset(particle, formation, clock);

        self.scratch.reset();
        self.scratch.translate(particle.live_position + offset);
        self.scratch.set_euler(particle.rotation() + particle.spin);
        self.scratch.set_uniform_scale(particle.scale() * Self::pulse(clock));

        self.buffer.resize(1);
        self.buffer.write(0, TransformRaw::from(&self.scratch));
        self.buffer.mark_transforms_dirty();
    }

    pub fn buffer(&self) -> &InstanceBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut InstanceBuffer {
        &mut self.buffer
    }
}

impl Default for StarHalo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use procgen::TreeConfig;

    fn star() -> ParticleGroup {
        let config = TreeConfig::default().field(1);
        ParticleGroup::new(ParticleField::generate_seeded(GroupKind::Star, &config, 5).unwrap())
    }

    #[test]
    fn unattached_group_still_animates() {
        let mut group = star();
        let interp = MorphInterpolator::new(2.0);
        group.frame(&interp, Formation::TreeShape, 10.0, 0.0);
        assert!(group.buffer().is_none());
        assert_eq!(group.particles()[0].live_position, group.particles()[0].tree_target());
    }

    #[test]
    fn attached_buffer_is_seeded_and_sized() {
        let config = TreeConfig::default().field(64);
        let field = ParticleField::generate_seeded(GroupKind::Gift, &config, 6).unwrap();
        let mut group = ParticleGroup::new(field);
        let buffer = group.attach_buffer();
        assert_eq!(buffer.len(), 64);
        assert!(buffer.colors().is_some());
        assert!(buffer.transforms_dirty());
    }

    #[test]
    fn halo_follows_star_with_pulsing_scale() {
        let mut group = star();
        group.attach_buffer();
        let interp = MorphInterpolator::new(2.0);
        group.frame(&interp, Formation::TreeShape, 10.0, 0.0);

        let mut halo = StarHalo::new();
        let clock = std::f32::consts::FRAC_PI_2 / StarHalo::PULSE_FREQUENCY;
        halo.publish(&group, Formation::TreeShape, clock);

        let star_pos = group.buffer().unwrap().transforms()[0];
        let halo_raw = halo.buffer().transforms()[0];
        // Same frame, different clock: compare against the star's own offset
        let p = &group.particles()[0];
        let expected = p.live_position + group.profile().offset(p, Formation::TreeShape, clock);
        assert!((halo_raw.translation() - expected).length() < 1e-5);
        assert!(star_pos.is_finite());

        let column = Vec3::new(halo_raw.model[0][0], halo_raw.model[0][1], halo_raw.model[0][2]);
        assert!((column.length() - 1.2).abs() < 1e-4);
        assert!(halo.buffer().transforms_dirty());
    }
}
