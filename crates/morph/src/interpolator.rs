//! Exponential-style approach of live positions toward their targets.

use crate::motion::MotionProfile;
use engine_core::Formation;
use glam::Vec3;
use procgen::Particle;
use std::f32::consts::TAU;

/// Fraction of the remaining distance covered this frame.
///
/// `delta_time * speed * multiplier`, clamped to `[0, 1]` so a long frame
/// snaps to the target instead of overshooting. NaN maps to zero.
pub fn smoothing_factor(delta_time: f32, speed: f32, multiplier: f32) -> f32 {
    let s = delta_time * speed * multiplier;
    if s.is_nan() {
        0.0
    } else {
        s.clamp(0.0, 1.0)
    }
}

/// Move `current` toward `target` by `smoothing`. A factor of 1 lands exactly
/// on the target; 0 leaves `current` untouched.
pub fn approach(current: Vec3, target: Vec3, smoothing: f32) -> Vec3 {
    if smoothing >= 1.0 {
        target
    } else if smoothing <= 0.0 {
        current
    } else {
        current.lerp(target, smoothing)
    }
}

/// Moves particles toward the active formation at a shared base speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphInterpolator {
    animation_speed: f32,
}

impl MorphInterpolator {
    pub fn new(animation_speed: f32) -> Self {
        Self { animation_speed }
    }

    pub fn animation_speed(&self) -> f32 {
        self.animation_speed
    }

    /// Smoothing for one frame at the given group multiplier.
    pub fn smoothing(&self, delta_time: f32, multiplier: f32) -> f32 {
        smoothing_factor(delta_time, self.animation_speed, multiplier)
    }

    /// Advance every particle one frame: approach the target for `formation`
    /// and accumulate the profile's spin.
    pub fn step(
        &self,
        particles: &mut [Particle],
        formation: Formation,
        delta_time: f32,
        profile: &MotionProfile,
    ) {
        let smoothing = self.smoothing(delta_time, profile.speed_multiplier);
        let spin = profile.spin_step(delta_time, formation);

        for particle in particles.iter_mut() {
            let target = particle.target(formation);
            particle.live_position = approach(particle.live_position, target, smoothing);
            if spin != Vec3::ZERO {
                particle.spin = wrap_angles(particle.spin + spin);
            }
        }
    }
}

fn wrap_angles(angles: Vec3) -> Vec3 {
    Vec3::new(
        angles.x.rem_euclid(TAU),
        angles.y.rem_euclid(TAU),
        angles.z.rem_euclid(TAU),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::{GroupKind, ParticleField, TreeConfig};

    fn particle(scatter: Vec3, tree: Vec3) -> Particle {
        Particle::new(scatter, tree, Vec3::ZERO, 1.0, None, 0.0)
    }

    fn field(seed: u64) -> ParticleField {
        let config = TreeConfig::default().field(200);
        ParticleField::generate_seeded(GroupKind::Foliage, &config, seed).unwrap()
    }

    #[test]
    fn smoothing_is_clamped() {
        assert_eq!(smoothing_factor(0.0, 2.0, 1.0), 0.0);
        assert_eq!(smoothing_factor(10.0, 2.0, 1.0), 1.0);
        assert_eq!(smoothing_factor(-1.0, 2.0, 1.0), 0.0);
        assert_eq!(smoothing_factor(f32::NAN, 2.0, 1.0), 0.0);
        assert!((smoothing_factor(0.1, 2.0, 0.6) - 0.12).abs() < 1e-6);
    }

    #[test]
    fn zero_delta_leaves_positions_unchanged() {
        let mut field = field(1);
        let profile = MotionProfile::for_kind(GroupKind::Foliage);
        let interp = MorphInterpolator::new(2.0);
        let before: Vec<_> = field.particles().iter().map(|p| (p.live_position, p.spin)).collect();

        interp.step(field.particles_mut(), Formation::TreeShape, 0.0, &profile);

        let after: Vec<_> = field.particles().iter().map(|p| (p.live_position, p.spin)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn holding_tree_shape_converges_monotonically() {
        let mut field = field(2);
        let profile = MotionProfile::for_kind(GroupKind::Foliage);
        let interp = MorphInterpolator::new(2.0);
        let dt = 1.0 / 60.0;

        let mut last: Vec<f32> = field
            .particles()
            .iter()
            .map(|p| p.live_position.distance(p.tree_target()))
            .collect();
        for _ in 0..600 {
            interp.step(field.particles_mut(), Formation::TreeShape, dt, &profile);
            for (p, prev) in field.particles().iter().zip(last.iter_mut()) {
                let d = p.live_position.distance(p.tree_target());
                assert!(d <= *prev + 1e-5);
                *prev = d;
            }
        }
        assert!(last.iter().all(|&d| d < 1e-3), "max {:?}", last.iter().cloned().fold(0.0, f32::max));
    }

    #[test]
    fn huge_delta_snaps_exactly() {
        let mut field = field(3);
        let profile = MotionProfile::for_kind(GroupKind::Gift);
        MorphInterpolator::new(2.0).step(field.particles_mut(), Formation::TreeShape, 100.0, &profile);
        for p in field.particles() {
            assert_eq!(p.live_position, p.tree_target());
        }
    }

    #[test]
    fn three_particles_snap_in_one_tick() {
        let mut particles = vec![
            particle(Vec3::new(0.01, 0.0, 0.0), Vec3::new(0.0, 5.0, 0.0)),
            particle(Vec3::new(0.0, -0.02, 0.0), Vec3::new(0.0, 5.0, 0.0)),
            particle(Vec3::new(0.0, 0.0, 0.015), Vec3::new(0.0, 5.0, 0.0)),
        ];
        let profile = MotionProfile::for_kind(GroupKind::Foliage);
        // 0.5 * 2.0 * 1.0 = 1.0
        MorphInterpolator::new(2.0).step(&mut particles, Formation::TreeShape, 0.5, &profile);
        for p in &particles {
            assert_eq!(p.live_position, Vec3::new(0.0, 5.0, 0.0));
        }
    }

    #[test]
    fn toggle_round_trip_returns_to_scatter() {
        let mut field = field(4);
        let profile = MotionProfile::for_kind(GroupKind::Foliage);
        let interp = MorphInterpolator::new(2.0);
        let dt = 1.0 / 60.0;

        for _ in 0..20 {
            interp.step(field.particles_mut(), Formation::TreeShape, dt, &profile);
        }
        for _ in 0..600 {
            interp.step(field.particles_mut(), Formation::Scattered, dt, &profile);
        }
        for p in field.particles() {
            assert!(p.live_position.distance(p.scatter_target()) < 1e-3);
        }
    }

    #[test]
    fn spin_only_accumulates_when_the_profile_allows() {
        let mut gifts = vec![particle(Vec3::ZERO, Vec3::Y)];
        let profile = MotionProfile::for_kind(GroupKind::Gift);
        let interp = MorphInterpolator::new(2.0);

        interp.step(&mut gifts, Formation::Scattered, 0.5, &profile);
        assert!((gifts[0].spin - Vec3::new(0.1, 0.1, 0.0)).length() < 1e-6);

        interp.step(&mut gifts, Formation::TreeShape, 0.5, &profile);
        assert!((gifts[0].spin - Vec3::new(0.1, 0.1, 0.0)).length() < 1e-6);
    }

    #[test]
    fn spin_stays_wrapped() {
        let mut star = vec![particle(Vec3::ZERO, Vec3::Y)];
        let profile = MotionProfile::for_kind(GroupKind::Star);
        let interp = MorphInterpolator::new(2.0);
        for _ in 0..1000 {
            interp.step(&mut star, Formation::TreeShape, 0.1, &profile);
        }
        assert!(star[0].spin.y >= 0.0 && star[0].spin.y < TAU);
    }
}
