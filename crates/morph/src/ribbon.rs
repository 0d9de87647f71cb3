//! Ribbon control points that morph like particles and re-sweep their tube.

use crate::interpolator::{approach, MorphInterpolator};
use engine_core::Formation;
use procgen::{
    generate_ribbon_path, rebuild_tube, CatmullRomCurve, ConfigError, ControlPoint, ShapeMesh,
    TreeConfig, TubeParams,
};
use rand::Rng;

/// Squared distance under which a control point counts as settled.
pub const RIBBON_SETTLE_EPSILON: f32 = 0.001;

/// Morphs the ribbon path and keeps its tube mesh current.
///
/// Every rebuild bumps [`RibbonMorpher::generation`]; a renderer holding an
/// older generation replaces its GPU mesh.
#[derive(Debug)]
pub struct RibbonMorpher {
    points: Vec<ControlPoint>,
    curve: CatmullRomCurve,
    params: TubeParams,
    mesh: ShapeMesh,
    rebuild_interval: u32,
    frames_since_rebuild: u32,
    pending: bool,
    generation: u64,
}

impl RibbonMorpher {
    /// Build from explicit control points. Needs at least two.
    pub fn new(
        points: Vec<ControlPoint>,
        params: TubeParams,
        rebuild_interval: u32,
    ) -> Result<Self, ConfigError> {
        if rebuild_interval == 0 {
            return Err(ConfigError::RebuildInterval);
        }
        let curve = CatmullRomCurve::new(points.iter().map(|p| p.live).collect()).ok_or(
            ConfigError::EmptyGroup {
                group: "ribbon segment",
            },
        )?;

        let mut mesh = ShapeMesh::new();
        rebuild_tube(&curve, params, &mut mesh);

        Ok(Self {
            points,
            curve,
            params,
            mesh,
            rebuild_interval,
            frames_since_rebuild: rebuild_interval,
            pending: false,
            generation: 0,
        })
    }

    /// Generate the path from `config` and sweep the initial tube.
    pub fn generate<R: Rng + ?Sized>(config: &TreeConfig, rng: &mut R) -> Result<Self, ConfigError> {
        let points = generate_ribbon_path(config, rng)?;
        Self::new(
            points,
            TubeParams::ribbon(config.ribbon_segments),
            config.ribbon_rebuild_interval,
        )
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn curve(&self) -> &CatmullRomCurve {
        &self.curve
    }

    pub fn mesh(&self) -> &ShapeMesh {
        &self.mesh
    }

    pub fn params(&self) -> TubeParams {
        self.params
    }

    /// Incremented on every tube rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when the points moved since the last rebuild.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// True when every point is within the settle distance of its target.
    pub fn is_settled(&self, formation: Formation) -> bool {
        self.points
            .iter()
            .all(|p| p.live.distance_squared(p.target(formation)) <= RIBBON_SETTLE_EPSILON)
    }

    /// Move unsettled points toward `formation` and rebuild the tube when the
    /// interval allows. Returns true if the mesh was rebuilt this frame.
    pub fn step(
        &mut self,
        interpolator: &MorphInterpolator,
        formation: Formation,
        delta_time: f32,
    ) -> bool {
        let smoothing = interpolator.smoothing(delta_time, 1.0);
        let mut moved = false;

        for point in &mut self.points {
            let target = point.target(formation);
            if point.live.distance_squared(target) <= RIBBON_SETTLE_EPSILON {
                continue;
            }
            let next = approach(point.live, target, smoothing);
            if next != point.live {
                point.live = next;
                moved = true;
            }
        }

        self.pending |= moved;
        self.frames_since_rebuild = self.frames_since_rebuild.saturating_add(1);

        if self.pending && self.frames_since_rebuild >= self.rebuild_interval {
            self.rebuild();
            true
        } else {
            false
        }
    }

    fn rebuild(&mut self) {
        self.curve.set_points(self.points.iter().map(|p| p.live));
        rebuild_tube(&self.curve, self.params, &mut self.mesh);
        self.generation += 1;
        self.pending = false;
        self.frames_since_rebuild = 0;
        log::debug!(
            "Ribbon tube rebuilt (generation {}, {} vertices)",
            self.generation,
            self.mesh.vertices.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config(interval: u32) -> TreeConfig {
        TreeConfig {
            ribbon_segments: 24,
            ribbon_rebuild_interval: interval,
            ..Default::default()
        }
    }

    fn morpher(interval: u32) -> RibbonMorpher {
        let mut rng = StdRng::seed_from_u64(11);
        RibbonMorpher::generate(&small_config(interval), &mut rng).unwrap()
    }

    #[test]
    fn initial_tube_matches_segment_count() {
        let ribbon = morpher(1);
        assert_eq!(ribbon.points().len(), 25);
        assert_eq!(ribbon.mesh().vertices.len(), 25 * 9);
        assert_eq!(ribbon.generation(), 0);
    }

    #[test]
    fn moving_points_rebuild_every_frame() {
        let mut ribbon = morpher(1);
        let interp = MorphInterpolator::new(2.0);
        for frame in 1..=5 {
            assert!(ribbon.step(&interp, Formation::TreeShape, 1.0 / 60.0));
            assert_eq!(ribbon.generation(), frame);
        }
    }

    #[test]
    fn settled_ribbon_stops_rebuilding() {
        let mut ribbon = morpher(1);
        let interp = MorphInterpolator::new(2.0);
        // Snap
        assert!(ribbon.step(&interp, Formation::TreeShape, 10.0));
        assert!(ribbon.is_settled(Formation::TreeShape));
        let generation = ribbon.generation();
        assert!(!ribbon.step(&interp, Formation::TreeShape, 1.0 / 60.0));
        assert_eq!(ribbon.generation(), generation);
    }

    #[test]
    fn zero_delta_does_not_rebuild() {
        let mut ribbon = morpher(1);
        let interp = MorphInterpolator::new(2.0);
        let before: Vec<Vec3> = ribbon.points().iter().map(|p| p.live).collect();
        assert!(!ribbon.step(&interp, Formation::TreeShape, 0.0));
        let after: Vec<Vec3> = ribbon.points().iter().map(|p| p.live).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn skipped_rebuilds_catch_up_later() {
        let mut ribbon = morpher(3);
        let interp = MorphInterpolator::new(2.0);

        // First movement rebuilds immediately
        assert!(ribbon.step(&interp, Formation::TreeShape, 1.0 / 60.0));
        assert!(!ribbon.step(&interp, Formation::TreeShape, 1.0 / 60.0));
        assert!(ribbon.is_pending());
        assert!(!ribbon.step(&interp, Formation::TreeShape, 1.0 / 60.0));
        assert!(ribbon.step(&interp, Formation::TreeShape, 1.0 / 60.0));
        assert_eq!(ribbon.generation(), 2);

        // A settled path still flushes the owed rebuild
        assert!(!ribbon.step(&interp, Formation::TreeShape, 10.0));
        assert!(ribbon.is_pending());
        assert!(!ribbon.step(&interp, Formation::TreeShape, 0.0));
        assert!(ribbon.step(&interp, Formation::TreeShape, 0.0));
        assert!(!ribbon.is_pending());
        let centre = ribbon.curve().point_at(0.0);
        assert!((centre - ribbon.points()[0].tree_target()).length() < 1e-4);
    }

    #[test]
    fn rejects_degenerate_input() {
        let one = vec![ControlPoint::new(Vec3::ZERO, Vec3::Y)];
        assert!(RibbonMorpher::new(one, TubeParams::ribbon(1), 1).is_err());
        let two = vec![
            ControlPoint::new(Vec3::ZERO, Vec3::Y),
            ControlPoint::new(Vec3::X, Vec3::Y * 2.0),
        ];
        assert_eq!(
            RibbonMorpher::new(two, TubeParams::ribbon(1), 0).err(),
            Some(ConfigError::RebuildInterval)
        );
    }
}
