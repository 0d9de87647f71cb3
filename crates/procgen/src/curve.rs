//! Smooth interpolating curve through ordered control points.

use glam::Vec3;

/// Uniform Catmull-Rom spline passing through every point, parameterised by
/// `u` in `[0, 1]` over the whole path.
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    tension: f32,
}

impl CatmullRomCurve {
    /// Standard tension for a uniform Catmull-Rom spline.
    pub const DEFAULT_TENSION: f32 = 0.5;

    /// Build a curve through `points`. Needs at least two points.
    pub fn new(points: Vec<Vec3>) -> Option<Self> {
        (points.len() >= 2).then_some(Self {
            points,
            tension: Self::DEFAULT_TENSION,
        })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Replace the control points in place, keeping the allocation.
    pub fn set_points(&mut self, points: impl IntoIterator<Item = Vec3>) {
        self.points.clear();
        self.points.extend(points);
    }

    pub fn point_at(&self, u: f32) -> Vec3 {
        let n = self.points.len();
        if n < 2 {
            return self.points.first().copied().unwrap_or(Vec3::ZERO);
        }
        let u = u.clamp(0.0, 1.0);
        let scaled = u * (n - 1) as f32;
        let i1 = (scaled.floor() as usize).min(n - 2);
        let t = scaled - i1 as f32;

        let i0 = i1.saturating_sub(1);
        let i2 = i1 + 1;
        let i3 = (i1 + 2).min(n - 1);

        catmull_rom(
            self.points[i0],
            self.points[i1],
            self.points[i2],
            self.points[i3],
            t,
            self.tension,
        )
    }

    /// Unit tangent by central difference.
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        let eps = 0.0005;
        let a = self.point_at((u - eps).max(0.0));
        let b = self.point_at((u + eps).min(1.0));
        (b - a).normalize_or_zero()
    }
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32, tension: f32) -> Vec3 {
    // Cubic Hermite form
    let v0 = (p2 - p0) * tension;
    let v1 = (p3 - p1) * tension;

    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    p1 * h00 + v0 * h10 + p2 * h01 + v1 * h11
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_two_points() {
        assert!(CatmullRomCurve::new(vec![Vec3::ZERO]).is_none());
        assert!(CatmullRomCurve::new(vec![Vec3::ZERO, Vec3::X]).is_some());
    }

    #[test]
    fn passes_through_control_points() {
        let pts = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 1.0, 1.0),
            Vec3::new(4.0, 4.0, -2.0),
        ];
        let curve = CatmullRomCurve::new(pts.clone()).unwrap();
        for (i, p) in pts.iter().enumerate() {
            let u = i as f32 / 3.0;
            assert!((curve.point_at(u) - *p).length() < 1e-4, "point {i}");
        }
    }

    #[test]
    fn straight_line_tangent_points_along_it() {
        let curve =
            CatmullRomCurve::new(vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0, Vec3::X * 3.0]).unwrap();
        assert!((curve.tangent_at(0.5) - Vec3::X).length() < 1e-3);
        assert!((curve.point_at(0.5) - Vec3::X * 1.5).length() < 1e-4);
    }

    #[test]
    fn set_points_replaces_the_path() {
        let mut curve = CatmullRomCurve::new(vec![Vec3::ZERO, Vec3::X]).unwrap();
        curve.set_points([Vec3::Y, Vec3::Y * 2.0, Vec3::Y * 3.0]);
        assert_eq!(curve.points().len(), 3);
        assert!((curve.point_at(1.0) - Vec3::Y * 3.0).length() < 1e-5);
    }
}
