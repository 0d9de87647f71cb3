//! Open tube surface swept along a curve.

use crate::curve::CatmullRomCurve;
use crate::shapes::{ShapeMesh, ShapeVertex};
use glam::{Quat, Vec2, Vec3};
use std::f32::consts::TAU;

/// Cross-section parameters for a swept tube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeParams {
    pub tubular_segments: usize,
    pub radius: f32,
    pub radial_segments: usize,
}

impl TubeParams {
    pub const RIBBON_RADIUS: f32 = 0.4;
    pub const RIBBON_RADIAL_SEGMENTS: usize = 8;

    /// Ribbon cross-section with `tubular_segments` rings along the path.
    pub fn ribbon(tubular_segments: usize) -> Self {
        Self {
            tubular_segments,
            radius: Self::RIBBON_RADIUS,
            radial_segments: Self::RIBBON_RADIAL_SEGMENTS,
        }
    }

    pub fn vertex_count(&self) -> usize {
        (self.tubular_segments + 1) * (self.radial_segments + 1)
    }

    pub fn index_count(&self) -> usize {
        self.tubular_segments * self.radial_segments * 6
    }
}

/// Tangent/normal/binormal at one sample along a curve.
#[derive(Debug, Clone, Copy)]
struct Frame {
    tangent: Vec3,
    normal: Vec3,
    binormal: Vec3,
}

/// Rotation-minimizing frames: each normal is the previous one carried over
/// by the rotation between consecutive tangents, then re-orthogonalized.
fn transport_frames(curve: &CatmullRomCurve, samples: usize) -> Vec<Frame> {
    let last = (samples.max(2) - 1) as f32;
    let mut frames: Vec<Frame> = Vec::with_capacity(samples);

    for i in 0..samples {
        let tangent = curve.tangent_at(i as f32 / last);
        let normal = match frames.last() {
            None => {
                let seed = if tangent.y.abs() > 0.9 { Vec3::X } else { Vec3::Y };
                (seed - tangent * seed.dot(tangent)).normalize_or_zero()
            }
            Some(prev) => {
                let axis = prev.tangent.cross(tangent);
                let mut carried = prev.normal;
                if axis.length_squared() > 1e-16 {
                    let angle = prev.tangent.dot(tangent).clamp(-1.0, 1.0).acos();
                    carried = Quat::from_axis_angle(axis.normalize(), angle) * carried;
                }
                let mut n = (carried - tangent * carried.dot(tangent)).normalize_or_zero();
                if n == Vec3::ZERO {
                    n = prev.normal;
                }
                if n.dot(prev.normal) < 0.0 {
                    -n
                } else {
                    n
                }
            }
        };
        frames.push(Frame {
            tangent,
            normal,
            binormal: tangent.cross(normal).normalize_or_zero(),
        });
    }
    frames
}

/// Sweep a circle of `params.radius` along `curve`. Ends are left open.
///
/// Produces `(tubular + 1) * (radial + 1)` vertices; the seam column is
/// duplicated so UVs wrap cleanly.
pub fn build_tube(curve: &CatmullRomCurve, params: TubeParams) -> ShapeMesh {
    let mut mesh = ShapeMesh {
        vertices: Vec::with_capacity(params.vertex_count()),
        indices: Vec::with_capacity(params.index_count()),
    };
    rebuild_tube(curve, params, &mut mesh);
    mesh
}

/// Like [`build_tube`], but reuses the allocations of an existing mesh.
pub fn rebuild_tube(curve: &CatmullRomCurve, params: TubeParams, mesh: &mut ShapeMesh) {
    mesh.vertices.clear();
    mesh.indices.clear();

    let tubular = params.tubular_segments.max(1);
    let radial = params.radial_segments.max(3);
    let frames = transport_frames(curve, tubular + 1);

    for (j, frame) in frames.iter().enumerate() {
        let u = j as f32 / tubular as f32;
        let centre = curve.point_at(u);
        for i in 0..=radial {
            let v = i as f32 / radial as f32;
            let (sin, cos) = (v * TAU).sin_cos();
            let dir = frame.normal * cos + frame.binormal * sin;
            mesh.vertices.push(ShapeVertex::new(
                centre + dir * params.radius,
                dir,
                Vec2::new(u, v),
            ));
        }
    }

    let ring = (radial + 1) as u32;
    for j in 0..tubular as u32 {
        for i in 0..radial as u32 {
            let a = j * ring + i;
            let b = (j + 1) * ring + i;
            let c = b + 1;
            let d = a + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helix(n: usize) -> CatmullRomCurve {
        let points = (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1) as f32;
                let a = t * TAU * 3.0;
                Vec3::new(a.cos() * 4.0, t * 10.0, a.sin() * 4.0)
            })
            .collect();
        CatmullRomCurve::new(points).unwrap()
    }

    #[test]
    fn vertex_and_index_counts_match_params() {
        let params = TubeParams::ribbon(50);
        let mesh = build_tube(&helix(30), params);
        assert_eq!(mesh.vertices.len(), 51 * 9);
        assert_eq!(mesh.indices.len(), 50 * 8 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn vertices_sit_at_radius_from_the_curve() {
        let curve = helix(20);
        let params = TubeParams::ribbon(40);
        let mesh = build_tube(&curve, params);
        let ring = params.radial_segments + 1;
        for (j, chunk) in mesh.vertices.chunks(ring).enumerate() {
            let centre = curve.point_at(j as f32 / 40.0);
            for v in chunk {
                let d = (Vec3::from(v.position) - centre).length();
                assert!((d - TubeParams::RIBBON_RADIUS).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn normals_are_perpendicular_to_the_path() {
        let curve = helix(20);
        let frames = transport_frames(&curve, 60);
        for f in &frames {
            assert!(f.normal.dot(f.tangent).abs() < 1e-3);
            assert!((f.normal.length() - 1.0).abs() < 1e-3);
        }
        for pair in frames.windows(2) {
            assert!(pair[0].normal.dot(pair[1].normal) > 0.0);
        }
    }

    #[test]
    fn vertical_line_still_gets_a_frame() {
        let curve = CatmullRomCurve::new(vec![Vec3::ZERO, Vec3::Y * 5.0]).unwrap();
        let mesh = build_tube(&curve, TubeParams::ribbon(4));
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.position.iter().all(|c| c.is_finite())));
        let r = Vec3::new(mesh.vertices[0].position[0], 0.0, mesh.vertices[0].position[2]);
        assert!((r.length() - TubeParams::RIBBON_RADIUS).abs() < 1e-4);
    }

    #[test]
    fn rebuild_reuses_the_mesh() {
        let params = TubeParams::ribbon(10);
        let mut mesh = build_tube(&helix(8), params);
        let straight = CatmullRomCurve::new(vec![Vec3::ZERO, Vec3::X * 3.0]).unwrap();
        rebuild_tube(&straight, params, &mut mesh);
        assert_eq!(mesh.vertices.len(), params.vertex_count());
        assert!(mesh.vertices.iter().all(|v| v.position[0] >= -1e-4));
    }
}
