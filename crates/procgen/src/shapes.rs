//! CPU-side mesh data and the primitive shapes each particle group is drawn with.

use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Vertex with position, normal and UV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl ShapeVertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            uv: uv.into(),
        }
    }
}

/// Indexed triangle mesh before GPU upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeMesh {
    pub vertices: Vec<ShapeVertex>,
    pub indices: Vec<u32>,
}

impl ShapeMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a flat-shaded triangle (own vertices, face normal).
    pub fn push_flat_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let base = self.vertices.len() as u32;
        self.vertices.push(ShapeVertex::new(a, normal, Vec2::new(0.0, 0.0)));
        self.vertices.push(ShapeVertex::new(b, normal, Vec2::new(1.0, 0.0)));
        self.vertices.push(ShapeVertex::new(c, normal, Vec2::new(0.5, 1.0)));
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Regular tetrahedron with vertices on a sphere of `radius`.
    pub fn tetrahedron(radius: f32) -> Self {
        let corners = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ]
        .map(|v| v.normalize() * radius);

        let mut mesh = Self::new();
        for [a, b, c] in [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]] {
            mesh.push_flat_triangle(corners[a], corners[b], corners[c]);
        }
        mesh
    }

    /// Octahedron with vertices on a sphere of `radius`; a sharp diamond.
    pub fn octahedron(radius: f32) -> Self {
        let c = [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z].map(|v| v * radius);
        let faces = [
            [0, 2, 4],
            [0, 4, 3],
            [0, 3, 5],
            [0, 5, 2],
            [1, 2, 5],
            [1, 5, 3],
            [1, 3, 4],
            [1, 4, 2],
        ];
        let mut mesh = Self::new();
        for [a, b, cc] in faces {
            mesh.push_flat_triangle(c[a], c[b], c[cc]);
        }
        mesh
    }

    /// Icosahedron subdivided `detail` times per edge and projected onto a
    /// sphere of `radius`, with smooth normals. `detail = 0` is the plain icosahedron.
    pub fn icosphere(radius: f32, detail: u32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let corners = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ];
        #[rustfmt::skip]
        let faces: [[usize; 3]; 20] = [
            [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
            [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
            [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
            [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
        ];

        let n = detail + 1;
        let mut mesh = Self::new();
        let mut push = |p: Vec3| {
            let dir = p.normalize();
            let uv = Vec2::new(
                0.5 + dir.z.atan2(dir.x) / TAU,
                0.5 - dir.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI,
            );
            mesh.vertices.push(ShapeVertex::new(dir * radius, dir, uv));
            mesh.indices.push(mesh.vertices.len() as u32 - 1);
        };

        for [a, b, c] in faces {
            let (a, b, c) = (corners[a], corners[b], corners[c]);
            let grid = |i: u32, j: u32| a + (b - a) * (i as f32 / n as f32) + (c - a) * (j as f32 / n as f32);
            for i in 0..n {
                for j in 0..(n - i) {
                    push(grid(i, j));
                    push(grid(i + 1, j));
                    push(grid(i, j + 1));
                    if j + 1 < n - i {
                        push(grid(i + 1, j));
                        push(grid(i + 1, j + 1));
                        push(grid(i, j + 1));
                    }
                }
            }
        }
        mesh
    }

    /// Axis-aligned box centred at the origin.
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        let mut mesh = Self::new();
        // (normal, u axis, v axis) per face
        let faces = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, -Vec3::X, Vec3::Y),
            (Vec3::Y, Vec3::X, -Vec3::Z),
            (-Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::X, -Vec3::Z, Vec3::Y),
            (-Vec3::X, Vec3::Z, Vec3::Y),
        ];
        for (normal, u, v) in faces {
            let base = mesh.vertices.len() as u32;
            let centre = normal * h;
            let du = u * h;
            let dv = v * h;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = centre + du * su + dv * sv;
                let uv = Vec2::new((su + 1.0) * 0.5, (1.0 - sv) * 0.5);
                mesh.vertices.push(ShapeVertex::new(p, normal, uv));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }
        mesh
    }

    /// Extruded star: `points` tips alternating between `outer` and `inner`
    /// radius in the XY plane (first tip pointing up), `depth` thick, centred on Z.
    pub fn star_prism(points: u32, outer: f32, inner: f32, depth: f32) -> Self {
        let outline: Vec<Vec3> = (0..points * 2)
            .map(|i| {
                let r = if i % 2 == 0 { outer } else { inner };
                let angle = (i as f32 / (points * 2) as f32) * TAU + FRAC_PI_2;
                Vec3::new(angle.cos() * r, angle.sin() * r, 0.0)
            })
            .collect();

        let front = Vec3::Z * (depth * 0.5);
        let back = -front;
        let mut mesh = Self::new();
        let count = outline.len();
        for i in 0..count {
            let a = outline[i];
            let b = outline[(i + 1) % count];
            mesh.push_flat_triangle(front, a + front, b + front);
            mesh.push_flat_triangle(back, b + back, a + back);
            mesh.push_flat_triangle(a + back, b + back, b + front);
            mesh.push_flat_triangle(a + back, b + front, a + front);
        }
        mesh
    }
}
