//! Random sampling of scatter positions.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Uniform-density random point inside a sphere of `radius` centred at the origin.
///
/// The cube root on the radius keeps the density even through the volume, and
/// `acos(2v - 1)` keeps the polar angle from bunching at the poles.
pub fn random_in_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = TAU * rng.gen::<f32>();
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let r = rng.gen::<f32>().cbrt() * radius;

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Uniformly distributed unit direction.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = TAU * rng.gen::<f32>();
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Uniform-density random point in the spherical shell between `inner` and
/// `outer`. The bounds may be given in either order.
pub fn random_in_shell<R: Rng + ?Sized>(rng: &mut R, inner: f32, outer: f32) -> Vec3 {
    let (inner, outer) = (inner.min(outer), inner.max(outer));
    let (inner_cubed, outer_cubed) = (inner.powi(3), outer.powi(3));
    let r = (inner_cubed + rng.gen::<f32>() * (outer_cubed - inner_cubed))
        .cbrt()
        .clamp(inner, outer);
    random_direction(rng) * r
}

/// Uniform random point inside an axis-aligned cube of the given half-extent.
pub fn random_in_cube<R: Rng + ?Sized>(rng: &mut R, half_extent: f32) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * 2.0 * half_extent,
        (rng.gen::<f32>() - 0.5) * 2.0 * half_extent,
        (rng.gen::<f32>() - 0.5) * 2.0 * half_extent,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sphere_samples_stay_inside_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5000 {
            assert!(random_in_sphere(&mut rng, 35.0).length() <= 35.0 + 1e-3);
        }
    }

    /// With uniform volume density the inner half of the radius holds 1/8 of the
    /// points and the outer shell between 0.8R and R holds about 49%.
    #[test]
    fn sphere_samples_fill_the_volume() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 20_000;
        let mut inner = 0;
        let mut outer = 0;
        for _ in 0..n {
            let d = random_in_sphere(&mut rng, 1.0).length();
            if d < 0.5 {
                inner += 1;
            }
            if d >= 0.8 {
                outer += 1;
            }
        }
        let inner_frac = inner as f32 / n as f32;
        let outer_frac = outer as f32 / n as f32;
        assert!((inner_frac - 0.125).abs() < 0.02, "inner fraction {inner_frac}");
        assert!((outer_frac - 0.488).abs() < 0.03, "outer fraction {outer_frac}");
    }

    #[test]
    fn sphere_samples_cover_both_hemispheres_evenly() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = 10_000;
        let upper = (0..n).filter(|_| random_in_sphere(&mut rng, 1.0).z > 0.0).count();
        let frac = upper as f32 / n as f32;
        assert!((frac - 0.5).abs() < 0.03);
    }

    #[test]
    fn shell_samples_stay_between_the_radii() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..5000 {
            let d = random_in_shell(&mut rng, 100.0, 150.0).length();
            assert!((100.0 - 1e-2..=150.0 + 1e-2).contains(&d), "distance {d}");
        }
        let d = random_in_shell(&mut rng, 20.0, 10.0).length();
        assert!((10.0 - 1e-3..=20.0 + 1e-3).contains(&d));
    }

    /// Volume density puts more stars near the outer radius: the outer half
    /// of a [1, 2] shell holds (8 - 3.375) / 7 of them.
    #[test]
    fn shell_samples_favor_the_outer_radius() {
        let mut rng = StdRng::seed_from_u64(17);
        let n = 20_000;
        let outer = (0..n)
            .filter(|_| random_in_shell(&mut rng, 1.0, 2.0).length() >= 1.5)
            .count();
        let frac = outer as f32 / n as f32;
        assert!((frac - 0.661).abs() < 0.02, "outer fraction {frac}");
    }

    #[test]
    fn directions_are_unit_length() {
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..1000 {
            assert!((random_direction(&mut rng).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cube_samples_stay_inside_extent() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let p = random_in_cube(&mut rng, 25.0);
            assert!(p.abs().max_element() <= 25.0);
        }
    }
}
