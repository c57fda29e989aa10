//! Common sampling functions.

use crate::common::*;
use crate::geometry::*;

/// Uniformly sample a direction from a sphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_sphere(u: Vec2) -> Vec3 {
    let z = 1.0 - 2.0 * u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Uniformly sample a direction on a hemisphere about the z-axis.
///
/// * `u` - The random sample point.
pub fn uniform_sample_hemisphere(u: Vec2) -> Vec3 {
    let z = u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. The concentric mapping takes points in [-1, 1]^2 to unit disk by
/// uniformly mapping concentric squares to concentric circles.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: Vec2) -> Vec2 {
    // Map uniform random numbers to [-1,1]^2.
    let u_offset = 2.0 * u - Vec2::ONE;

    // Handle degeneracy at the origin.
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Vec2::ZERO;
    }

    // Apply concentric mapping to point
    let (r, theta) = if u_offset.x.abs() > u_offset.y.abs() {
        (u_offset.x, PI_OVER_FOUR * (u_offset.y / u_offset.x))
    } else {
        (u_offset.y, PI_OVER_TWO - PI_OVER_FOUR * (u_offset.x / u_offset.y))
    };

    r * Vec2::new(theta.cos(), theta.sin())
}

/// Sample a direction on a hemisphere about the z-axis using cosine-weighted
/// sampling.
///
/// * `u` - The random sample point.
#[inline]
pub fn cosine_sample_hemisphere(u: Vec2) -> Vec3 {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vec3::new(d.x, d.y, z)
}

/// Sample a cosine-weighted direction in the hemisphere around a world-space
/// normal.
///
/// * `normal` - Unit surface normal.
/// * `u`      - The random sample point.
pub fn cosine_sample_hemisphere_around(normal: Vec3, u: Vec2) -> Vec3 {
    CoordinateSystem::from(normal).to_world(cosine_sample_hemisphere(u))
}

/// Sample a uniform direction in the hemisphere around a world-space normal.
///
/// * `normal` - Unit surface normal.
/// * `u`      - The random sample point.
pub fn uniform_sample_hemisphere_around(normal: Vec3, u: Vec2) -> Vec3 {
    CoordinateSystem::from(normal).to_world(uniform_sample_hemisphere(u))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use float_cmp::approx_eq;

    #[test]
    fn sphere_samples_are_unit() {
        let mut rng = RNG::new(1);
        for _ in 0..100 {
            let d = uniform_sample_sphere(rng.uniform_vec2());
            assert!(approx_eq!(f32, d.length(), 1.0, epsilon = 1e-4));
        }
    }

    #[test]
    fn hemisphere_samples_stay_above_surface() {
        let mut rng = RNG::new(2);
        let n = Vec3::new(1.0, 1.0, 0.0).normalize();
        for _ in 0..100 {
            let u = rng.uniform_vec2();
            assert!(cosine_sample_hemisphere_around(n, u).dot(n) >= -1e-5);
            assert!(uniform_sample_hemisphere_around(n, u).dot(n) >= -1e-5);
        }
    }
}
