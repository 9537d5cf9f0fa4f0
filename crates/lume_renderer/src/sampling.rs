//! Random sampling utilities for Monte Carlo integration.
//!
//! Every function draws fresh values from the supplied generator; nothing
//! is memoized, so independent generators give independent streams and
//! per-region seeding keeps parallel renders deterministic.

use std::f32::consts::{FRAC_PI_2, PI};

use lume_math::Vec3;
use rand::{Rng, RngCore};

/// Seed vector for building a tangent frame around an arbitrary direction.
const TANGENT_SEED: Vec3 = Vec3::ONE;

/// Draw a uniform f32 in [0, 1).
#[inline]
pub fn sample_unit(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}

/// Draw a uniform f32 in [-1, 1).
#[inline]
pub fn sample_signed(rng: &mut dyn RngCore) -> f32 {
    2.0 * rng.gen::<f32>() - 1.0
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Draw a unit vector on the hemisphere around `base`.
///
/// `spread` in [0, 1] controls the distribution: 0 returns `base` itself,
/// 1 is a full cosine-weighted hemisphere, and values in between bias the
/// draw increasingly toward `base`.
pub fn hemisphere_direction(base: Vec3, spread: f32, rng: &mut dyn RngCore) -> Vec3 {
    let r2 = spread * sample_unit(rng);
    let angle = PI * sample_signed(rng);

    let mut tangent = TANGENT_SEED.cross(base);
    if tangent.length_squared() < 1e-8 {
        // base is parallel to the seed vector; any other axis works
        tangent = Vec3::X.cross(base);
    }
    let tangent = tangent.normalize();
    let bitangent = base.cross(tangent);

    (r2.sqrt() * (tangent * angle.cos() + bitangent * angle.sin()) + (1.0 - r2).sqrt() * base)
        .normalize()
}

/// Draw a cosine-weighted direction on the hemisphere around the normal.
#[inline]
pub fn diffuse_direction(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    hemisphere_direction(normal, 1.0, rng)
}

/// Draw a reflected direction.
///
/// Returns the sampled direction together with the ideal mirror reflection
/// it was scattered around; the caller cosine-weights against the ideal.
pub fn reflected_direction(
    incidence: Vec3,
    normal: Vec3,
    roughness: f32,
    rng: &mut dyn RngCore,
) -> (Vec3, Vec3) {
    let ideal = reflect(incidence, normal);
    let sampled = hemisphere_direction(ideal, (FRAC_PI_2 * roughness).sin(), rng);
    (sampled, ideal)
}

/// Refraction discriminant: `1 - eta^2 * (1 - dot(n, i)^2)`.
///
/// Negative values signal total internal reflection.
#[inline]
pub fn refraction_discriminant(incidence: Vec3, normal: Vec3, eta: f32) -> f32 {
    let cos = normal.dot(incidence);
    1.0 - eta * eta * (1.0 - cos * cos)
}

/// Ideal refraction of `incidence` through a surface with normal `normal`.
///
/// `k` must be the non-negative discriminant for the same inputs.
#[inline]
fn refract(incidence: Vec3, normal: Vec3, eta: f32, k: f32) -> Vec3 {
    eta * incidence - (eta * normal.dot(incidence) + k.sqrt()) * normal
}

/// Draw a refracted direction.
///
/// Returns the sampled direction together with the ideal refraction it was
/// scattered around.
pub fn refracted_direction(
    incidence: Vec3,
    normal: Vec3,
    eta: f32,
    k: f32,
    roughness: f32,
    rng: &mut dyn RngCore,
) -> (Vec3, Vec3) {
    debug_assert!(k >= 0.0, "refraction requires a non-negative discriminant");
    let ideal = refract(incidence, normal, eta, k);
    let sampled = hemisphere_direction(ideal, (FRAC_PI_2 * roughness).sin(), rng);
    (sampled, ideal)
}

/// Fresnel reflectance for the reflect/refract split at a dielectric
/// boundary.
///
/// Closed form in terms of `eta * dot(incidence, normal)`; the result is
/// clamped to [0, 1]. Matched media (`eta` near 1) reflect nothing.
pub fn fresnel_term(incidence: Vec3, normal: Vec3, eta: f32) -> f32 {
    let beta = 1.0 - eta * eta;
    if beta.abs() < 1e-6 {
        return 0.0;
    }
    let c = eta * incidence.dot(normal);
    let s = (beta + c * c).max(0.0).sqrt();
    let r = 1.0 + 2.0 * (c * c + c * s) / beta;
    (r * r).clamp(0.0, 1.0)
}
