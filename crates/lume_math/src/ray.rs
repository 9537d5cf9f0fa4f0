//! Ray type for path tracing.
//!
//! A ray is defined by an origin point and a direction vector. The direction
//! is not required to be normalized at construction; intersection and shading
//! code that depends on distances or cosines normalizes where needed.

use glam::Vec3;

/// A ray with origin and direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray
    pub origin: Vec3,
    /// Direction vector (not necessarily normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}
