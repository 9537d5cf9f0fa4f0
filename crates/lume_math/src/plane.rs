//! Infinite plane, used for the depth-of-field focal plane.

use crate::Ray;
use glam::Vec3;

/// A plane in normal/offset form: dot(normal, p) == offset.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Unit plane normal
    pub normal: Vec3,
    /// Signed distance from the origin along the normal
    pub offset: f32,
}

impl Plane {
    /// Create a plane passing through `point` with the given normal.
    pub fn through(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            offset: normal.dot(point),
        }
    }

    /// Intersect a ray with the plane.
    ///
    /// Returns the intersection point, or None when the ray is parallel to
    /// the plane (the denominator vanishes).
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (self.offset - self.normal.dot(ray.origin)) / denom;
        Some(ray.at(t))
    }
}
