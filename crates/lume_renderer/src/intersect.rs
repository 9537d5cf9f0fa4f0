//! Nearest-intersection query against the scene.

use lume_math::{Ray, Vec3};

use crate::Scene;

/// Forward nudge applied to ray origins before testing, to step off the
/// surface the ray originates from.
pub const INTERSECTION_EPSILON: f32 = 1e-5;

/// Result of an intersection query.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    /// Hit point in world space
    pub point: Vec3,
    /// Geometric surface normal at the hit point
    pub normal: Vec3,
    /// Index of the hit object; None when the ray escaped the scene
    pub object: Option<usize>,
}

impl Intersection {
    fn miss() -> Self {
        Self {
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            object: None,
        }
    }
}

/// Find the nearest object hit by the ray.
///
/// Candidates are compared by squared distance from the original
/// (un-nudged) ray origin, so the selection is consistent across objects.
/// Pure function of the scene and ray.
pub fn find_nearest_intersection(scene: &Scene, ray: &Ray) -> Intersection {
    let adjusted = Ray::new(
        ray.origin + INTERSECTION_EPSILON * ray.direction,
        ray.direction,
    );

    let mut result = Intersection::miss();
    let mut nearest = f32::MAX;

    for (index, object) in scene.objects().iter().enumerate() {
        if let Some(hit) = object.intersect(&adjusted) {
            let distance = (hit.point - ray.origin).length_squared();
            if distance < nearest {
                nearest = distance;
                result = Intersection {
                    point: hit.point,
                    normal: hit.normal,
                    object: Some(index),
                };
            }
        }
    }

    result
}
