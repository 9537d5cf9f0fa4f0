//! Intersectable scene primitives.

use lume_math::{Ray, Vec3};

/// Minimum ray parameter accepted by primitive intersection tests.
///
/// The intersection query additionally nudges rays off their originating
/// surface; this bound rejects roots that still land behind the origin.
const T_MIN: f32 = 1e-6;

/// Point and surface normal produced by a successful intersection test.
///
/// The normal is the geometric (outward) normal, never flipped toward the
/// ray; the bounce model relies on its sign to tell entry from exit.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Trait for objects that can be intersected by rays.
pub trait Primitive: Send + Sync {
    /// Test the ray against this object, returning the nearest hit in front
    /// of the ray origin.
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit>;

    /// Index of this object's material in the scene's material table.
    fn material_id(&self) -> usize;
}

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material_id: usize,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material_id: usize) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material_id,
        }
    }
}

impl Primitive for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Take the nearest root in front of the origin; fall back to the far
        // root when the origin is inside the sphere.
        let mut root = (h - sqrtd) / a;
        if root <= T_MIN {
            root = (h + sqrtd) / a;
            if root <= T_MIN {
                return None;
            }
        }

        let point = ray.at(root);
        let normal = (point - self.center) / self.radius;
        Some(SurfaceHit { point, normal })
    }

    fn material_id(&self) -> usize {
        self.material_id
    }
}

/// A triangle primitive.
///
/// Uses the Möller-Trumbore algorithm for the intersection test.
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    material_id: usize,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The face normal follows the counter-clockwise winding of the
    /// vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material_id: usize) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize();

        Self {
            v0,
            v1,
            v2,
            normal,
            material_id,
        }
    }
}

impl Primitive for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t <= T_MIN {
            return None;
        }

        Some(SurfaceHit {
            point: ray.at(t),
            normal: self.normal,
        })
    }

    fn material_id(&self) -> usize {
        self.material_id
    }
}
