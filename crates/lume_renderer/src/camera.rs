//! Camera for ray generation.

use lume_math::{Ray, Vec2, Vec3};

/// Pinhole camera generating rays from normalized device coordinates.
///
/// NDC covers [-1, 1] on both axes with +x right and +y up; `(0, 0)` is the
/// image center. Depth of field is applied by the render driver through
/// aperture jitter, not by the camera itself.
#[derive(Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32, // Vertical field of view in degrees
    aspect: f32,

    // Cached computed values (set by initialize())
    center: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    half_width: f32,
    half_height: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            aspect: 16.0 / 9.0,
            center: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            half_width: 1.0,
            half_height: 1.0,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aspect: f32) -> Self {
        self.vfov = vfov;
        self.aspect = aspect;
        self
    }

    /// Initialize the camera (must be called before casting rays).
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Half extents of the view plane at unit distance
        let theta = self.vfov.to_radians();
        self.half_height = (theta / 2.0).tan();
        self.half_width = self.half_height * self.aspect;
    }

    /// Cast a ray through the given normalized device coordinate.
    pub fn cast_ray(&self, ndc: Vec2) -> Ray {
        let direction =
            (self.half_width * ndc.x * self.u + self.half_height * ndc.y * self.v - self.w)
                .normalize();
        Ray::new(self.center, direction)
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.center
    }

    /// Unit view direction.
    pub fn direction(&self) -> Vec3 {
        -self.w
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
