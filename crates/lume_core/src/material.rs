//! Material description for the path tracer.

use glam::Vec4;

/// Surface material consumed by the bounce model.
///
/// Colors carry an auxiliary fourth channel that rides along through the
/// radiance accumulator; the tonemap step ignores it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Color applied to diffuse and refracted bounces
    pub diffuse_color: Vec4,

    /// Color applied to specular bounces
    pub reflective_color: Vec4,

    /// Emitted radiance, added at every bounce off this surface
    pub emissive_color: Vec4,

    /// Surface roughness: 0 = mirror-smooth, 1 = fully diffuse
    pub roughness: f32,

    /// Index of refraction. Zero marks an opaque surface; any positive
    /// value marks a dielectric that both reflects and transmits.
    pub refractive_index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_color: Vec4::new(0.5, 0.5, 0.5, 1.0), // Grey default
            reflective_color: Vec4::ONE,
            emissive_color: Vec4::ZERO,
            roughness: 1.0,
            refractive_index: 0.0,
        }
    }
}

impl Material {
    /// Create a fully diffuse material with the given albedo.
    pub fn diffuse(color: Vec4) -> Self {
        Self {
            diffuse_color: color,
            roughness: 1.0,
            ..Default::default()
        }
    }

    /// Create a specular material.
    ///
    /// - `color`: reflectance tint
    /// - `roughness`: 0.0 = perfect mirror, 1.0 = fully diffuse
    pub fn mirror(color: Vec4, roughness: f32) -> Self {
        Self {
            reflective_color: color,
            roughness: roughness.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Create a light-emitting material.
    pub fn emissive(color: Vec4) -> Self {
        Self {
            diffuse_color: Vec4::ZERO,
            emissive_color: color,
            ..Default::default()
        }
    }

    /// Create a dielectric (glass-like) material.
    ///
    /// - `ior`: index of refraction (1.5 = glass, 2.4 = diamond)
    /// - `roughness`: spread applied to both reflected and refracted rays
    pub fn glass(ior: f32, roughness: f32) -> Self {
        Self {
            diffuse_color: Vec4::ONE,
            reflective_color: Vec4::ONE,
            roughness: roughness.clamp(0.0, 1.0),
            refractive_index: ior,
            ..Default::default()
        }
    }

    /// Whether this material transmits light (refractive index above zero).
    pub fn is_dielectric(&self) -> bool {
        self.refractive_index > 0.0
    }

    /// Whether this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emissive_color.truncate().length_squared() > 0.0
    }
}
