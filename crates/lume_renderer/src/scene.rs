//! Scene aggregate consumed by the path tracer.
//!
//! The scene is read-only for the duration of a render pass and may be
//! shared freely across render workers.

use glam::Vec4;
use lume_core::{Material, Texture};
use thiserror::Error;

use crate::{Camera, Primitive};

/// Errors produced when assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("object {object} references material {material_id}, but only {material_count} materials exist")]
    InvalidMaterialId {
        object: usize,
        material_id: usize,
        material_count: usize,
    },
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Samples per pixel
    pub samples: u32,
    /// Maximum ray bounce depth
    pub bounces: u32,
    /// Exposure applied by the tonemap
    pub exposure: f32,
    /// Aperture radius for depth of field; 0 disables lens jitter
    pub aperture_size: f32,
    /// Number of aperture polygon edges
    pub aperture_blades: u32,
    /// Paint region borders with fixed colors while rendering
    pub debug_regions: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            samples: 32,
            bounces: 8,
            exposure: 1.0,
            aperture_size: 0.0,
            aperture_blades: 6,
            debug_regions: false,
        }
    }
}

/// A scene: intersectable objects, their materials, a camera, and the
/// environment the escaping rays sample.
pub struct Scene {
    objects: Vec<Box<dyn Primitive>>,
    materials: Vec<Material>,
    pub camera: Camera,
    environment: Option<Texture>,
    pub ambient_color: Vec4,
    pub options: RenderOptions,
}

impl Scene {
    /// Create a scene, validating that every object's material id indexes
    /// the material table.
    pub fn new(
        objects: Vec<Box<dyn Primitive>>,
        materials: Vec<Material>,
        camera: Camera,
        options: RenderOptions,
    ) -> Result<Self, SceneError> {
        for (index, object) in objects.iter().enumerate() {
            let material_id = object.material_id();
            if material_id >= materials.len() {
                return Err(SceneError::InvalidMaterialId {
                    object: index,
                    material_id,
                    material_count: materials.len(),
                });
            }
        }

        Ok(Self {
            objects,
            materials,
            camera,
            environment: None,
            ambient_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            options,
        })
    }

    /// Attach an equirectangular environment texture.
    pub fn with_environment(mut self, environment: Texture) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set the ambient color returned (or modulated into the environment
    /// lookup) for escaping rays.
    pub fn with_ambient(mut self, ambient_color: Vec4) -> Self {
        self.ambient_color = ambient_color;
        self
    }

    /// All intersectable objects; the candidate set for intersection
    /// queries.
    pub fn objects(&self) -> &[Box<dyn Primitive>] {
        &self.objects
    }

    /// Get the object at the given index.
    pub fn object_at(&self, index: usize) -> &dyn Primitive {
        self.objects[index].as_ref()
    }

    /// Get the material with the given id.
    pub fn material_at(&self, id: usize) -> &Material {
        &self.materials[id]
    }

    /// The optional environment map.
    pub fn environment(&self) -> Option<&Texture> {
        self.environment.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;
    use lume_math::Vec3;

    fn camera() -> Camera {
        let mut camera = Camera::new();
        camera.initialize();
        camera
    }

    #[test]
    fn test_scene_validates_material_ids() {
        let objects: Vec<Box<dyn Primitive>> =
            vec![Box::new(Sphere::new(Vec3::ZERO, 1.0, 1))];
        let materials = vec![Material::default()];

        let err = Scene::new(objects, materials, camera(), RenderOptions::default())
            .err()
            .expect("out-of-range material id must be rejected");
        match err {
            SceneError::InvalidMaterialId {
                object,
                material_id,
                material_count,
            } => {
                assert_eq!(object, 0);
                assert_eq!(material_id, 1);
                assert_eq!(material_count, 1);
            }
        }
    }

    #[test]
    fn test_scene_accessors() {
        let objects: Vec<Box<dyn Primitive>> =
            vec![Box::new(Sphere::new(Vec3::ZERO, 1.0, 0))];
        let materials = vec![Material::diffuse(Vec4::new(0.2, 0.4, 0.6, 1.0))];

        let scene = Scene::new(objects, materials, camera(), RenderOptions::default())
            .unwrap()
            .with_ambient(Vec4::splat(0.5));

        assert_eq!(scene.objects().len(), 1);
        assert_eq!(scene.object_at(0).material_id(), 0);
        assert_eq!(scene.material_at(0).diffuse_color.x, 0.2);
        assert!(scene.environment().is_none());
        assert_eq!(scene.ambient_color, Vec4::splat(0.5));
    }
}
