//! Recursive light-transport: the bounce model.
//!
//! `gather_bounces` walks a single sample's path through the scene,
//! branching per hit between reflection, refraction and diffuse scatter.
//! Dielectric boundaries split probabilistically by the Fresnel term, and
//! nested media are tracked on an explicit index-of-refraction stack.

use glam::Vec4;
use lume_core::Material;
use lume_math::{Ray, Vec3};
use rand::RngCore;

use crate::intersect::find_nearest_intersection;
use crate::sampling::{
    diffuse_direction, fresnel_term, reflected_direction, refracted_direction,
    refraction_discriminant, sample_unit,
};
use crate::{sample_environment, Scene};

/// Refractive index of empty space, the bottom entry of every medium
/// stack.
pub const VACUUM_IOR: f32 = 1.0;

/// Stack of refractive indices for the media a ray currently travels
/// through.
///
/// Owned by exactly one sample's recursive call chain and passed down by
/// mutable reference. Pushes and pops are paired by the entering/exiting
/// branch logic in `gather_bounces`, never by scope exit: the matching pop
/// belongs to the boundary where the ray leaves the medium, not to the
/// caller that pushed.
#[derive(Debug, Clone)]
pub struct MediumStack {
    iors: Vec<f32>,
}

impl MediumStack {
    /// Create a stack holding the single vacuum entry.
    pub fn new() -> Self {
        Self {
            iors: vec![VACUUM_IOR],
        }
    }

    /// Drop everything back to the single vacuum entry. Called once per
    /// sample before the primary ray is traced.
    pub fn reset(&mut self) {
        self.iors.clear();
        self.iors.push(VACUUM_IOR);
    }

    /// Index of refraction of the medium the ray is currently inside.
    pub fn current(&self) -> f32 {
        self.iors.last().copied().unwrap_or(VACUUM_IOR)
    }

    /// Index of refraction of the surrounding medium: the second entry
    /// from the top when nested, otherwise the top itself.
    pub fn outer(&self) -> f32 {
        if self.iors.len() > 1 {
            self.iors[self.iors.len() - 2]
        } else {
            self.current()
        }
    }

    /// Whether the ray is inside at least one pushed medium.
    pub fn is_nested(&self) -> bool {
        self.iors.len() > 1
    }

    /// Record entry into a medium.
    pub fn enter(&mut self, ior: f32) {
        self.iors.push(ior);
    }

    /// Record exit from the innermost medium. The vacuum entry is never
    /// popped.
    pub fn exit(&mut self) {
        if self.iors.len() > 1 {
            self.iors.pop();
        }
    }

    /// Number of entries, including the vacuum bottom.
    pub fn depth(&self) -> usize {
        self.iors.len()
    }
}

impl Default for MediumStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Trace one bounce of a specular reflection.
///
/// `depth` has already been incremented by the caller. The sampled
/// direction is cosine-weighted against the ideal mirror direction and the
/// bounce is tinted by the material's reflective color.
#[allow(clippy::too_many_arguments)]
pub fn compute_reflection(
    scene: &Scene,
    material: &Material,
    ray_direction: Vec3,
    point: Vec3,
    normal: Vec3,
    depth: u32,
    media: &mut MediumStack,
    rng: &mut dyn RngCore,
) -> Vec4 {
    let (reflected, ideal) = reflected_direction(ray_direction, normal, material.roughness, rng);
    let bounce = gather_bounces(scene, &Ray::new(point, reflected), depth, media, rng);
    material.emissive_color + material.reflective_color * (reflected.dot(ideal) * bounce)
}

/// Gather radiance along a ray, recursing for indirect bounces.
///
/// Terminal cases: depth exhaustion returns zero radiance, and a ray that
/// hits nothing returns the environment sample. Every other branch
/// combines as `emissive + color * (cosine * recursive_bounce)`.
pub fn gather_bounces(
    scene: &Scene,
    ray: &Ray,
    depth: u32,
    media: &mut MediumStack,
    rng: &mut dyn RngCore,
) -> Vec4 {
    if depth >= scene.options.bounces {
        return Vec4::ZERO;
    }

    let hit = find_nearest_intersection(scene, ray);
    let Some(index) = hit.object else {
        return sample_environment(scene, ray);
    };

    let material = *scene.material_at(scene.object_at(index).material_id());

    if material.is_dielectric() {
        let entering = ray.direction.dot(hit.normal) < 0.0;
        let nested = media.is_nested();

        // Exiting flips the normal against the ray and resolves the target
        // medium from the stack; for overlapping non-nested dielectrics
        // this second-from-top rule is a simplification, kept for
        // compatibility with strictly nested media.
        let (current_ior, target_ior, normal) = if entering {
            (media.current(), material.refractive_index, hit.normal)
        } else {
            (material.refractive_index, media.outer(), -hit.normal)
        };

        let eta = current_ior / target_ior;
        let k = refraction_discriminant(ray.direction, normal, eta);

        if k < 0.0 {
            // Total internal reflection: stay in the current medium.
            return compute_reflection(
                scene,
                &material,
                ray.direction,
                hit.point,
                normal,
                depth + 1,
                media,
                rng,
            );
        }

        let fresnel = fresnel_term(ray.direction, normal, eta);
        if sample_unit(rng) < fresnel {
            return compute_reflection(
                scene,
                &material,
                ray.direction,
                hit.point,
                normal,
                depth + 1,
                media,
                rng,
            );
        }

        // Refract across the boundary. The stack mutation here is undone
        // only by the matching boundary further along the path.
        if entering {
            media.enter(target_ior);
        } else if nested {
            media.exit();
        }

        let (refracted, _ideal) =
            refracted_direction(ray.direction, normal, eta, k, material.roughness, rng);
        let bounce = gather_bounces(scene, &Ray::new(hit.point, refracted), depth + 1, media, rng);
        material.emissive_color + material.diffuse_color * (refracted.dot(normal) * bounce)
    } else if sample_unit(rng) > material.roughness {
        compute_reflection(
            scene,
            &material,
            ray.direction,
            hit.point,
            hit.normal,
            depth + 1,
            media,
            rng,
        )
    } else {
        let direction = diffuse_direction(hit.normal, rng);
        let bounce = gather_bounces(scene, &Ray::new(hit.point, direction), depth + 1, media, rng);
        material.emissive_color + material.diffuse_color * (direction.dot(hit.normal) * bounce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Camera, Primitive, RenderOptions, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn camera() -> Camera {
        let mut camera = Camera::new();
        camera.initialize();
        camera
    }

    fn scene_with(
        objects: Vec<Box<dyn Primitive>>,
        materials: Vec<Material>,
        bounces: u32,
        ambient: Vec4,
    ) -> Scene {
        Scene::new(
            objects,
            materials,
            camera(),
            RenderOptions {
                bounces,
                ..Default::default()
            },
        )
        .unwrap()
        .with_ambient(ambient)
    }

    #[test]
    fn test_depth_exhaustion_returns_zero() {
        let scene = scene_with(
            vec![Box::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, 0))],
            vec![Material::default()],
            4,
            Vec4::ONE,
        );
        let mut rng = StdRng::seed_from_u64(1);
        let mut media = MediumStack::new();

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(
            gather_bounces(&scene, &ray, 4, &mut media, &mut rng),
            Vec4::ZERO
        );
        assert_eq!(
            gather_bounces(&scene, &ray, 9, &mut media, &mut rng),
            Vec4::ZERO
        );
    }

    #[test]
    fn test_miss_returns_environment() {
        let ambient = Vec4::new(0.25, 0.5, 0.75, 1.0);
        let scene = scene_with(Vec::new(), vec![Material::default()], 4, ambient);
        let mut rng = StdRng::seed_from_u64(2);
        let mut media = MediumStack::new();

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(gather_bounces(&scene, &ray, 0, &mut media, &mut rng), ambient);
    }

    #[test]
    fn test_mirror_reflects_environment() {
        // Zero-roughness opaque sphere lit only by a constant ambient:
        // one deterministic bounce gives reflective * ambient exactly.
        let reflective = Vec4::new(0.8, 0.6, 0.4, 1.0);
        let ambient = Vec4::new(0.5, 0.5, 0.5, 1.0);
        let scene = scene_with(
            vec![Box::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, 0))],
            vec![Material::mirror(reflective, 0.0)],
            3,
            ambient,
        );
        let mut rng = StdRng::seed_from_u64(3);
        let mut media = MediumStack::new();

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let expected = reflective * ambient;

        for _ in 0..16 {
            media.reset();
            let result = gather_bounces(&scene, &ray, 0, &mut media, &mut rng);
            assert!(
                (result.truncate() - expected.truncate()).length() < 1e-4,
                "mirror bounce should be reflective * ambient, got {result:?}"
            );
        }
    }

    #[test]
    fn test_black_diffuse_absorbs_everything() {
        let scene = scene_with(
            vec![Box::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, 0))],
            vec![Material::diffuse(Vec4::ZERO)],
            6,
            Vec4::new(10.0, 10.0, 10.0, 1.0),
        );
        let mut rng = StdRng::seed_from_u64(4);
        let mut media = MediumStack::new();

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        for _ in 0..32 {
            media.reset();
            assert_eq!(
                gather_bounces(&scene, &ray, 0, &mut media, &mut rng),
                Vec4::ZERO
            );
        }
    }

    #[test]
    fn test_matched_glass_passes_straight_through() {
        // A dielectric with the vacuum's own IOR refracts deterministically
        // (Fresnel is zero, the refracted ray continues unchanged) and the
        // enter/exit pair cancels: white glass returns the environment.
        let ambient = Vec4::new(0.3, 0.6, 0.9, 1.0);
        let scene = scene_with(
            vec![Box::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, 0))],
            vec![Material::glass(VACUUM_IOR, 0.0)],
            8,
            ambient,
        );
        let mut rng = StdRng::seed_from_u64(5);
        let mut media = MediumStack::new();

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let result = gather_bounces(&scene, &ray, 0, &mut media, &mut rng);

        assert!((result.truncate() - ambient.truncate()).length() < 1e-3);
        // Entry pushed, exit popped: the chain left the stack balanced.
        assert_eq!(media.depth(), 1);
    }

    #[test]
    fn test_medium_stack_discipline() {
        let mut media = MediumStack::new();
        assert_eq!(media.depth(), 1);
        assert_eq!(media.current(), VACUUM_IOR);

        // Symmetric enter/exit sequence through nested media.
        media.enter(1.5);
        media.enter(2.4);
        assert_eq!(media.current(), 2.4);
        assert_eq!(media.outer(), 1.5);
        media.exit();
        media.exit();
        assert_eq!(media.depth(), 1);

        // The vacuum entry survives an unmatched exit.
        media.exit();
        assert_eq!(media.depth(), 1);
        assert_eq!(media.current(), VACUUM_IOR);
        assert_eq!(media.outer(), VACUUM_IOR);
    }

    #[test]
    fn test_medium_stack_reset() {
        let mut media = MediumStack::new();
        media.enter(1.33);
        media.enter(1.5);
        media.reset();
        assert_eq!(media.depth(), 1);
        assert_eq!(media.current(), VACUUM_IOR);
    }

    #[test]
    fn test_emissive_surface_terminates_with_light() {
        // Emission is added at the hit even when the recursive bounce
        // contributes nothing.
        let emission = Vec4::new(2.0, 1.0, 0.5, 0.0);
        let scene = scene_with(
            vec![Box::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, 0))],
            vec![Material::emissive(emission)],
            1,
            Vec4::ZERO,
        );
        let mut rng = StdRng::seed_from_u64(6);
        let mut media = MediumStack::new();

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let result = gather_bounces(&scene, &ray, 0, &mut media, &mut rng);
        assert_eq!(result, emission);
    }
}
