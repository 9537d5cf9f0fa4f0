//! Environment radiance for rays that escape the scene.

use std::f32::consts::{PI, TAU};

use lume_math::{IVec2, Ray, Vec2, Vec4};

use crate::Scene;

/// Sample the environment color for an escaping ray.
///
/// Without an environment texture this is the scene's flat ambient color.
/// With one, the ray direction is mapped onto an equirectangular panorama
/// and the four neighboring texels are blended bilinearly, with wraparound
/// addressing on both axes; the filtered texel modulates the ambient color.
pub fn sample_environment(scene: &Scene, ray: &Ray) -> Vec4 {
    let Some(map) = scene.environment() else {
        return scene.ambient_color;
    };

    let d = ray.direction;
    let phi = 0.5 + d.z.atan2(d.x) / TAU;
    // Clamp keeps asin in domain for not-quite-normalized directions.
    let theta = 0.5 + d.y.clamp(-1.0, 1.0).asin() / PI;

    let tc = Vec2::new(phi * map.width as f32, theta * map.height as f32);
    let base = IVec2::new(tc.x.floor() as i32, tc.y.floor() as i32);

    let c00 = map.fetch(base);
    let c10 = map.fetch(base + IVec2::new(1, 0));
    let c01 = map.fetch(base + IVec2::new(0, 1));
    let c11 = map.fetch(base + IVec2::new(1, 1));

    let frac = tc - tc.floor();
    let top = c00.lerp(c10, frac.x);
    let bottom = c01.lerp(c11, frac.x);

    scene.ambient_color * top.lerp(bottom, frac.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Camera, Material, RenderOptions, Scene};
    use lume_core::Texture;
    use lume_math::Vec3;

    fn empty_scene() -> Scene {
        let mut camera = Camera::new();
        camera.initialize();
        Scene::new(
            Vec::new(),
            vec![Material::default()],
            camera,
            RenderOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_flat_ambient_without_texture() {
        let scene = empty_scene().with_ambient(Vec4::new(0.1, 0.2, 0.3, 1.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, 0.8, -0.1).normalize());

        assert_eq!(sample_environment(&scene, &ray), Vec4::new(0.1, 0.2, 0.3, 1.0));
    }

    #[test]
    fn test_texture_modulates_ambient() {
        let scene = empty_scene()
            .with_ambient(Vec4::splat(0.5))
            .with_environment(Texture::solid_color(Vec4::new(1.0, 0.5, 0.25, 1.0)));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let color = sample_environment(&scene, &ray);
        assert!((color.x - 0.5).abs() < 1e-5);
        assert!((color.y - 0.25).abs() < 1e-5);
        assert!((color.z - 0.125).abs() < 1e-5);
    }

    #[test]
    fn test_azimuth_wraparound_continuity() {
        // A 4x2 texture with distinct texels: directions just either side
        // of the phi seam must land on (nearly) the same filtered value.
        let pixels: Vec<[f32; 4]> = (0..8).map(|i| [i as f32 / 8.0, 0.0, 0.0, 1.0]).collect();
        let scene = empty_scene()
            .with_environment(Texture::new(4, 2, pixels, "<test>"));

        let eps = 1e-4_f32;
        let before = Ray::new(Vec3::ZERO, Vec3::new(-1.0, 0.0, -eps).normalize());
        let after = Ray::new(Vec3::ZERO, Vec3::new(-1.0, 0.0, eps).normalize());

        let a = sample_environment(&scene, &before);
        let b = sample_environment(&scene, &after);
        assert!((a.x - b.x).abs() < 1e-2, "seam discontinuity: {} vs {}", a.x, b.x);
    }

    #[test]
    fn test_same_direction_same_sample() {
        let pixels: Vec<[f32; 4]> = (0..8).map(|i| [i as f32, 1.0, 0.0, 1.0]).collect();
        let scene = empty_scene()
            .with_environment(Texture::new(4, 2, pixels, "<test>"));

        let dir = Vec3::new(0.6, 0.3, -0.74).normalize();
        let a = sample_environment(&scene, &Ray::new(Vec3::ZERO, dir));
        let b = sample_environment(&scene, &Ray::new(Vec3::new(5.0, 1.0, 2.0), dir));

        // Environment lookup depends only on direction.
        assert_eq!(a, b);
    }
}
