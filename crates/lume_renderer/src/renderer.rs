//! Per-region image generation driver.
//!
//! Builds camera rays for every pixel of a region, runs the bounce model
//! for each sample, then tonemaps and emits the pixel through a callback.

use std::f32::consts::TAU;

use glam::{IVec2, Vec2, Vec4};
use lume_math::{Plane, Ray, Vec3};
use rand::{Rng, RngCore};

use crate::intersect::find_nearest_intersection;
use crate::sampling::{sample_signed, sample_unit};
use crate::tracer::{gather_bounces, MediumStack};
use crate::Scene;

/// Focal distance used when the camera's center ray escapes the scene.
const FALLBACK_FOCAL_DISTANCE: f32 = 1.0;

/// Render a rectangular pixel region.
///
/// `origin` and `size` select the region within an `image_size` image;
/// `output` is invoked once per finished pixel (plus border markers first
/// when `options.debug_regions` is set). Sub-pixel jitter is applied only
/// when `antialias` is true. The emitted color is tonemapped with
/// `1 - exp(-exposure * mean)` per RGB channel; alpha is always 1.
///
/// Regions are independent: concurrent calls may share the scene as long
/// as each brings its own generator.
pub fn render_region(
    scene: &Scene,
    image_size: IVec2,
    origin: IVec2,
    size: IVec2,
    antialias: bool,
    rng: &mut dyn RngCore,
    output: &mut dyn FnMut(IVec2, Vec4),
) {
    let dudv = Vec2::splat(2.0) / image_size.as_vec2();
    let sub_pixel = 0.5 * dudv;

    // Focal geometry for the depth-of-field lens model: focus on whatever
    // the center of the image looks at.
    let center_ray = scene.camera.cast_ray(Vec2::ZERO);
    let axis = if center_ray.direction.x > 0.1 {
        Vec3::Y
    } else {
        Vec3::X
    };
    let ce1 = center_ray.direction.cross(axis).normalize();
    let ce2 = ce1.cross(center_ray.direction).normalize();

    let center_hit = find_nearest_intersection(scene, &center_ray);
    let focal_distance = match center_hit.object {
        Some(_) => (center_hit.point - center_ray.origin).length(),
        None => FALLBACK_FOCAL_DISTANCE,
    };
    let focal_plane = Plane::through(
        scene.camera.position() + scene.camera.direction() * focal_distance,
        scene.camera.direction(),
    );

    let blades = scene.options.aperture_blades.max(3);
    let blade_delta = TAU / blades as f32;
    let blade_start = 0.5 * blade_delta;

    if scene.options.debug_regions {
        emit_region_borders(origin, size, output);
    }

    let samples = scene.options.samples.max(1);
    let exposure_scale = -scene.options.exposure / samples as f32;
    let mut media = MediumStack::new();

    for y in origin.y..origin.y + size.y {
        for x in origin.x..origin.x + size.x {
            let pixel = IVec2::new(x, y);
            let mut accumulated = Vec4::ZERO;

            for _ in 0..samples {
                let mut fp = (pixel.as_vec2() + Vec2::splat(0.5)) * dudv - Vec2::splat(1.0);
                if antialias {
                    fp += sub_pixel * Vec2::new(sample_signed(rng), sample_signed(rng));
                }
                // Image rows grow downward, camera NDC grows upward.
                let mut ray = scene.camera.cast_ray(Vec2::new(fp.x, -fp.y));

                if scene.options.aperture_size > 0.0 {
                    if let Some(focal) = focal_plane.intersect_ray(&ray) {
                        // Pick a random sector of the aperture polygon and a
                        // point between its two corner offsets.
                        let ra1 = blade_start + rng.gen_range(0..blades) as f32 * blade_delta;
                        let ra2 = ra1 + blade_delta;
                        let rd = scene.options.aperture_size * sample_unit(rng).sqrt();
                        let o1 = rd * (ce1 * ra1.sin() + ce2 * ra1.cos());
                        let o2 = rd * (ce1 * ra2.sin() + ce2 * ra2.cos());
                        let jittered = ray.origin + o1.lerp(o2, sample_unit(rng));
                        ray = Ray::new(jittered, (focal - jittered).normalize());
                    }
                }

                media.reset();
                accumulated += gather_bounces(scene, &ray, 0, &mut media, rng);
            }

            let exposed = accumulated * exposure_scale;
            let color = Vec4::new(
                1.0 - exposed.x.exp(),
                1.0 - exposed.y.exp(),
                1.0 - exposed.z.exp(),
                1.0,
            );
            output(pixel, color);
        }
    }
}

/// Paint the region outline with fixed colors so in-flight regions are
/// visible in a progressive display. Every border pixel is overwritten by
/// its final color once the region completes.
fn emit_region_borders(origin: IVec2, size: IVec2, output: &mut dyn FnMut(IVec2, Vec4)) {
    let left = origin.x;
    let right = origin.x + size.x - 1;
    let top = origin.y;
    let bottom = origin.y + size.y - 1;

    for y in top..=bottom {
        output(IVec2::new(left, y), Vec4::new(1.0, 0.0, 0.0, 1.0));
        output(IVec2::new(right, y), Vec4::new(0.0, 1.0, 0.0, 1.0));
    }
    for x in left..=right {
        output(IVec2::new(x, top), Vec4::new(0.0, 0.0, 1.0, 1.0));
        output(IVec2::new(x, bottom), Vec4::new(1.0, 0.0, 1.0, 1.0));
    }
}
