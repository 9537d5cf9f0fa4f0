//! Region-based rendering.
//!
//! Divides the image into rectangular regions that are rendered
//! independently and in parallel with rayon. Regions share nothing but the
//! read-only scene; each one owns its generator and medium stack, so any
//! execution order produces the same image.

use std::sync::atomic::{AtomicBool, Ordering};

use glam::{IVec2, Vec4};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::renderer::render_region;
use crate::Scene;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    /// X coordinate of the region's top-left corner
    pub x: i32,
    /// Y coordinate of the region's top-left corner
    pub y: i32,
    /// Width of the region in pixels
    pub width: i32,
    /// Height of the region in pixels
    pub height: i32,
    /// Index of this region in the render order
    pub index: usize,
}

impl Region {
    /// Create a new region.
    pub fn new(x: i32, y: i32, width: i32, height: i32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this region.
    pub fn pixel_count(&self) -> i32 {
        self.width * self.height
    }
}

/// Default region size in pixels.
pub const DEFAULT_REGION_SIZE: i32 = 64;

/// Generate regions covering an image, sorted center-out.
///
/// This mimics the rendering pattern of production renderers, where tiles
/// are rendered from the center outward so the most important parts of the
/// image resolve first.
pub fn generate_regions(width: i32, height: i32, region_size: i32) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let rw = region_size.min(width - x);
            let rh = region_size.min(height - y);
            regions.push(Region::new(x, y, rw, rh, index));
            index += 1;
            x += region_size;
        }
        y += region_size;
    }

    sort_center_out(&mut regions, width, height);

    // Update indices after sorting
    for (i, region) in regions.iter_mut().enumerate() {
        region.index = i;
    }

    regions
}

/// Sort regions by distance from the image center.
fn sort_center_out(regions: &mut [Region], width: i32, height: i32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    regions.sort_by(|a, b| {
        let a_center_x = a.x as f32 + a.width as f32 / 2.0;
        let a_center_y = a.y as f32 + a.height as f32 / 2.0;
        let b_center_x = b.x as f32 + b.width as f32 / 2.0;
        let b_center_y = b.y as f32 + b.height as f32 / 2.0;

        let a_dist = (a_center_x - center_x).powi(2) + (a_center_y - center_y).powi(2);
        let b_dist = (b_center_x - center_x).powi(2) + (b_center_y - center_y).powi(2);

        a_dist.partial_cmp(&b_dist).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Render a single region to a vector of colors.
///
/// Returns pixels in row-major order within the region.
pub fn render_region_buffer(
    scene: &Scene,
    image_size: IVec2,
    region: &Region,
    antialias: bool,
    rng: &mut dyn rand::RngCore,
) -> Vec<Vec4> {
    let mut pixels = vec![Vec4::ZERO; region.pixel_count() as usize];
    let origin = IVec2::new(region.x, region.y);

    render_region(
        scene,
        image_size,
        origin,
        IVec2::new(region.width, region.height),
        antialias,
        rng,
        &mut |pixel, color| {
            let local = pixel - origin;
            pixels[(local.y * region.width + local.x) as usize] = color;
        },
    );

    pixels
}

/// Result of rendering a region.
#[derive(Debug, Clone)]
pub struct RegionResult {
    /// The region that was rendered
    pub region: Region,
    /// Pixel colors in row-major order
    pub pixels: Vec<Vec4>,
}

/// Render all regions of an image in parallel.
///
/// Each region draws its generator from `seed` and the region's grid
/// position, so the result is reproducible for a given seed no matter how
/// rayon schedules the work. The cancel flag is checked at region starts;
/// regions skipped after cancellation are absent from the result.
pub fn render_parallel(
    scene: &Scene,
    image_size: IVec2,
    antialias: bool,
    region_size: i32,
    seed: u64,
    cancel: &AtomicBool,
) -> Vec<RegionResult> {
    let regions = generate_regions(image_size.x, image_size.y, region_size);
    log::info!(
        "rendering {} regions of up to {}x{} px at {} spp",
        regions.len(),
        region_size,
        region_size,
        scene.options.samples
    );

    let results: Vec<RegionResult> = regions
        .par_iter()
        .filter_map(|region| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }

            let mut rng = StdRng::seed_from_u64(region_seed(seed, region));
            let pixels = render_region_buffer(scene, image_size, region, antialias, &mut rng);
            log::debug!("region {} done ({}x{})", region.index, region.width, region.height);

            Some(RegionResult {
                region: *region,
                pixels,
            })
        })
        .collect();

    if cancel.load(Ordering::Relaxed) {
        log::info!("render cancelled after {} of {} regions", results.len(), regions.len());
    }

    results
}

/// Derive a per-region seed from the render seed and the region's grid
/// position. Uses a splitmix64 finalizer so neighboring regions get
/// decorrelated streams.
fn region_seed(seed: u64, region: &Region) -> u64 {
    let position = ((region.x as u32 as u64) << 32) | region.y as u32 as u64;
    let mut z = seed ^ position;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Camera, Material, Primitive, RenderOptions, Sphere};
    use lume_math::Vec3;

    #[test]
    fn test_generate_regions_exact_fit() {
        let regions = generate_regions(128, 128, 64);
        assert_eq!(regions.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: i32 = regions.iter().map(|r| r.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_regions_partial_fit() {
        let regions = generate_regions(100, 100, 64);
        assert_eq!(regions.len(), 4); // 2x2 grid with partial regions

        // Total pixels should equal image size
        let total_pixels: i32 = regions.iter().map(|r| r.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_center_out_order() {
        let regions = generate_regions(192, 192, 64);
        assert_eq!(regions.len(), 9); // 3x3 grid

        // First region should be the center one
        let first = &regions[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);
    }

    fn test_scene() -> Scene {
        let mut camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 1.0);
        camera.initialize();

        Scene::new(
            vec![Box::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, 0)) as Box<dyn Primitive>],
            vec![Material::diffuse(Vec4::new(0.6, 0.3, 0.2, 1.0))],
            camera,
            RenderOptions {
                samples: 4,
                bounces: 3,
                ..Default::default()
            },
        )
        .unwrap()
        .with_ambient(Vec4::splat(0.7))
    }

    #[test]
    fn test_parallel_render_covers_image() {
        let scene = test_scene();
        let cancel = AtomicBool::new(false);

        let results = render_parallel(&scene, IVec2::new(32, 32), true, 16, 99, &cancel);
        assert_eq!(results.len(), 4);

        let total: i32 = results.iter().map(|r| r.region.pixel_count()).sum();
        assert_eq!(total, 32 * 32);
        for result in &results {
            assert_eq!(result.pixels.len(), result.region.pixel_count() as usize);
        }
    }

    #[test]
    fn test_parallel_render_is_deterministic() {
        let scene = test_scene();
        let cancel = AtomicBool::new(false);

        let mut a = render_parallel(&scene, IVec2::new(32, 32), true, 16, 5, &cancel);
        let mut b = render_parallel(&scene, IVec2::new(32, 32), true, 16, 5, &cancel);
        a.sort_by_key(|r| r.region.index);
        b.sort_by_key(|r| r.region.index);

        for (ra, rb) in a.iter().zip(b.iter()) {
            assert_eq!(ra.pixels, rb.pixels);
        }
    }

    #[test]
    fn test_cancelled_render_skips_regions() {
        let scene = test_scene();
        let cancel = AtomicBool::new(true);

        let results = render_parallel(&scene, IVec2::new(32, 32), false, 16, 0, &cancel);
        assert!(results.is_empty());
    }
}
