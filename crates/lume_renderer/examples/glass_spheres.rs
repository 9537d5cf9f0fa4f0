//! Glass-and-mirror demo scene.
//!
//! Renders a small sphere arrangement with depth of field and saves the
//! result as a PNG.

use std::sync::atomic::AtomicBool;

use anyhow::Result;
use lume_renderer::{
    render_parallel, Camera, IVec2, Material, Primitive, RenderOptions, Scene, Sphere, Triangle,
    Vec3, Vec4, DEFAULT_REGION_SIZE,
};

const WIDTH: i32 = 640;
const HEIGHT: i32 = 360;

fn main() -> Result<()> {
    env_logger::init();

    println!("Lume Path Tracer - Glass Spheres");
    println!("================================");

    let start = std::time::Instant::now();
    let scene = build_scene()?;
    println!("Scene built in {:?}", start.elapsed());

    println!(
        "Rendering {}x{} @ {} spp...",
        WIDTH, HEIGHT, scene.options.samples
    );

    let start = std::time::Instant::now();
    let cancel = AtomicBool::new(false);
    let results = render_parallel(
        &scene,
        IVec2::new(WIDTH, HEIGHT),
        true,
        DEFAULT_REGION_SIZE,
        0xC0FFEE,
        &cancel,
    );
    println!("Rendered in {:?}", start.elapsed());

    // Assemble region buffers into one image.
    let mut image = image::RgbaImage::new(WIDTH as u32, HEIGHT as u32);
    for result in &results {
        let region = result.region;
        for local_y in 0..region.height {
            for local_x in 0..region.width {
                let color = result.pixels[(local_y * region.width + local_x) as usize];
                image.put_pixel(
                    (region.x + local_x) as u32,
                    (region.y + local_y) as u32,
                    image::Rgba(to_rgba8(color)),
                );
            }
        }
    }

    let filename = "glass_spheres.png";
    image.save(filename)?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> Result<Scene> {
    let materials = vec![
        // 0: ground
        Material::diffuse(Vec4::new(0.55, 0.55, 0.6, 1.0)),
        // 1: glass
        Material::glass(1.5, 0.02),
        // 2: mirror
        Material::mirror(Vec4::new(0.85, 0.75, 0.55, 1.0), 0.05),
        // 3: matte red
        Material::diffuse(Vec4::new(0.7, 0.2, 0.15, 1.0)),
        // 4: lamp
        Material::emissive(Vec4::new(6.0, 5.5, 5.0, 0.0)),
    ];

    let ground_extent = 30.0;
    let objects: Vec<Box<dyn Primitive>> = vec![
        Box::new(Triangle::new(
            Vec3::new(-ground_extent, 0.0, -ground_extent),
            Vec3::new(-ground_extent, 0.0, ground_extent),
            Vec3::new(ground_extent, 0.0, -ground_extent),
            0,
        )),
        Box::new(Triangle::new(
            Vec3::new(ground_extent, 0.0, ground_extent),
            Vec3::new(ground_extent, 0.0, -ground_extent),
            Vec3::new(-ground_extent, 0.0, ground_extent),
            0,
        )),
        Box::new(Sphere::new(Vec3::new(0.0, 1.0, -4.0), 1.0, 1)),
        Box::new(Sphere::new(Vec3::new(-2.3, 1.0, -5.5), 1.0, 2)),
        Box::new(Sphere::new(Vec3::new(2.2, 0.7, -3.2), 0.7, 3)),
        Box::new(Sphere::new(Vec3::new(1.5, 4.5, -6.0), 1.5, 4)),
    ];

    let mut camera = Camera::new()
        .with_position(
            Vec3::new(0.0, 1.6, 1.5),
            Vec3::new(0.0, 1.0, -4.0),
            Vec3::Y,
        )
        .with_lens(55.0, WIDTH as f32 / HEIGHT as f32);
    camera.initialize();

    let options = RenderOptions {
        samples: 64,
        bounces: 6,
        exposure: 1.2,
        aperture_size: 0.08,
        aperture_blades: 6,
        debug_regions: false,
    };

    let scene = Scene::new(objects, materials, camera, options)?
        .with_ambient(Vec4::new(0.65, 0.75, 0.9, 1.0));

    Ok(scene)
}

fn to_rgba8(color: Vec4) -> [u8; 4] {
    [
        (255.0 * color.x.clamp(0.0, 1.0)) as u8,
        (255.0 * color.y.clamp(0.0, 1.0)) as u8,
        (255.0 * color.z.clamp(0.0, 1.0)) as u8,
        (255.0 * color.w.clamp(0.0, 1.0)) as u8,
    ]
}
