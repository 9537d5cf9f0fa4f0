//! Lume Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer with Fresnel-weighted dielectrics, nested
//! media tracking, an equirectangular environment sampler and a polygonal
//! depth-of-field aperture.
//!
//! The natural unit of work is a rectangular pixel region: regions share
//! nothing but the read-only scene and can be rendered concurrently.

mod camera;
mod environment;
mod intersect;
mod primitive;
mod region;
mod renderer;
mod sampling;
mod scene;
mod tracer;

pub use camera::Camera;
pub use environment::sample_environment;
pub use intersect::{find_nearest_intersection, Intersection, INTERSECTION_EPSILON};
pub use primitive::{Primitive, Sphere, SurfaceHit, Triangle};
pub use region::{
    generate_regions, render_parallel, render_region_buffer, Region, RegionResult,
    DEFAULT_REGION_SIZE,
};
pub use renderer::render_region;
pub use sampling::{
    diffuse_direction, fresnel_term, hemisphere_direction, reflect, reflected_direction,
    refracted_direction, refraction_discriminant, sample_signed, sample_unit,
};
pub use scene::{RenderOptions, Scene, SceneError};
pub use tracer::{compute_reflection, gather_bounces, MediumStack, VACUUM_IOR};

/// Re-export scene data types from lume_core
pub use lume_core::{Material, Texture, TextureError};

/// Re-export common math types from lume_math
pub use lume_math::{IVec2, Plane, Ray, Vec2, Vec3, Vec4};
