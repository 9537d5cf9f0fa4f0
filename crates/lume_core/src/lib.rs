//! Renderer-agnostic scene data for Lume.
//!
//! Holds the material description consumed by the path tracer and the
//! float texture type used for equirectangular environment maps.

mod material;
mod texture;

pub use material::Material;
pub use texture::{Texture, TextureError, TextureResult};
