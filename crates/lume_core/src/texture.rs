//! Float texture used for equirectangular environment maps.
//!
//! Pixels are always stored as 4-channel linear float, the format the
//! environment sampler requires; loading converts 8-bit sources from sRGB.

use std::path::Path;

use glam::{IVec2, Vec4};
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A texture with 4-channel float pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data as [R, G, B, A] per pixel, row-major order
    pub pixels: Vec<[f32; 4]>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    ///
    /// Panics when the pixel buffer does not match the stated dimensions;
    /// that is a caller bug, not a runtime condition.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, path: impl Into<String>) -> Self {
        assert!(width > 0 && height > 0, "texture dimensions must be non-zero");
        assert_eq!(
            pixels.len(),
            (width * height) as usize,
            "pixel buffer does not match texture dimensions"
        );
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec4) -> Self {
        Self::new(1, 1, vec![[color.x, color.y, color.z, color.w]], "<solid>")
    }

    /// Fetch the texel at integer coordinates with wraparound addressing.
    ///
    /// Coordinates outside the texture are wrapped modulo the size on both
    /// axes, never clamped.
    pub fn fetch(&self, texel: IVec2) -> Vec4 {
        let x = texel.x.rem_euclid(self.width as i32) as usize;
        let y = texel.y.rem_euclid(self.height as i32) as usize;
        let p = self.pixels[y * self.width as usize + x];
        Vec4::new(p[0], p[1], p[2], p[3])
    }

    /// Load a texture from a file.
    ///
    /// Float sources (HDR, EXR) are taken as-is; 8-bit sources are converted
    /// from sRGB to linear.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Texture> {
        let path = path.as_ref();
        let img = image::open(path)?;

        let (width, height, pixels) = match img {
            image::DynamicImage::ImageRgb32F(buf) => {
                let (w, h) = buf.dimensions();
                let px = buf.pixels().map(|p| [p[0], p[1], p[2], 1.0]).collect();
                (w, h, px)
            }
            image::DynamicImage::ImageRgba32F(buf) => {
                let (w, h) = buf.dimensions();
                let px = buf.pixels().map(|p| [p[0], p[1], p[2], p[3]]).collect();
                (w, h, px)
            }
            other => {
                let rgba = other.to_rgba8();
                let (w, h) = rgba.dimensions();
                let px = rgba
                    .pixels()
                    .map(|p| {
                        [
                            srgb_to_linear(p[0]),
                            srgb_to_linear(p[1]),
                            srgb_to_linear(p[2]),
                            p[3] as f32 / 255.0, // Alpha is linear
                        ]
                    })
                    .collect();
                (w, h, px)
            }
        };

        log::debug!(
            "Loaded texture: {} ({}x{})",
            path.display(),
            width,
            height
        );

        Ok(Texture::new(
            width,
            height,
            pixels,
            path.to_string_lossy().to_string(),
        ))
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
