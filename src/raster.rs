//! RGBA pixel buffers produced by the synthesizer and the compositor.

use crate::error::{CircumplexError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

/// One category's rendered glow: a square RGBA buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobRaster {
    category_id: String,
    image: RgbaImage,
}

impl BlobRaster {
    /// Wrap an existing square image as a layer for `category_id`.
    pub fn new(category_id: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            category_id: category_id.into(),
            image,
        }
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    /// Side length in pixels.
    pub fn resolution(&self) -> u32 {
        self.image.width()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Number of pixels with non-zero alpha.
    pub fn coverage(&self) -> usize {
        self.image.pixels().filter(|p| p[3] > 0).count()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }

    pub fn to_data_uri(&self) -> Result<String> {
        to_data_uri(&self.image)
    }
}

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|err| CircumplexError::Encode(err.to_string()))?;
    Ok(out)
}

/// PNG-encode an image into a `data:` URI suitable for an SVG `href`.
pub fn to_data_uri(image: &RgbaImage) -> Result<String> {
    let png = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
