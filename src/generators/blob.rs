//! Organic glow synthesizer.
//!
//! Renders one category as a translucent blob inside a circular viewport:
//! - the blob center drifts outward with intensity
//! - its silhouette follows the polar noise shape
//! - brightness falls off toward the boundary, with an angular texture
//!   and a vignette over the whole viewport
//!
//! Each pixel is a pure function of its coordinate and the category's
//! attributes, so rows are shaded in parallel.

use crate::attributes::{CategoryLayoutAttributes, Point};
use crate::catalog::{Category, RgbColor};
use crate::error::{InvalidInput, Result};
use crate::generators::shape::{organic_radius_with_phase, phase_offset};
use crate::generators::Generator;
use crate::raster::BlobRaster;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;

/// Raster side length used when none is configured.
pub const DEFAULT_RESOLUTION: u32 = 400;

/// Viewport radius as a fraction of the resolution.
const VIEWPORT: f64 = 0.4;

/// Pixels dimmer than this are left fully transparent.
const CUTOFF: f64 = 0.05;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Per-category constants for shading one raster.
#[derive(Debug, Clone)]
pub struct BlobShader {
    half: f64,
    max_distance: f64,
    center: Point,
    effective_radius: f64,
    intensity: f64,
    phase: f64,
    color: RgbColor,
}

impl BlobShader {
    pub fn new(category: &Category, attrs: &CategoryLayoutAttributes, resolution: u32) -> Self {
        let resolution = f64::from(resolution);
        Self {
            half: resolution / 2.0,
            max_distance: resolution * VIEWPORT,
            center: attrs.blob_center(resolution),
            effective_radius: attrs.effective_radius(),
            intensity: attrs.intensity,
            phase: phase_offset(&category.id),
            color: category.color,
        }
    }

    /// Brightness at pixel `(x, y)` before quantisation, in [0, 1).
    pub fn intensity_at(&self, x: u32, y: u32) -> f64 {
        let px = f64::from(x) - self.half;
        let py = f64::from(y) - self.half;
        let distance_from_center = (px * px + py * py).sqrt();
        if distance_from_center > self.max_distance {
            return 0.0;
        }

        let dx = px - self.center.x;
        let dy = py - self.center.y;
        let blob_distance = (dx * dx + dy * dy).sqrt();
        let boundary = organic_radius_with_phase(
            dy.atan2(dx),
            self.effective_radius,
            self.phase,
            self.intensity,
        );

        let mut value = 0.0;
        if blob_distance < boundary {
            value = (1.0 - blob_distance / boundary).powf(1.5) * self.intensity;

            let texture_angle = py.atan2(px);
            let texture = ((texture_angle * 6.0).sin() + (texture_angle * 13.0).sin()) * 0.1 + 1.0;
            value *= texture.max(0.3);
        }

        let falloff = 1.0 - (distance_from_center / self.max_distance).powf(1.8);
        value * falloff.max(0.0)
    }

    /// Final RGBA for pixel `(x, y)`.
    pub fn shade(&self, x: u32, y: u32) -> Rgba<u8> {
        let value = self.intensity_at(x, y);
        if value <= CUTOFF {
            return TRANSPARENT;
        }

        let alpha = (value * 255.0 * 0.8).min(255.0).round_ties_even() as u8;
        Rgba([self.color.r, self.color.g, self.color.b, alpha])
    }
}

/// Synthesize one category's glow at `resolution x resolution`.
///
/// Rejects a zero resolution, or one whose buffer size overflows, before
/// any pixel work.
pub fn synthesize(
    category: &Category,
    attrs: &CategoryLayoutAttributes,
    resolution: u32,
) -> Result<BlobRaster> {
    if resolution == 0 {
        return Err(InvalidInput::Resolution(resolution).into());
    }

    let side = resolution as usize;
    let (row_bytes, len) = side
        .checked_mul(4)
        .and_then(|row| Some((row, row.checked_mul(side)?)))
        .ok_or(InvalidInput::Resolution(resolution))?;

    let shader = BlobShader::new(category, attrs, resolution);
    let mut buffer = vec![0u8; len];

    buffer
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                pixel.copy_from_slice(&shader.shade(x as u32, y as u32).0);
            }
        });

    let image = RgbaImage::from_raw(resolution, resolution, buffer)
        .ok_or(InvalidInput::Resolution(resolution))?;
    tracing::debug!(category = %category.id, resolution, "synthesized blob layer");
    Ok(BlobRaster::new(category.id.clone(), image))
}

/// Raster generator producing one glow layer per category.
#[derive(Debug, Clone)]
pub struct BlobGenerator {
    pub resolution: u32,
}

impl Default for BlobGenerator {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl BlobGenerator {
    pub fn new(resolution: u32) -> Self {
        Self { resolution }
    }
}

impl Generator for BlobGenerator {
    fn name(&self) -> &'static str {
        "blob"
    }

    fn generate(&self, category: &Category, attrs: &CategoryLayoutAttributes) -> Result<BlobRaster> {
        synthesize(category, attrs, self.resolution)
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}
