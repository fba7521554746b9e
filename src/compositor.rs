//! Layer stacking.
//!
//! The first layer is laid down with plain alpha blending; every later
//! layer is screen-blended onto the accumulated result, so overlapping
//! glows brighten instead of covering each other. Blending follows the
//! W3C separable blend model on straight (non-premultiplied) alpha.

use crate::error::{CircumplexError, Result};
use crate::layout::BlendMode;
use crate::raster::BlobRaster;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;

fn blend_channel(mode: BlendMode, backdrop: f64, source: f64) -> f64 {
    match mode {
        BlendMode::Normal => source,
        BlendMode::Screen => backdrop + source - backdrop * source,
    }
}

/// Composite `source` over `backdrop` with `mode`.
pub fn blend_pixel(mode: BlendMode, backdrop: Rgba<u8>, source: Rgba<u8>) -> Rgba<u8> {
    let alpha_s = f64::from(source[3]) / 255.0;
    let alpha_b = f64::from(backdrop[3]) / 255.0;
    let alpha_o = alpha_s + alpha_b * (1.0 - alpha_s);
    if alpha_o <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for channel in 0..3 {
        let cs = f64::from(source[channel]) / 255.0;
        let cb = f64::from(backdrop[channel]) / 255.0;
        let mixed = (1.0 - alpha_b) * cs + alpha_b * blend_channel(mode, cb, cs);
        let co = (alpha_s * mixed + alpha_b * (1.0 - alpha_s) * cb) / alpha_o;
        out[channel] = (co * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (alpha_o * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

/// Blend a whole layer onto `canvas` in place. Sizes must match.
pub fn blend_layer(canvas: &mut RgbaImage, layer: &RgbaImage, mode: BlendMode) {
    let row_bytes = canvas.width() as usize * 4;
    canvas
        .par_chunks_mut(row_bytes)
        .zip(layer.par_chunks(row_bytes))
        .for_each(|(dst_row, src_row)| {
            for (dst, src) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                let backdrop = Rgba([dst[0], dst[1], dst[2], dst[3]]);
                let source = Rgba([src[0], src[1], src[2], src[3]]);
                dst.copy_from_slice(&blend_pixel(mode, backdrop, source).0);
            }
        });
}

/// Stack rasters in arrangement order into one image.
///
/// All rasters must share a resolution.
pub fn compose(rasters: &[BlobRaster]) -> Result<RgbaImage> {
    let first = rasters.first().ok_or(CircumplexError::NoLayers)?;
    let size = first.resolution();
    if let Some(odd) = rasters.iter().find(|r| r.image().dimensions() != (size, size)) {
        return Err(CircumplexError::LayerSizeMismatch {
            id: odd.category_id().to_string(),
            expected: size,
            found: odd.resolution(),
        });
    }

    let mut canvas = RgbaImage::new(size, size);
    for (index, raster) in rasters.iter().enumerate() {
        blend_layer(&mut canvas, raster.image(), BlendMode::for_index(index));
    }

    tracing::debug!(layers = rasters.len(), size, "composited layers");
    Ok(canvas)
}
