use image::{GrayImage, Rgb, Rgba, RgbaImage};

use crate::errors::{CrackSegError, Result};
use crate::rasterops::mask::MASK_ON;

/// Paints `marker` over `base` wherever `mask` is on.
///
/// Marker pixels replace the base pixel outright at full opacity; there is no
/// alpha blending. Everything else is copied from `base` into a new buffer.
///
/// `base` and `mask` must have identical dimensions. A mismatch means the
/// caller mixed buffers from different transform stages and is rejected.
pub fn paint_mask(base: &RgbaImage, mask: &GrayImage, marker: Rgb<u8>) -> Result<RgbaImage> {
    if base.dimensions() != mask.dimensions() {
        return Err(CrackSegError::ShapeMismatch {
            expected: base.dimensions(),
            actual: mask.dimensions(),
        });
    }

    let Rgb([r, g, b]) = marker;
    let mut out = base.clone();
    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel.0[0] == MASK_ON {
            out.put_pixel(x, y, Rgba([r, g, b, 255]));
        }
    }
    Ok(out)
}
