//! RGB to luminance reduction.

use super::grid::{LuminanceGrid, PixelGrid, RGB_CHANNELS};

/// Perceptual channel weights in R, G, B order.
pub const LUMA_WEIGHTS: [f64; 3] = [0.2989, 0.5870, 0.1140];

/// Luminance of one RGB sample. Not rounded.
#[inline]
pub fn luminance(rgb: &[u8]) -> f64 {
    LUMA_WEIGHTS[0] * rgb[0] as f64 + LUMA_WEIGHTS[1] * rgb[1] as f64 + LUMA_WEIGHTS[2] * rgb[2] as f64
}

/// Convert a pixel grid to a luminance grid of the same dimensions.
pub fn to_luminance(pixels: &PixelGrid) -> LuminanceGrid {
    let mut buffer = Vec::new();
    to_luminance_into(pixels, &mut buffer);
    LuminanceGrid::from_raw(pixels.rows(), pixels.cols(), buffer)
}

/// Convert a pixel grid into an existing buffer, reusing its allocation.
///
/// Returns the number of values written.
pub fn to_luminance_into(pixels: &PixelGrid, buffer: &mut Vec<f64>) -> usize {
    let pixel_count = pixels.rows() * pixels.cols();
    buffer.clear();
    buffer.reserve(pixel_count);
    buffer.extend(pixels.data().chunks_exact(RGB_CHANNELS).map(luminance));
    pixel_count
}
