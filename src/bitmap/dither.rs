//! Ordered (Bayer) dithering of a luminance grid to 1 bit per pixel.
//!
//! Each pixel is compared against the threshold matrix tiled over the image:
//! a pixel brighter than its threshold becomes 1, anything else 0. There is
//! no error propagation between pixels, so the result for one pixel depends
//! only on its own luminance and position.

use super::bayer::ThresholdMatrix;
use super::error::BitmapError;
use super::grid::{BitGrid, LuminanceGrid};

/// Threshold `lum` against the tiled matrix.
///
/// Output bit is 1 where the pixel is strictly brighter than its threshold.
pub fn dither(lum: &LuminanceGrid, thresholds: &ThresholdMatrix) -> BitGrid {
    let cols = lum.cols();
    let mut bits = Vec::with_capacity(lum.values().len());

    for (i, row) in lum.values().chunks_exact(cols.max(1)).enumerate() {
        bits.extend(
            row.iter()
                .enumerate()
                .map(|(j, &value)| (value > thresholds.at(i, j)) as u8),
        );
    }

    BitGrid::from_raw(lum.rows(), cols, bits)
}

/// Dither with the shared threshold matrix of size `matrix_size`.
pub fn dither_with_size(lum: &LuminanceGrid, matrix_size: usize) -> Result<BitGrid, BitmapError> {
    let thresholds = ThresholdMatrix::cached(matrix_size)?;
    Ok(dither(lum, &thresholds))
}

/// Dither and flip to ink polarity: 1 marks a dark dot, 0 a bright one.
pub fn dither_to_ink(lum: &LuminanceGrid, thresholds: &ThresholdMatrix) -> BitGrid {
    dither(lum, thresholds).inverted()
}
