//! Monochrome bitmap conversion core.
//!
//! This module turns an RGB image into the packed 1-bit byte columns that the
//! printer firmware embeds:
//!
//! 1. **Grayscale reduction** - RGB to real-valued luminance
//! 2. **Ordered dithering** - threshold against a tiled Bayer matrix
//! 3. **Ink polarity** - flip so that 1 marks a dark dot
//! 4. **Bit packing** - 8 rows per byte, column by column, as hex literals
//!
//! Every stage is a pure function of its input.

pub mod bayer;
pub mod dither;
mod error;
pub mod grayscale;
mod grid;
pub mod pack;

pub use bayer::{
    generate, validate_size, BayerMatrix, ThresholdMatrix, DEFAULT_MATRIX_SIZE, MAX_MATRIX_SIZE,
};
pub use dither::{dither, dither_to_ink, dither_with_size};
pub use error::BitmapError;
pub use grayscale::{to_luminance, to_luminance_into, LUMA_WEIGHTS};
pub use grid::{BitGrid, LuminanceGrid, PixelGrid, RGB_CHANNELS};
pub use pack::{column_order, encode_line, encode_lines, format_byte, pack, PackedColumn};
