//! bayer-bitmap library crate.
//!
//! Converts photos into ordered-dithered 1-bit bitmaps packed as C byte
//! arrays for printer firmware. The conversion core lives in [`bitmap`];
//! the remaining modules handle files, configuration and the command line.

pub mod bitmap;
pub mod cli;
pub mod config;
pub mod error;
pub mod header;
pub mod image_io;
pub mod pipeline;

pub use error::ConvertError;
pub use pipeline::{Bitmap, ConvertJob, Converter};
