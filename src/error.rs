//! Application-level error type wrapping every failure a conversion can hit.

use std::path::PathBuf;

use crate::bitmap::BitmapError;
use crate::config::ConfigError;

/// Errors that abort a conversion run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Bitmap(#[from] BitmapError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write image '{}': {}", .path.display(), .source)]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error on '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
