//! Conversion pipeline for bayer-bitmap.
//!
//! [`Converter`] runs the in-memory stages on a pixel grid. [`run`] wraps it
//! with file handling: decode, resize, convert, then write the header and the
//! optional preview images, all or nothing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::bitmap::{self, BitGrid, BitmapError, PixelGrid, ThresholdMatrix};
use crate::config::Settings;
use crate::error::ConvertError;
use crate::{header, image_io};

/// Result of converting one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Row count of the source grid
    pub height: usize,
    /// Column count of the source grid
    pub width: usize,
    /// One encoded line per column, in emission order
    pub lines: Vec<String>,
    /// Ink grid (1 = dark dot) the lines were packed from
    pub ink: BitGrid,
}

impl Bitmap {
    /// The array initializer body: every line followed by a newline.
    pub fn body(&self) -> String {
        self.lines.iter().map(|line| format!("{}\n", line)).collect()
    }
}

/// Runs grayscale reduction, dithering, polarity inversion and packing with a
/// fixed matrix size.
#[derive(Debug, Clone)]
pub struct Converter {
    thresholds: Arc<ThresholdMatrix>,
}

impl Converter {
    /// Fails with `InvalidParameter` unless `matrix_size` is a power of two >= 2.
    pub fn new(matrix_size: usize) -> Result<Self, BitmapError> {
        Ok(Self {
            thresholds: ThresholdMatrix::cached(matrix_size)?,
        })
    }

    pub fn matrix_size(&self) -> usize {
        self.thresholds.size()
    }

    /// Ink grid for `pixels`: 1 where the dithered pixel is dark.
    pub fn ink(&self, pixels: &PixelGrid) -> BitGrid {
        let lum = bitmap::to_luminance(pixels);
        bitmap::dither_to_ink(&lum, &self.thresholds)
    }

    pub fn convert(&self, pixels: &PixelGrid) -> Bitmap {
        let ink = self.ink(pixels);
        let lines = bitmap::encode_lines(&ink);
        log::debug!(
            "Packed {}x{} bitmap into {} column lines",
            pixels.rows(),
            pixels.cols(),
            lines.len()
        );
        Bitmap {
            height: pixels.rows(),
            width: pixels.cols(),
            lines,
            ink,
        }
    }
}

/// One file-to-file conversion.
#[derive(Debug, Clone)]
pub struct ConvertJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Where to save the dithered preview, if anywhere
    pub preview: Option<PathBuf>,
    pub settings: Settings,
}

/// Files written by one [`run`]. Unless [`keep`](Self::keep) is called they
/// are removed again on drop; paths that were never created are skipped.
#[derive(Debug, Default)]
struct WrittenFiles {
    paths: Vec<PathBuf>,
    keep: bool,
}

impl WrittenFiles {
    fn record(&mut self, path: &Path) {
        self.paths.push(path.to_path_buf());
    }

    fn keep(mut self) {
        self.keep = true;
    }
}

impl Drop for WrittenFiles {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        for path in self.paths.iter().rev() {
            match std::fs::remove_file(path) {
                Ok(()) => log::debug!("Removed {} after failed conversion", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }
}

/// Convert `job.input` into a header at `job.output`.
///
/// Everything that can fail short of the writes themselves (parameters,
/// output formats, decoding, header rendering) happens before any file is
/// created. If a later write fails, files already written by this run are
/// removed, so an error leaves no partial output.
pub fn run(job: &ConvertJob) -> Result<Bitmap, ConvertError> {
    let settings = &job.settings;
    let converter = Converter::new(settings.matrix_size)?;

    let resized_out = settings
        .save_resized
        .then(|| image_io::resized_path(&job.input));
    if let Some(path) = &resized_out {
        image_io::output_format(path)?;
    }
    if let Some(path) = &job.preview {
        image_io::output_format(path)?;
    }

    let img = image_io::load_image(&job.input)?;
    let resized = image_io::resize_to_height(&img, settings.max_height, settings.filter)?;
    let resized_copy = resized_out.as_ref().map(|_| resized.clone());

    let pixels = image_io::into_pixel_grid(resized)?;
    let bitmap = converter.convert(&pixels);
    log::info!(
        "Dithered {}x{} with {}x{} Bayer matrix",
        bitmap.width,
        bitmap.height,
        converter.matrix_size(),
        converter.matrix_size()
    );

    let name = header::symbol_name(&job.output);
    let text = header::render(&name, &bitmap);
    let preview = job
        .preview
        .as_ref()
        .map(|path| (path, image_io::preview_image(&bitmap.ink)));

    let mut written = WrittenFiles::default();

    // Recorded before each write so a write that fails midway is removed too
    written.record(&job.output);
    header::write(&job.output, &text)?;
    log::info!("Wrote header {} (symbol {})", job.output.display(), name);

    if let Some((path, img)) = &preview {
        written.record(path);
        image_io::save_gray(img, path)?;
        log::info!("Saved dithered preview to {}", path.display());
    }

    if let (Some(path), Some(img)) = (&resized_out, &resized_copy) {
        written.record(path);
        image_io::save_rgb(img, path)?;
        log::info!("Saved resized image to {}", path.display());
    }

    written.keep();
    Ok(bitmap)
}
