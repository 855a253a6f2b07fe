//! Image decoding, resizing and preview output.
//!
//! The printer has a fixed dot count per line, so every input is scaled to a
//! fixed height with its width following the source aspect ratio.

use image::error::{ImageError, ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, ImageReader, Luma, RgbImage};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bitmap::{BitGrid, BitmapError, PixelGrid};
use crate::error::ConvertError;

/// Output height used when none is configured.
pub const DEFAULT_MAX_HEIGHT: u32 = 384;

/// Resampling filter used when scaling the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    pub fn name(&self) -> &'static str {
        match self {
            ResizeFilter::Nearest => "nearest",
            ResizeFilter::Triangle => "triangle",
            ResizeFilter::CatmullRom => "catmull-rom",
            ResizeFilter::Gaussian => "gaussian",
            ResizeFilter::Lanczos3 => "lanczos3",
        }
    }
}

impl std::fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Width that keeps the source aspect ratio at `target_height`, rounded down.
///
/// Never returns 0 for a non-empty source. Fails with `InvalidParameter` when
/// the scaled width does not fit in `u32`.
pub fn scaled_width(src_width: u32, src_height: u32, target_height: u32) -> Result<u32, BitmapError> {
    if src_height == 0 {
        return Ok(0);
    }
    let width = (src_width as u64 * target_height as u64) / src_height as u64;
    let width = u32::try_from(width).map_err(|_| BitmapError::InvalidParameter {
        name: "max_height",
        reason: format!(
            "{} scales a {}x{} image to a width of {} pixels",
            target_height, src_width, src_height, width
        ),
    })?;
    Ok(width.max(1))
}

/// Decode an image file, detecting the format from its content.
pub fn load_image(path: &Path) -> Result<DynamicImage, ConvertError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| ConvertError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    let img = reader.decode().map_err(|e| {
        BitmapError::MalformedInput(format!("cannot decode '{}': {}", path.display(), e))
    })?;
    log::info!("Opened image {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img)
}

/// Scale to exactly `height` rows and convert to 8-bit RGB.
pub fn resize_to_height(
    img: &DynamicImage,
    height: u32,
    filter: ResizeFilter,
) -> Result<RgbImage, BitmapError> {
    if height == 0 {
        return Err(BitmapError::InvalidParameter {
            name: "max_height",
            reason: "must be greater than 0".to_string(),
        });
    }
    if img.width() == 0 || img.height() == 0 {
        return Err(BitmapError::MalformedInput(format!(
            "image has no pixels ({}x{})",
            img.width(),
            img.height()
        )));
    }

    let width = scaled_width(img.width(), img.height(), height)?;
    let resized = img.resize_exact(width, height, filter.into()).into_rgb8();
    log::debug!("Resized to {}x{} with {}", width, height, filter);
    Ok(resized)
}

/// Move an RGB image into a [`PixelGrid`].
pub fn into_pixel_grid(img: RgbImage) -> Result<PixelGrid, BitmapError> {
    let (width, height) = img.dimensions();
    PixelGrid::from_rgb(height as usize, width as usize, img.into_raw())
}

/// `photo.jpg` -> `photoresized.jpg`, in the same directory.
pub fn resized_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}resized.{}", stem, ext.to_string_lossy()),
        None => format!("{}resized", stem),
    };
    input.with_file_name(name)
}

/// Render an ink grid as a grayscale image: black where ink is 1, white where 0.
pub fn preview_image(ink: &BitGrid) -> GrayImage {
    GrayImage::from_fn(ink.cols() as u32, ink.rows() as u32, |x, y| {
        Luma([(1 - ink.get(y as usize, x as usize)) * 255])
    })
}

/// Encoder for `path`, chosen by its extension.
///
/// Fails with `ImageWrite` when the extension names no format this build can
/// encode, so callers can check an output path before producing anything.
pub fn output_format(path: &Path) -> Result<ImageFormat, ConvertError> {
    let write_err = |e: ImageError| ConvertError::ImageWrite {
        path: path.to_path_buf(),
        source: e,
    };
    let format = ImageFormat::from_path(path).map_err(write_err)?;
    if !format.writing_enabled() {
        let hint = ImageFormatHint::Exact(format);
        return Err(write_err(ImageError::Unsupported(
            UnsupportedError::from_format_and_kind(hint.clone(), UnsupportedErrorKind::Format(hint)),
        )));
    }
    Ok(format)
}

/// Save an RGB image, format from the extension.
pub fn save_rgb(img: &RgbImage, path: &Path) -> Result<(), ConvertError> {
    let format = output_format(path)?;
    img.save_with_format(path, format)
        .map_err(|e| ConvertError::ImageWrite {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Save a grayscale image, format from the extension.
pub fn save_gray(img: &GrayImage, path: &Path) -> Result<(), ConvertError> {
    let format = output_format(path)?;
    img.save_with_format(path, format)
        .map_err(|e| ConvertError::ImageWrite {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_width() {
        assert_eq!(scaled_width(800, 600, 384), Ok(512));
        assert_eq!(scaled_width(1000, 3000, 384), Ok(128));
        assert_eq!(scaled_width(100, 30000, 384), Ok(1));
        assert_eq!(scaled_width(10, 0, 384), Ok(0));
    }

    #[test]
    fn test_scaled_width_rounds_down() {
        // 333 * 384 / 500 = 255.744
        assert_eq!(scaled_width(333, 500, 384), Ok(255));
    }

    #[test]
    fn test_scaled_width_overflow() {
        let err = scaled_width(u32::MAX, 1, u32::MAX).unwrap_err();
        assert!(matches!(err, BitmapError::InvalidParameter { name: "max_height", .. }));
        assert!(scaled_width(3, 1, u32::MAX).is_err());
        assert_eq!(scaled_width(1, 1, u32::MAX), Ok(u32::MAX));
    }

    #[test]
    fn test_output_format() {
        assert_eq!(output_format(Path::new("out/p.png")).unwrap(), ImageFormat::Png);
        let err = output_format(Path::new("p.notaformat")).unwrap_err();
        assert!(matches!(err, ConvertError::ImageWrite { .. }));
        assert!(err.to_string().contains("p.notaformat"));
        assert!(output_format(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_save_gray_unsupported_extension_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.notaformat");
        let img = preview_image(&BitGrid::from_rows(&[vec![1, 0]]).unwrap());
        assert!(save_gray(&img, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_resize_to_height() {
        let img = DynamicImage::new_rgb8(40, 20);
        let out = resize_to_height(&img, 10, ResizeFilter::Nearest).unwrap();
        assert_eq!(out.dimensions(), (20, 10));
    }

    #[test]
    fn test_resize_rejects_zero_height() {
        let img = DynamicImage::new_rgb8(4, 4);
        let err = resize_to_height(&img, 0, ResizeFilter::Lanczos3).unwrap_err();
        assert!(matches!(err, BitmapError::InvalidParameter { .. }));
    }

    #[test]
    fn test_into_pixel_grid() {
        let img = RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8, 7]));
        let grid = into_pixel_grid(img).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.pixel(1, 2), [2, 1, 7]);
    }

    #[test]
    fn test_resized_path() {
        assert_eq!(
            resized_path(Path::new("pics/cat.jpg")),
            PathBuf::from("pics/catresized.jpg")
        );
        assert_eq!(resized_path(Path::new("cat")), PathBuf::from("catresized"));
    }

    #[test]
    fn test_preview_image_polarity() {
        let ink = BitGrid::from_rows(&[vec![1, 0]]).unwrap();
        let img = preview_image(&ink);
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(0, 0).0, [0]);
        assert_eq!(img.get_pixel(1, 0).0, [255]);
    }
}
