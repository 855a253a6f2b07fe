//! Flat row-major grids passed between the conversion stages.

use super::error::BitmapError;

/// Number of channels in a [`PixelGrid`] sample.
pub const RGB_CHANNELS: usize = 3;

/// `rows * cols * per_cell`, or `DimensionMismatch` if it does not fit in `usize`.
fn checked_len(rows: usize, cols: usize, per_cell: usize) -> Result<usize, BitmapError> {
    rows.checked_mul(cols)
        .and_then(|cells| cells.checked_mul(per_cell))
        .ok_or_else(|| BitmapError::DimensionMismatch {
            expected: format!("an addressable {}x{} grid", rows, cols),
            actual: "a size that overflows usize".to_string(),
        })
}

/// An RGB image, `rows * cols` pixels of 3 interleaved 8-bit channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wrap a raw interleaved buffer.
    ///
    /// `channels` must be 3 and `data.len()` must equal `rows * cols * channels`.
    pub fn new(rows: usize, cols: usize, channels: usize, data: Vec<u8>) -> Result<Self, BitmapError> {
        if channels != RGB_CHANNELS {
            return Err(BitmapError::DimensionMismatch {
                expected: format!("{} channels", RGB_CHANNELS),
                actual: format!("{} channels", channels),
            });
        }
        let expected = checked_len(rows, cols, RGB_CHANNELS)?;
        if data.len() != expected {
            return Err(BitmapError::DimensionMismatch {
                expected: format!("{} bytes for {}x{} RGB", expected, rows, cols),
                actual: format!("{} bytes", data.len()),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Wrap an interleaved RGB buffer.
    pub fn from_rgb(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self, BitmapError> {
        Self::new(rows, cols, RGB_CHANNELS, data)
    }

    /// A grid where every pixel has the same color.
    pub fn filled(rows: usize, cols: usize, rgb: [u8; 3]) -> Self {
        let data = rgb.iter().copied().cycle().take(rows * cols * RGB_CHANNELS).collect();
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The raw interleaved samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The `[r, g, b]` sample at row `i`, column `j`.
    pub fn pixel(&self, i: usize, j: usize) -> [u8; 3] {
        let idx = (i * self.cols + j) * RGB_CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// Single-channel real-valued luminance, one value per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct LuminanceGrid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl LuminanceGrid {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, BitmapError> {
        let expected = checked_len(rows, cols, 1)?;
        if data.len() != expected {
            return Err(BitmapError::DimensionMismatch {
                expected: format!("{} values for {}x{}", expected, rows, cols),
                actual: format!("{} values", data.len()),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Caller guarantees `data.len() == rows * cols`.
    pub(crate) fn from_raw(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }
}

/// A 1-bit image, each cell holding 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl BitGrid {
    /// Wrap a row-major buffer of 0/1 values.
    pub fn new(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self, BitmapError> {
        let expected = checked_len(rows, cols, 1)?;
        if data.len() != expected {
            return Err(BitmapError::DimensionMismatch {
                expected: format!("{} bits for {}x{}", expected, rows, cols),
                actual: format!("{} bits", data.len()),
            });
        }
        if let Some(bad) = data.iter().find(|&&b| b > 1) {
            return Err(BitmapError::MalformedInput(format!(
                "bit grid value {} is not 0 or 1",
                bad
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows, all of equal length.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, BitmapError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|r| r.len() != cols) {
            return Err(BitmapError::DimensionMismatch {
                expected: format!("rows of {} bits", cols),
                actual: format!("a row of {} bits", row.len()),
            });
        }
        Self::new(rows.len(), cols, rows.concat())
    }

    /// Caller guarantees one 0/1 value per cell.
    pub(crate) fn from_raw(rows: usize, cols: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn bits(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.data[i * self.cols + j]
    }

    /// Iterate column `j` from the top row down.
    pub fn column(&self, j: usize) -> impl Iterator<Item = u8> + '_ {
        self.data.iter().skip(j).step_by(self.cols.max(1)).copied().take(self.rows)
    }

    /// Flip every bit (`1 - b`).
    ///
    /// Turns a "brighter than threshold" grid into an ink grid where 1 marks a
    /// dark (printed) dot.
    pub fn inverted(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&b| 1 - b).collect(),
        }
    }
}
