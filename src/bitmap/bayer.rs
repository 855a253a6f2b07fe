//! Bayer threshold matrices for ordered dithering.
//!
//! A Bayer matrix of size `n` is a permutation of `0..n*n` laid out so that
//! consecutive thresholds are spread as far apart as possible. It is built
//! recursively: each level scales the previous matrix by 4 and tiles it into
//! four quadrants offset by 0, 2, 3 and 1:
//!
//! ```text
//! | 4*M + 0   4*M + 2 |
//! | 4*M + 3   4*M + 1 |
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use super::error::BitmapError;

/// Matrix size used when none is configured.
pub const DEFAULT_MATRIX_SIZE: usize = 16;

/// Largest accepted matrix size, for CLI and config values alike.
pub const MAX_MATRIX_SIZE: usize = 256;

/// The 2x2 base case, row-major.
const BASE: [u32; 4] = [0, 2, 3, 1];

/// Quadrant offsets in row-major quadrant order (TL, TR, BL, BR).
const QUADRANT_OFFSETS: [u32; 4] = [0, 2, 3, 1];

/// Raw Bayer ranks, `size * size` values in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BayerMatrix {
    size: usize,
    values: Vec<u32>,
}

impl BayerMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.values[i * self.size + j]
    }
}

/// Check that `n` is a power of two between 2 and [`MAX_MATRIX_SIZE`].
pub fn validate_size(n: usize) -> Result<(), BitmapError> {
    if n < 2 || !n.is_power_of_two() {
        return Err(BitmapError::invalid_matrix_size(n));
    }
    if n > MAX_MATRIX_SIZE {
        return Err(BitmapError::matrix_size_too_large(n, MAX_MATRIX_SIZE));
    }
    Ok(())
}

/// Build the `n x n` Bayer matrix.
pub fn generate(n: usize) -> Result<BayerMatrix, BitmapError> {
    validate_size(n)?;
    Ok(BayerMatrix {
        size: n,
        values: sub_matrix(n),
    })
}

fn sub_matrix(n: usize) -> Vec<u32> {
    if n <= 2 {
        return BASE.to_vec();
    }

    let half = n / 2;
    let recurse = sub_matrix(half);
    let mut values = vec![0u32; n * n];

    for (quadrant, &offset) in QUADRANT_OFFSETS.iter().enumerate() {
        let row0 = (quadrant / 2) * half;
        let col0 = (quadrant % 2) * half;
        for i in 0..half {
            for j in 0..half {
                values[(row0 + i) * n + col0 + j] = 4 * recurse[i * half + j] + offset;
            }
        }
    }

    values
}

/// Bayer ranks scaled into the 0-255 luminance domain.
///
/// Each rank `r` becomes `255 * (1 + r) / (1 + n*n)`, so no threshold is
/// exactly 0 or 255.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdMatrix {
    size: usize,
    mask: usize,
    values: Vec<f64>,
}

impl ThresholdMatrix {
    /// Generate and normalize the matrix of size `n`.
    pub fn new(n: usize) -> Result<Self, BitmapError> {
        Ok(Self::from_bayer(&generate(n)?))
    }

    pub fn from_bayer(bayer: &BayerMatrix) -> Self {
        let n = bayer.size();
        let denom = (1 + n * n) as f64;
        let values = bayer
            .values()
            .iter()
            .map(|&rank| 255.0 * (1.0 + rank as f64) / denom)
            .collect();
        Self {
            size: n,
            mask: n - 1,
            values,
        }
    }

    /// Shared matrix of size `n`, generated on first use.
    pub fn cached(n: usize) -> Result<Arc<Self>, BitmapError> {
        static CACHE: OnceLock<Mutex<HashMap<usize, Arc<ThresholdMatrix>>>> = OnceLock::new();

        validate_size(n)?;
        let mut cache = CACHE
            .get_or_init(|| Mutex::new(HashMap::new()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(matrix) = cache.get(&n) {
            return Ok(Arc::clone(matrix));
        }

        log::debug!("Generating {}x{} Bayer threshold matrix", n, n);
        let matrix = Arc::new(Self::new(n)?);
        cache.insert(n, Arc::clone(&matrix));
        Ok(matrix)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Threshold for image position `(i, j)`, tiling the matrix over the image.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.values[(i & self.mask) * self.size + (j & self.mask)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_case() {
        let m = generate(2).unwrap();
        assert_eq!(m.values(), &[0, 2, 3, 1]);
    }

    #[test]
    fn test_four_by_four() {
        let m = generate(4).unwrap();
        #[rustfmt::skip]
        let expected = [
             0,  8,  2, 10,
            12,  4, 14,  6,
             3, 11,  1,  9,
            15,  7, 13,  5,
        ];
        assert_eq!(m.values(), &expected);
    }

    #[test]
    fn test_rejects_bad_sizes() {
        for n in [0, 1, 3, 6, 12] {
            assert!(
                matches!(generate(n), Err(BitmapError::InvalidParameter { .. })),
                "size {} should be rejected",
                n
            );
        }
    }

    #[test]
    fn test_rejects_oversized() {
        assert!(generate(MAX_MATRIX_SIZE).is_ok());
        for n in [MAX_MATRIX_SIZE * 2, 1 << 17, 1 << 20] {
            assert_eq!(
                generate(n).unwrap_err(),
                BitmapError::matrix_size_too_large(n, MAX_MATRIX_SIZE)
            );
            assert!(ThresholdMatrix::cached(n).is_err());
        }
    }

    #[test]
    fn test_threshold_2x2_values() {
        let t = ThresholdMatrix::new(2).unwrap();
        let expected = [51.0, 153.0, 204.0, 102.0];
        for (got, want) in t.values().iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
        }
    }

    #[test]
    fn test_threshold_tiles() {
        let t = ThresholdMatrix::new(4).unwrap();
        assert_eq!(t.at(0, 0), t.at(4, 8));
        assert_eq!(t.at(1, 3), t.at(5, 7));
        assert_eq!(t.at(3, 2), t.at(19, 34));
    }

    #[test]
    fn test_cached_returns_same_matrix() {
        let a = ThresholdMatrix::cached(8).unwrap();
        let b = ThresholdMatrix::cached(8).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, ThresholdMatrix::new(8).unwrap());
    }

    #[test]
    fn test_cached_rejects_bad_size() {
        assert!(ThresholdMatrix::cached(5).is_err());
    }
}
