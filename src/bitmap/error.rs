//! Error types for the bitmap conversion core.

/// Errors raised by the conversion stages.
///
/// Every stage is a deterministic function of its input, so none of these are
/// retried: the current conversion is abandoned and nothing is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitmapError {
    /// A numeric parameter is outside its accepted domain
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter (e.g. "matrix_size")
        name: &'static str,
        /// Human-readable explanation
        reason: String,
    },

    /// A grid does not have the shape the stage expects
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Description of the expected shape
        expected: String,
        /// Description of the shape actually received
        actual: String,
    },

    /// The input image could not be used
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl BitmapError {
    /// Shorthand for a matrix size that is not a power of two >= 2.
    pub fn invalid_matrix_size(size: usize) -> Self {
        BitmapError::InvalidParameter {
            name: "matrix_size",
            reason: format!("{} is not a power of two >= 2", size),
        }
    }

    /// Shorthand for a matrix size above the supported maximum.
    pub fn matrix_size_too_large(size: usize, max: usize) -> Self {
        BitmapError::InvalidParameter {
            name: "matrix_size",
            reason: format!("{} exceeds the maximum of {}", size, max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_matrix_size_message() {
        let err = BitmapError::invalid_matrix_size(6);
        assert_eq!(
            err.to_string(),
            "Invalid parameter matrix_size: 6 is not a power of two >= 2"
        );
    }

    #[test]
    fn test_matrix_size_too_large_message() {
        let err = BitmapError::matrix_size_too_large(512, 256);
        assert_eq!(
            err.to_string(),
            "Invalid parameter matrix_size: 512 exceeds the maximum of 256"
        );
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = BitmapError::DimensionMismatch {
            expected: "3 channels".to_string(),
            actual: "4 channels".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected 3 channels, got 4 channels"
        );
    }
}
