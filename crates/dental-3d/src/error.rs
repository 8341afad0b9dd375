/// Error types for the dental-3d crate.
#[derive(Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum Dental3dError {
    /// The point set has no points.
    #[error("Point set is empty")]
    EmptyPointCloud,

    /// The requested number of samples is not valid.
    #[error("Invalid target sample size: {0}")]
    InvalidSampleSize(usize),

    /// An index does not address an element of the array.
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The length of the indexed array.
        len: usize,
    },

    /// Two arrays that must be paired have different lengths.
    #[error("Length mismatch: {left} points vs {right} values")]
    LengthMismatch {
        /// Length of the point array.
        left: usize,
        /// Length of the paired array.
        right: usize,
    },

    /// An augmentation parameter out of its valid domain.
    #[error("Invalid augmentation parameter: {0}")]
    InvalidAugmentParameter(String),
}
