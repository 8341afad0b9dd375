/// Error types for the metrics crate.
#[derive(Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum MetricsError {
    /// Prediction and ground truth have different lengths.
    #[error("Length mismatch: {pred} predictions vs {target} targets")]
    LengthMismatch {
        /// Number of predictions.
        pred: usize,
        /// Number of ground-truth entries.
        target: usize,
    },

    /// The metric is undefined for an empty input.
    #[error("Cannot compute {0} on an empty input")]
    EmptyInput(&'static str),

    /// The ROC AUC is not defined for the given targets and scores.
    #[error("AUC is undefined: {0}")]
    AucUndefined(String),
}

pub(crate) fn check_lengths(pred: usize, target: usize) -> Result<(), MetricsError> {
    if pred != target {
        return Err(MetricsError::LengthMismatch { pred, target });
    }
    Ok(())
}
