use std::path::PathBuf;

/// An error type for the dental-data crate.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DataError {
    /// Error to open or read a file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to parse a JSON document.
    #[error("Failed to parse JSON. {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error to read a mesh file.
    #[error("Failed to read mesh. {0}")]
    MeshError(#[from] dental_3d::io::obj::ObjError),

    /// Error in a geometric operation.
    #[error("Geometry error. {0}")]
    GeometryError(#[from] dental_3d::Dental3dError),

    /// Error computing a metric.
    #[error("Metric error. {0}")]
    MetricsError(#[from] dental_metrics::MetricsError),

    /// The label file does not describe the scan it is paired with.
    #[error("Invalid labels in {path}: {reason}")]
    InvalidLabels {
        /// The label file.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// A class index outside `[0, num_classes)`.
    #[error("Label {label} out of range for {num_classes} classes")]
    LabelOutOfRange {
        /// The offending label.
        label: usize,
        /// The number of classes.
        num_classes: usize,
    },

    /// Prediction and target shapes do not match.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A sample index past the end of the dataset.
    #[error("Sample index {index} out of bounds for {len} samples")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The dataset size.
        len: usize,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
