use std::path::Path;

use dental_3d::axis::Axis;
use serde::{Deserialize, Serialize};

use crate::DataError;

/// Per-point class labels of a scan, `{"labels": [..]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelAnnotation {
    /// One class index per scan vertex.
    #[serde(default)]
    pub labels: Vec<i64>,
}

/// Landmark coordinates of a scan, `{"landmarks": [[x, y, z], ..]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkAnnotation {
    /// Landmarks in the scan frame.
    pub landmarks: Vec<[f64; 3]>,
}

/// Tooth axis of a scan, `{"origin": [..], "direction": [..]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisAnnotation {
    /// A point on the axis, in the scan frame.
    pub origin: [f64; 3],
    /// The axis direction, any length.
    pub direction: [f64; 3],
}

impl From<AxisAnnotation> for Axis {
    fn from(annotation: AxisAnnotation) -> Self {
        Axis::new(annotation.origin, annotation.direction)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

/// Read landmarks from a JSON file.
pub fn read_landmarks(path: impl AsRef<Path>) -> Result<Vec<[f64; 3]>, DataError> {
    let annotation: LandmarkAnnotation = read_json(path.as_ref())?;
    Ok(annotation.landmarks)
}

/// Read a tooth axis from a JSON file. The direction is scaled to unit length.
pub fn read_axis(path: impl AsRef<Path>) -> Result<Axis, DataError> {
    let annotation: AxisAnnotation = read_json(path.as_ref())?;
    Ok(annotation.into())
}

/// Read per-point labels and check them against the scan.
///
/// # Arguments
///
/// * `path` - The label file.
/// * `num_points` - The number of vertices of the paired scan.
/// * `num_classes` - The number of classes.
///
/// # Returns
///
/// The labels, or [`DataError::InvalidLabels`] if the file cannot be parsed,
/// holds a different number of labels than `num_points`, or holds a label
/// outside `[0, num_classes)`.
pub fn read_labels_strict(
    path: impl AsRef<Path>,
    num_points: usize,
    num_classes: usize,
) -> Result<Vec<usize>, DataError> {
    let path = path.as_ref();
    let invalid = |reason: String| DataError::InvalidLabels {
        path: path.to_path_buf(),
        reason,
    };

    let annotation: LabelAnnotation = read_json(path).map_err(|e| invalid(e.to_string()))?;
    if annotation.labels.len() != num_points {
        return Err(invalid(format!(
            "label count ({}) does not match point count ({num_points})",
            annotation.labels.len()
        )));
    }

    annotation
        .labels
        .iter()
        .map(|&l| match usize::try_from(l) {
            Ok(l) if l < num_classes => Ok(l),
            _ => Err(invalid(format!("label {l} not in [0, {num_classes})"))),
        })
        .collect()
}

/// Read per-point labels, falling back to all zeros when they are unusable.
///
/// Any failure of [`read_labels_strict`] is logged as a warning and replaced
/// by `num_points` background labels, so a long batch job keeps running.
pub fn read_labels(path: impl AsRef<Path>, num_points: usize, num_classes: usize) -> Vec<usize> {
    match read_labels_strict(path, num_points, num_classes) {
        Ok(labels) => labels,
        Err(e) => {
            log::warn!("{e}; using all-zero labels");
            vec![0; num_points]
        }
    }
}
