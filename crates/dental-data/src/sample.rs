use dental_3d::{axis::Axis, normalize::Normalization, pointcloud::PointCloud};

/// The annotation a sample is trained against.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// One class index per point.
    Labels(Vec<usize>),
    /// Landmark coordinates in the normalized frame.
    Landmarks(Vec<[f64; 3]>),
    /// Tooth axis in the normalized frame.
    Axis(Axis),
}

impl Target {
    /// The labels, if this is a segmentation target.
    pub fn as_labels(&self) -> Option<&[usize]> {
        match self {
            Target::Labels(labels) => Some(labels),
            _ => None,
        }
    }

    /// The landmarks, if this is a landmark target.
    pub fn as_landmarks(&self) -> Option<&[[f64; 3]]> {
        match self {
            Target::Landmarks(landmarks) => Some(landmarks),
            _ => None,
        }
    }

    /// The axis, if this is an axis target.
    pub fn as_axis(&self) -> Option<&Axis> {
        match self {
            Target::Axis(axis) => Some(axis),
            _ => None,
        }
    }
}

/// A fixed-size, normalized point set with its target.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Stable key, the scan file stem.
    pub key: String,
    /// The sampled and normalized points.
    pub points: PointCloud,
    /// The target in the same frame as `points`.
    pub target: Target,
    /// The normalization fitted on the sampled scan points. Its inverse maps
    /// predictions back to scanner units (before any augmentation).
    pub normalization: Normalization,
}
