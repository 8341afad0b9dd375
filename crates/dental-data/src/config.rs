use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::DataError;

/// The three dental analysis tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Per-point tooth segmentation.
    Segmentation,
    /// Anatomical landmark detection.
    Landmarks,
    /// Tooth axis estimation.
    Axis,
}

impl TaskKind {
    /// Directory holding the scans, relative to the split root.
    pub fn scan_dir(&self) -> &'static str {
        match self {
            TaskKind::Segmentation | TaskKind::Landmarks => "scans",
            TaskKind::Axis => "teeth",
        }
    }

    /// Directory holding the JSON annotations, relative to the split root.
    pub fn annotation_dir(&self) -> &'static str {
        match self {
            TaskKind::Segmentation => "labels",
            TaskKind::Landmarks => "landmarks",
            TaskKind::Axis => "axes",
        }
    }

    /// Default number of points per sample.
    pub fn default_num_points(&self) -> usize {
        match self {
            TaskKind::Segmentation => 10_000,
            TaskKind::Landmarks | TaskKind::Axis => 2048,
        }
    }
}

impl std::str::FromStr for TaskKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "segmentation" => Ok(TaskKind::Segmentation),
            "landmarks" => Ok(TaskKind::Landmarks),
            "axis" => Ok(TaskKind::Axis),
            _ => Err(DataError::InvalidConfig(format!("unknown task `{s}`"))),
        }
    }
}

/// Configuration of one dataset split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// The task the split is annotated for.
    pub task: TaskKind,
    /// Root directory of the split.
    pub root: PathBuf,
    /// Points per sample; the task default when unset.
    pub num_points: Option<usize>,
    /// Number of segmentation classes.
    pub num_classes: usize,
    /// Apply training-time augmentation.
    pub augment: bool,
    /// Reject unusable label files instead of substituting zeros.
    pub strict_labels: bool,
    /// Seed for reproducible sampling and augmentation.
    pub seed: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            task: TaskKind::Segmentation,
            root: PathBuf::from("data/train"),
            num_points: None,
            num_classes: 33,
            augment: false,
            strict_labels: false,
            seed: None,
        }
    }
}

impl DatasetConfig {
    /// Create a configuration for `task` rooted at `root`.
    pub fn new(task: TaskKind, root: impl Into<PathBuf>) -> Self {
        Self {
            task,
            root: root.into(),
            ..Default::default()
        }
    }

    /// Points per sample.
    pub fn num_points(&self) -> usize {
        self.num_points
            .unwrap_or_else(|| self.task.default_num_points())
    }

    /// Check the configuration for values that cannot produce samples.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.num_points == Some(0) {
            return Err(DataError::InvalidConfig("num_points must be positive".into()));
        }
        if self.task == TaskKind::Segmentation && self.num_classes == 0 {
            return Err(DataError::InvalidConfig("num_classes must be positive".into()));
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_per_task() {
        let seg = DatasetConfig::new(TaskKind::Segmentation, "data");
        assert_eq!(seg.num_points(), 10_000);
        let axis = DatasetConfig::new(TaskKind::Axis, "data");
        assert_eq!(axis.num_points(), 2048);
        assert_eq!(axis.task.scan_dir(), "teeth");
        assert_eq!(axis.task.annotation_dir(), "axes");
    }

    #[test]
    fn test_task_from_str() -> Result<(), DataError> {
        assert_eq!("landmarks".parse::<TaskKind>()?, TaskKind::Landmarks);
        assert!("teeth".parse::<TaskKind>().is_err());
        Ok(())
    }

    #[test]
    fn test_from_json_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(br#"{"task": "landmarks", "root": "/data/val", "seed": 7}"#)?;
        let config = DatasetConfig::from_json_file(file.path())?;
        assert_eq!(config.task, TaskKind::Landmarks);
        assert_eq!(config.root, PathBuf::from("/data/val"));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.num_points(), 2048);
        assert!(!config.augment);
        Ok(())
    }

    #[test]
    fn test_invalid_config() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(br#"{"task": "axis", "num_points": 0}"#)?;
        assert!(matches!(
            DatasetConfig::from_json_file(file.path()),
            Err(DataError::InvalidConfig(_))
        ));
        Ok(())
    }
}
