use std::path::{Path, PathBuf};

use dental_3d::{
    augment::{augment, AugmentConfig, Targets},
    io::obj::read_obj_points,
    normalize::Normalization,
    pointcloud::PointCloud,
    sampling::{gather, sample_indices, sample_with_values},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    annotation::{read_axis, read_labels, read_labels_strict, read_landmarks},
    config::{DatasetConfig, TaskKind},
    sample::{Sample, Target},
    DataError,
};

/// A scan file paired with its annotation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFiles {
    /// The scan file stem.
    pub key: String,
    /// The OBJ scan.
    pub scan: PathBuf,
    /// The JSON annotation.
    pub annotation: PathBuf,
}

fn is_obj(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"))
}

/// List the scans of a split and pair each with its annotation by file stem.
///
/// Scans are returned sorted by path. Scans without an annotation are
/// skipped. A missing scan directory yields an empty list.
///
/// # Arguments
///
/// * `root` - The split root directory.
/// * `task` - The task, which fixes the directory layout.
pub fn discover(root: impl AsRef<Path>, task: TaskKind) -> Result<Vec<SampleFiles>, DataError> {
    let root = root.as_ref();
    let scan_dir = root.join(task.scan_dir());
    let annotation_dir = root.join(task.annotation_dir());

    if !scan_dir.is_dir() {
        log::warn!("Scan directory {} does not exist", scan_dir.display());
        return Ok(Vec::new());
    }

    let mut scans = std::fs::read_dir(&scan_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    scans.retain(|p| is_obj(p));
    scans.sort();

    let mut files = Vec::with_capacity(scans.len());
    for scan in scans {
        let Some(key) = scan.file_stem().and_then(|s| s.to_str()).map(str::to_owned) else {
            log::debug!("Skipping {}: file stem is not valid UTF-8", scan.display());
            continue;
        };
        let annotation = annotation_dir.join(format!("{key}.json"));
        if !annotation.is_file() {
            log::debug!("Skipping {}: no annotation", scan.display());
            continue;
        }
        files.push(SampleFiles {
            key,
            scan,
            annotation,
        });
    }

    Ok(files)
}

/// Build one sample from its files.
///
/// The scan is resampled to `config.num_points()` points, normalized into the
/// unit sphere (targets with the same transform) and, if `config.augment` is
/// set, augmented with `augment_config`.
pub fn build_sample<R: Rng + ?Sized>(
    files: &SampleFiles,
    config: &DatasetConfig,
    augment_config: &AugmentConfig,
    rng: &mut R,
) -> Result<Sample, DataError> {
    let scan = read_obj_points(&files.scan)?;
    let num_points = config.num_points();

    let (mut points, mut target, normalization) = match config.task {
        TaskKind::Segmentation => {
            let labels = if config.strict_labels {
                read_labels_strict(&files.annotation, scan.len(), config.num_classes)?
            } else {
                read_labels(&files.annotation, scan.len(), config.num_classes)
            };
            let (points, labels, _) = sample_with_values(scan.points(), &labels, num_points, rng)?;
            let normalization = Normalization::fit(&points)?;
            (
                normalization.apply(&points),
                Target::Labels(labels),
                normalization,
            )
        }
        TaskKind::Landmarks => {
            let landmarks = read_landmarks(&files.annotation)?;
            let indices = sample_indices(scan.len(), num_points, rng)?;
            let points = gather(scan.points(), &indices)?;
            let normalization = Normalization::fit(&points)?;
            (
                normalization.apply(&points),
                Target::Landmarks(normalization.apply(&landmarks)),
                normalization,
            )
        }
        TaskKind::Axis => {
            let mut axis = read_axis(&files.annotation)?;
            let indices = sample_indices(scan.len(), num_points, rng)?;
            let points = gather(scan.points(), &indices)?;
            let normalization = Normalization::fit(&points)?;
            // the direction is scale and translation invariant
            axis.origin = normalization.apply_point(&axis.origin);
            (normalization.apply(&points), Target::Axis(axis), normalization)
        }
    };

    if config.augment {
        let targets = match &mut target {
            Target::Labels(_) => Targets::None,
            Target::Landmarks(landmarks) => Targets::Landmarks(landmarks),
            Target::Axis(axis) => Targets::Axis(axis),
        };
        let record = augment(&mut points, targets, augment_config, rng)?;
        log::trace!("{}: {record:?}", files.key);
    }

    Ok(Sample {
        key: files.key.clone(),
        points: PointCloud::new(points),
        target,
        normalization,
    })
}

/// A split of dental scans for one task.
///
/// Samples are built from disk on every access, so each call draws a new
/// random subset of points and new augmentations.
#[derive(Debug, Clone)]
pub struct Dataset {
    config: DatasetConfig,
    files: Vec<SampleFiles>,
    augment_config: AugmentConfig,
}

impl Dataset {
    /// Discover the samples of the split described by `config`.
    ///
    /// The augmentation defaults to the preset of the configured task.
    pub fn new(config: DatasetConfig) -> Result<Self, DataError> {
        config.validate()?;
        let files = discover(&config.root, config.task)?;
        log::info!(
            "Found {} {:?} samples in {}",
            files.len(),
            config.task,
            config.root.display()
        );

        let augment_config = match config.task {
            TaskKind::Segmentation => AugmentConfig::segmentation(),
            TaskKind::Landmarks => AugmentConfig::landmarks(),
            TaskKind::Axis => AugmentConfig::axis(),
        };

        Ok(Self {
            config,
            files,
            augment_config,
        })
    }

    /// Replace the augmentation used when `config.augment` is set.
    pub fn with_augment_config(mut self, augment_config: AugmentConfig) -> Self {
        self.augment_config = augment_config;
        self
    }

    /// The dataset configuration.
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// The augmentation configuration.
    pub fn augment_config(&self) -> &AugmentConfig {
        &self.augment_config
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the split holds no sample.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The discovered sample files.
    pub fn files(&self) -> &[SampleFiles] {
        &self.files
    }

    /// The sample keys in dataset order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.key.as_str())
    }

    /// Build the sample at `index` with the given random source.
    pub fn get<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Result<Sample, DataError> {
        let files = self.files.get(index).ok_or(DataError::IndexOutOfBounds {
            index,
            len: self.files.len(),
        })?;
        build_sample(files, &self.config, &self.augment_config, rng)
    }

    /// Build the sample at `index` with a random source derived from the
    /// configured seed and the index, or from the OS when no seed is set.
    pub fn get_seeded(&self, index: usize) -> Result<Sample, DataError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_os_rng(),
        };
        self.get(index, &mut rng)
    }
}
