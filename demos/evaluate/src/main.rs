use argh::FromArgs;
use std::path::{Path, PathBuf};

use dental::d3d::io::obj::read_obj_points;
use dental::data::{
    annotation::{read_axis, read_labels, read_labels_strict, read_landmarks},
    config::{DatasetConfig, TaskKind},
    dataset::Dataset,
    evaluator::{Evaluator, MetricAccumulator},
    task::{AxisTask, LandmarkTask},
};
use dental::metrics::{segmentation, MetricResult};

#[derive(FromArgs)]
/// Inspect a dental dataset split and score predictions against its annotations
struct Args {
    /// path to a JSON dataset configuration
    #[argh(option)]
    config: Option<PathBuf>,

    /// split root directory, used when no configuration is given
    #[argh(option, default = "PathBuf::from(\"data/val\")")]
    root: PathBuf,

    /// task of the split: segmentation, landmarks or axis
    #[argh(option, default = "TaskKind::Segmentation")]
    task: TaskKind,

    /// number of points per sample
    #[argh(option)]
    num_points: Option<usize>,

    /// seed for sampling and augmentation
    #[argh(option)]
    seed: Option<u64>,

    /// apply training-time augmentation to the printed samples
    #[argh(switch)]
    augment: bool,

    /// directory of prediction JSON files named after the scans
    #[argh(option)]
    predictions: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = match args.config {
        Some(path) => DatasetConfig::from_json_file(path)?,
        None => DatasetConfig {
            num_points: args.num_points,
            augment: args.augment,
            seed: args.seed,
            ..DatasetConfig::new(args.task, args.root)
        },
    };

    let dataset = Dataset::new(config)?;
    println!(
        "{:?} split at {}: #{} samples",
        dataset.config().task,
        dataset.config().root.display(),
        dataset.len()
    );

    for index in 0..dataset.len() {
        let sample = dataset.get_seeded(index)?;
        let (min, max) = sample.points.bounds().unwrap_or(([0.0; 3], [0.0; 3]));
        println!(
            "{}: #{} points, bounds {:.3?} - {:.3?}, scale {:.3}",
            sample.key,
            sample.points.len(),
            min,
            max,
            sample.normalization.scale
        );
    }

    if let Some(dir) = args.predictions {
        let metrics = score_predictions(&dataset, &dir)?;
        println!("{}", metrics.to_json()?);
    }

    Ok(())
}

fn prediction_path(dir: &Path, key: &str) -> Option<PathBuf> {
    let path = dir.join(format!("{key}.json"));
    if path.is_file() {
        Some(path)
    } else {
        log::warn!("No prediction for {key}");
        None
    }
}

/// Score predictions in scanner units against the raw annotations.
fn score_predictions(
    dataset: &Dataset,
    dir: &Path,
) -> Result<MetricResult, Box<dyn std::error::Error>> {
    let config = dataset.config();

    let metrics = match config.task {
        TaskKind::Segmentation => {
            let mut accumulator = MetricAccumulator::new();
            for files in dataset.files() {
                let Some(path) = prediction_path(dir, &files.key) else {
                    continue;
                };
                let num_points = read_obj_points(&files.scan)?.len();
                let gt = read_labels(&files.annotation, num_points, config.num_classes);
                let pred = read_labels_strict(&path, num_points, config.num_classes)?;
                accumulator.add(&segmentation::segmentation_metrics(
                    &pred,
                    &gt,
                    config.num_classes,
                )?);
            }
            accumulator.mean()
        }
        TaskKind::Landmarks => {
            let task = LandmarkTask;
            let mut evaluator = Evaluator::new(&task);
            for files in dataset.files() {
                let Some(path) = prediction_path(dir, &files.key) else {
                    continue;
                };
                let gt = read_landmarks(&files.annotation)?;
                let pred = read_landmarks(&path)?;
                evaluator.update(&pred, &gt)?;
            }
            evaluator.finish()
        }
        TaskKind::Axis => {
            let task = AxisTask::default();
            let mut evaluator = Evaluator::new(&task);
            for files in dataset.files() {
                let Some(path) = prediction_path(dir, &files.key) else {
                    continue;
                };
                let gt = read_axis(&files.annotation)?;
                let pred = read_axis(&path)?;
                evaluator.update(&[pred], &[gt])?;
            }
            evaluator.finish()
        }
    };

    Ok(metrics)
}
