//! Loss and metric computation for each task.
//!
//! A [`Task`] pairs a prediction type with a target type and knows how to
//! score one against the other, so training and evaluation code can be
//! written once for all three tasks.

use dental_3d::axis::Axis;
use dental_metrics::{axis as axis_metrics, landmark, segmentation, MetricResult};

use crate::{
    sample::{Sample, Target},
    DataError,
};

/// The loss and metrics of one task.
pub trait Task {
    /// What a model predicts for one sample.
    type Prediction: ?Sized;
    /// What the prediction is scored against.
    type Target: ?Sized;

    /// Short name of the task, used in logs.
    fn name(&self) -> &'static str;

    /// The target of a dataset sample, if the sample belongs to this task.
    fn target<'a>(&self, sample: &'a Sample) -> Option<&'a Self::Target>;

    /// The training loss of a prediction.
    fn loss(&self, pred: &Self::Prediction, target: &Self::Target) -> Result<f64, DataError>;

    /// The evaluation metrics of a prediction.
    fn metrics(
        &self,
        pred: &Self::Prediction,
        target: &Self::Target,
    ) -> Result<MetricResult, DataError>;
}

fn check_shape(what: &str, pred: usize, target: usize) -> Result<(), DataError> {
    if pred != target {
        return Err(DataError::ShapeMismatch(format!(
            "{pred} predicted {what} for {target} targets"
        )));
    }
    if target == 0 {
        return Err(DataError::ShapeMismatch(format!("no {what}")));
    }
    Ok(())
}

fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Mean squared error over every coordinate of two equally long point lists.
fn coordinate_mse(pred: &[[f64; 3]], target: &[[f64; 3]]) -> f64 {
    let total = pred
        .iter()
        .zip(target.iter())
        .map(|(p, t)| squared_distance(p, t))
        .sum::<f64>();
    total / (3 * target.len()) as f64
}

/// Per-point segmentation into `num_classes` classes.
///
/// Predictions are per-point class scores (logits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentationTask {
    /// Number of classes.
    pub num_classes: usize,
}

impl SegmentationTask {
    /// Create a segmentation task.
    pub fn new(num_classes: usize) -> Self {
        Self { num_classes }
    }

    fn check(&self, logits: &[Vec<f64>], labels: &[usize]) -> Result<(), DataError> {
        check_shape("points", logits.len(), labels.len())?;
        if let Some(row) = logits.iter().find(|row| row.len() != self.num_classes) {
            return Err(DataError::ShapeMismatch(format!(
                "{} scores for {} classes",
                row.len(),
                self.num_classes
            )));
        }
        if let Some(&label) = labels.iter().find(|&&l| l >= self.num_classes) {
            return Err(DataError::LabelOutOfRange {
                label,
                num_classes: self.num_classes,
            });
        }
        Ok(())
    }
}

/// Index of the largest score, the first one on ties.
pub fn argmax(scores: &[f64]) -> usize {
    scores
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, max), (i, &s)| {
            if s > max {
                (i, s)
            } else {
                (best, max)
            }
        })
        .0
}

fn log_sum_exp(scores: &[f64]) -> f64 {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    max + scores.iter().map(|s| (s - max).exp()).sum::<f64>().ln()
}

impl Task for SegmentationTask {
    type Prediction = [Vec<f64>];
    type Target = [usize];

    fn name(&self) -> &'static str {
        "segmentation"
    }

    fn target<'a>(&self, sample: &'a Sample) -> Option<&'a [usize]> {
        sample.target.as_labels()
    }

    /// Mean cross-entropy of the softmax of the scores.
    fn loss(&self, logits: &[Vec<f64>], labels: &[usize]) -> Result<f64, DataError> {
        self.check(logits, labels)?;
        let total = logits
            .iter()
            .zip(labels.iter())
            .map(|(row, &label)| log_sum_exp(row) - row[label])
            .sum::<f64>();
        Ok(total / labels.len() as f64)
    }

    fn metrics(&self, logits: &[Vec<f64>], labels: &[usize]) -> Result<MetricResult, DataError> {
        self.check(logits, labels)?;
        let pred = logits.iter().map(|row| argmax(row)).collect::<Vec<_>>();
        Ok(segmentation::segmentation_metrics(
            &pred,
            labels,
            self.num_classes,
        )?)
    }
}

/// Landmark regression in the normalized frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LandmarkTask;

impl Task for LandmarkTask {
    type Prediction = [[f64; 3]];
    type Target = [[f64; 3]];

    fn name(&self) -> &'static str {
        "landmarks"
    }

    fn target<'a>(&self, sample: &'a Sample) -> Option<&'a [[f64; 3]]> {
        sample.target.as_landmarks()
    }

    fn loss(&self, pred: &[[f64; 3]], target: &[[f64; 3]]) -> Result<f64, DataError> {
        check_shape("landmarks", pred.len(), target.len())?;
        Ok(coordinate_mse(pred, target))
    }

    fn metrics(&self, pred: &[[f64; 3]], target: &[[f64; 3]]) -> Result<MetricResult, DataError> {
        Ok(landmark::landmark_metrics(pred, target)?)
    }
}

/// Tooth axis regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTask {
    /// Weight of the origin term of the loss.
    pub origin_weight: f64,
}

impl Default for AxisTask {
    fn default() -> Self {
        Self { origin_weight: 1.0 }
    }
}

impl Task for AxisTask {
    type Prediction = [Axis];
    type Target = [Axis];

    fn name(&self) -> &'static str {
        "axis"
    }

    fn target<'a>(&self, sample: &'a Sample) -> Option<&'a [Axis]> {
        match &sample.target {
            Target::Axis(axis) => Some(std::slice::from_ref(axis)),
            _ => None,
        }
    }

    /// Angular loss of the directions plus the weighted origin MSE.
    fn loss(&self, pred: &[Axis], target: &[Axis]) -> Result<f64, DataError> {
        check_shape("axes", pred.len(), target.len())?;
        let directions = |axes: &[Axis]| axes.iter().map(|a| a.direction).collect::<Vec<_>>();
        let origins = |axes: &[Axis]| axes.iter().map(|a| a.origin).collect::<Vec<_>>();

        let angular = axis_metrics::angular_loss(&directions(pred), &directions(target))?;
        let origin = coordinate_mse(&origins(pred), &origins(target));
        Ok(angular + self.origin_weight * origin)
    }

    fn metrics(&self, pred: &[Axis], target: &[Axis]) -> Result<MetricResult, DataError> {
        Ok(axis_metrics::batch_axis_metrics(pred, target)?)
    }
}
