use dental_3d::{axis::Axis, ops};
use glam::DVec3;

use crate::{error::check_lengths, MetricResult, MetricsError};

// unit vector, zero stays zero
fn unit(v: &[f64; 3]) -> DVec3 {
    let v = DVec3::from_array(*v);
    v / v.length().max(ops::NORM_EPS)
}

/// Cosine similarity between two directions after scaling both to unit length.
///
/// A zero-length input yields 0.0.
pub fn cosine_similarity(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    unit(a).dot(unit(b))
}

/// Angular loss between batches of predicted and ground-truth directions.
///
/// The loss of a pair is defined as:
///
/// $ L = 1 - |\cos \theta| $
///
/// The absolute value makes a direction and its negation equally correct,
/// since a tooth axis has no intrinsic orientation.
///
/// # Arguments
///
/// * `pred` - Predicted directions, not necessarily unit length.
/// * `gt` - Ground-truth directions, not necessarily unit length.
///
/// # Returns
///
/// The mean loss over the batch.
///
/// Example:
///
/// ```
/// use dental_metrics::axis::angular_loss;
///
/// let loss = angular_loss(&[[0.0, 0.0, 2.0]], &[[0.0, 0.0, -1.0]]).unwrap();
/// assert!(loss.abs() < 1e-12);
/// ```
pub fn angular_loss(pred: &[[f64; 3]], gt: &[[f64; 3]]) -> Result<f64, MetricsError> {
    check_lengths(pred.len(), gt.len())?;
    if pred.is_empty() {
        return Err(MetricsError::EmptyInput("angular loss"));
    }
    let total = pred
        .iter()
        .zip(gt.iter())
        .map(|(p, g)| 1.0 - cosine_similarity(p, g).abs())
        .sum::<f64>();
    Ok(total / pred.len() as f64)
}

/// Angle in degrees between two undirected axes, in `[0, 90]`.
///
/// The cosine is clipped to `[-1, 1]` before the inverse cosine so rounding
/// can never leave its domain.
pub fn angle_error_deg(pred: &[f64; 3], gt: &[f64; 3]) -> f64 {
    cosine_similarity(pred, gt)
        .clamp(-1.0, 1.0)
        .abs()
        .acos()
        .to_degrees()
}

/// Euclidean distance between predicted and ground-truth axis origins.
pub fn origin_error(pred: &[f64; 3], gt: &[f64; 3]) -> f64 {
    ops::euclidean_distance(pred, gt)
}

/// Metrics for a single predicted axis.
///
/// Keys: `origin_error`, `angle_error_deg`.
pub fn axis_metrics(pred: &Axis, gt: &Axis) -> MetricResult {
    let mut metrics = MetricResult::new();
    metrics.insert_scalar("origin_error", origin_error(&pred.origin, &gt.origin));
    metrics.insert_scalar(
        "angle_error_deg",
        angle_error_deg(&pred.direction, &gt.direction),
    );
    metrics
}

/// Metrics averaged over a batch of predicted axes.
///
/// Keys: `origin_error`, `angle_error_deg`, `angular_loss`.
pub fn batch_axis_metrics(pred: &[Axis], gt: &[Axis]) -> Result<MetricResult, MetricsError> {
    check_lengths(pred.len(), gt.len())?;
    if pred.is_empty() {
        return Err(MetricsError::EmptyInput("axis metrics"));
    }
    let n = pred.len() as f64;

    let (origin_sum, angle_sum) =
        pred.iter()
            .zip(gt.iter())
            .fold((0.0, 0.0), |(o, a), (p, g)| {
                (
                    o + origin_error(&p.origin, &g.origin),
                    a + angle_error_deg(&p.direction, &g.direction),
                )
            });

    let pred_dirs = pred.iter().map(|a| a.direction).collect::<Vec<_>>();
    let gt_dirs = gt.iter().map(|a| a.direction).collect::<Vec<_>>();

    let mut metrics = MetricResult::new();
    metrics.insert_scalar("origin_error", origin_sum / n);
    metrics.insert_scalar("angle_error_deg", angle_sum / n);
    metrics.insert_scalar("angular_loss", angular_loss(&pred_dirs, &gt_dirs)?);
    Ok(metrics)
}
