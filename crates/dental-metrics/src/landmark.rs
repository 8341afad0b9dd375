use dental_3d::ops;

use crate::{error::check_lengths, MetricResult, MetricsError};

/// Distance thresholds, in millimetres, at which PCK is reported.
pub const PCK_THRESHOLDS: [f64; 4] = [1.0, 2.0, 3.0, 5.0];

/// Euclidean distance between each predicted landmark and its ground truth.
pub fn landmark_distances(
    pred: &[[f64; 3]],
    gt: &[[f64; 3]],
) -> Result<Vec<f64>, MetricsError> {
    check_lengths(pred.len(), gt.len())?;
    Ok(pred
        .iter()
        .zip(gt.iter())
        .map(|(p, g)| ops::euclidean_distance(p, g))
        .collect())
}

/// Mean radial error: the mean landmark distance.
pub fn mean_radial_error(pred: &[[f64; 3]], gt: &[[f64; 3]]) -> Result<f64, MetricsError> {
    let distances = landmark_distances(pred, gt)?;
    if distances.is_empty() {
        return Err(MetricsError::EmptyInput("mean radial error"));
    }
    Ok(distances.iter().sum::<f64>() / distances.len() as f64)
}

/// Percentage of correct keypoints: the fraction of distances strictly below `threshold`.
///
/// Returns 0.0 for an empty input.
pub fn pck(distances: &[f64], threshold: f64) -> f64 {
    if distances.is_empty() {
        return 0.0;
    }
    distances.iter().filter(|&&d| d < threshold).count() as f64 / distances.len() as f64
}

/// Name under which the PCK at `threshold` is reported, e.g. `pck@2.0mm`.
pub fn pck_key(threshold: f64) -> String {
    format!("pck@{threshold:?}mm")
}

/// Landmark metrics at the default [`PCK_THRESHOLDS`].
///
/// Keys: `mre`, `std`, and one `pck@<t>mm` per threshold.
///
/// Example:
///
/// ```
/// use dental_metrics::landmark::landmark_metrics;
///
/// let pred = [[0.0, 0.0, 0.0], [0.0, 0.0, 4.0]];
/// let gt = [[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
/// let metrics = landmark_metrics(&pred, &gt).unwrap();
/// assert_eq!(metrics.scalar("mre"), Some(2.0));
/// assert_eq!(metrics.scalar("pck@5.0mm"), Some(1.0));
/// ```
pub fn landmark_metrics(pred: &[[f64; 3]], gt: &[[f64; 3]]) -> Result<MetricResult, MetricsError> {
    landmark_metrics_with_thresholds(pred, gt, &PCK_THRESHOLDS)
}

/// Landmark metrics at custom PCK thresholds.
pub fn landmark_metrics_with_thresholds(
    pred: &[[f64; 3]],
    gt: &[[f64; 3]],
    thresholds: &[f64],
) -> Result<MetricResult, MetricsError> {
    let distances = landmark_distances(pred, gt)?;
    if distances.is_empty() {
        return Err(MetricsError::EmptyInput("landmark metrics"));
    }

    let n = distances.len() as f64;
    let mre = distances.iter().sum::<f64>() / n;
    // population standard deviation
    let std = (distances.iter().map(|d| (d - mre).powi(2)).sum::<f64>() / n).sqrt();

    let mut metrics = MetricResult::new();
    metrics.insert_scalar("mre", mre);
    metrics.insert_scalar("std", std);
    for &t in thresholds {
        metrics.insert_scalar(pck_key(t), pck(&distances, t));
    }
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn offsets(errors: &[f64]) -> (Vec<[f64; 3]>, Vec<[f64; 3]>) {
        let gt = errors.iter().map(|_| [1.0, 2.0, 3.0]).collect::<Vec<_>>();
        let pred = errors.iter().map(|e| [1.0 + e, 2.0, 3.0]).collect::<Vec<_>>();
        (pred, gt)
    }

    #[test]
    fn test_mre_and_std() -> Result<(), MetricsError> {
        let (pred, gt) = offsets(&[1.0, 3.0]);
        let metrics = landmark_metrics(&pred, &gt)?;
        assert_relative_eq!(metrics.scalar("mre").unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.scalar("std").unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(mean_radial_error(&pred, &gt)?, 2.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_pck_keys_and_strictness() -> Result<(), MetricsError> {
        // an error of exactly 2.0 is not below the 2.0 threshold
        let (pred, gt) = offsets(&[0.5, 2.0, 2.5, 4.0, 6.0]);
        let metrics = landmark_metrics(&pred, &gt)?;
        assert_eq!(metrics.scalar("pck@1.0mm"), Some(0.2));
        assert_eq!(metrics.scalar("pck@2.0mm"), Some(0.2));
        assert_eq!(metrics.scalar("pck@3.0mm"), Some(0.6));
        assert_eq!(metrics.scalar("pck@5.0mm"), Some(0.8));
        assert_eq!(metrics.len(), 6);
        Ok(())
    }

    #[test]
    fn test_pck_monotonic() -> Result<(), MetricsError> {
        let errors = (0..40).map(|i| i as f64 * 0.17).collect::<Vec<_>>();
        let (pred, gt) = offsets(&errors);
        let distances = landmark_distances(&pred, &gt)?;
        let values = PCK_THRESHOLDS
            .iter()
            .map(|&t| pck(&distances, t))
            .collect::<Vec<_>>();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn test_custom_thresholds() -> Result<(), MetricsError> {
        let (pred, gt) = offsets(&[0.1, 0.3]);
        let metrics = landmark_metrics_with_thresholds(&pred, &gt, &[0.25])?;
        assert_eq!(metrics.scalar("pck@0.25mm"), Some(0.5));
        Ok(())
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            landmark_metrics(&[], &[]),
            Err(MetricsError::EmptyInput("landmark metrics"))
        );
        assert!(matches!(
            landmark_metrics(&[[0.0; 3]], &[[0.0; 3], [1.0; 3]]),
            Err(MetricsError::LengthMismatch { .. })
        ));
    }
}
