use crate::{error::check_lengths, MetricResult, MetricsError};

/// Stabilizer for the per-class Dice denominator.
pub const DICE_EPS: f64 = 1e-8;

/// Stabilizer used by the binary mask metrics.
pub const MASK_EPS: f64 = 1e-10;

/// Per-class overlap counts between a prediction and a ground truth.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassCounts {
    /// Points where both prediction and ground truth equal the class.
    pub intersection: Vec<usize>,
    /// Points predicted as the class.
    pub predicted: Vec<usize>,
    /// Points labelled as the class.
    pub actual: Vec<usize>,
}

impl ClassCounts {
    /// Count overlaps for classes `0..num_classes`.
    ///
    /// Labels outside that range do not contribute to any class.
    pub fn new(pred: &[usize], gt: &[usize], num_classes: usize) -> Result<Self, MetricsError> {
        check_lengths(pred.len(), gt.len())?;
        let mut counts = Self {
            intersection: vec![0; num_classes],
            predicted: vec![0; num_classes],
            actual: vec![0; num_classes],
        };
        for (&p, &g) in pred.iter().zip(gt.iter()) {
            if p < num_classes {
                counts.predicted[p] += 1;
            }
            if g < num_classes {
                counts.actual[g] += 1;
                if p == g {
                    counts.intersection[g] += 1;
                }
            }
        }
        Ok(counts)
    }

    /// IoU of class `c`, `None` when the class is absent from both sets.
    ///
    /// # Panics
    ///
    /// Panics if `c >= self.num_classes()`, as does [`Self::dice`].
    pub fn iou(&self, c: usize) -> Option<f64> {
        let union = self.predicted[c] + self.actual[c] - self.intersection[c];
        (union > 0).then(|| self.intersection[c] as f64 / union as f64)
    }

    /// Dice coefficient of class `c`.
    pub fn dice(&self, c: usize) -> f64 {
        2.0 * self.intersection[c] as f64
            / (self.predicted[c] as f64 + self.actual[c] as f64 + DICE_EPS)
    }

    /// Number of classes counted.
    pub fn num_classes(&self) -> usize {
        self.intersection.len()
    }
}

/// Fraction of positions where prediction equals ground truth.
///
/// An empty input has an accuracy of 0.0.
pub fn point_accuracy(pred: &[usize], gt: &[usize]) -> Result<f64, MetricsError> {
    check_lengths(pred.len(), gt.len())?;
    if pred.is_empty() {
        return Ok(0.0);
    }
    let correct = pred.iter().zip(gt.iter()).filter(|(p, g)| p == g).count();
    Ok(correct as f64 / pred.len() as f64)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compute the segmentation metrics of a per-point prediction.
///
/// # Arguments
///
/// * `pred` - Predicted class per point.
/// * `gt` - Ground-truth class per point.
/// * `num_classes` - Number of classes.
///
/// # Returns
///
/// A [`MetricResult`] with the keys:
///
/// - `accuracy`: fraction of correctly classified points.
/// - `per_class_iou`: IoU of every class with a non-empty union, in class order.
/// - `mean_iou`: mean of `per_class_iou`, 0.0 when no class contributed.
/// - `per_class_dice`: Dice of every class.
/// - `mean_dice`: mean of `per_class_dice`.
///
/// Example:
///
/// ```
/// use dental_metrics::segmentation::segmentation_metrics;
///
/// let metrics = segmentation_metrics(&[0, 1, 1, 2], &[0, 1, 2, 2], 3).unwrap();
/// assert_eq!(metrics.scalar("accuracy"), Some(0.75));
/// ```
pub fn segmentation_metrics(
    pred: &[usize],
    gt: &[usize],
    num_classes: usize,
) -> Result<MetricResult, MetricsError> {
    let counts = ClassCounts::new(pred, gt, num_classes)?;

    let ious = (0..num_classes)
        .filter_map(|c| counts.iou(c))
        .collect::<Vec<_>>();
    let dices = (0..num_classes).map(|c| counts.dice(c)).collect::<Vec<_>>();

    let mut metrics = MetricResult::new();
    metrics.insert_scalar("accuracy", point_accuracy(pred, gt)?);
    metrics.insert_scalar("mean_iou", mean(&ious));
    metrics.insert_vector("per_class_iou", ious);
    metrics.insert_scalar("mean_dice", mean(&dices));
    metrics.insert_vector("per_class_dice", dices);
    Ok(metrics)
}

/// IoU of two binary masks, stabilized with [`DICE_EPS`].
pub fn compute_iou(pred_mask: &[bool], gt_mask: &[bool]) -> Result<f64, MetricsError> {
    let (intersection, union, _, _) = mask_counts(pred_mask, gt_mask)?;
    Ok(intersection as f64 / (union as f64 + DICE_EPS))
}

/// Dice coefficient of two binary masks, stabilized with [`DICE_EPS`].
pub fn compute_dice(pred_mask: &[bool], gt_mask: &[bool]) -> Result<f64, MetricsError> {
    let (intersection, _, pred_sum, gt_sum) = mask_counts(pred_mask, gt_mask)?;
    Ok(2.0 * intersection as f64 / (pred_sum as f64 + gt_sum as f64 + DICE_EPS))
}

/// Binary mask metrics in percent.
///
/// Keys: `iou`, `dice`, `pixel_accuracy`.
pub fn mask_metrics(pred_mask: &[bool], gt_mask: &[bool]) -> Result<MetricResult, MetricsError> {
    let (intersection, union, pred_sum, gt_sum) = mask_counts(pred_mask, gt_mask)?;
    let agree = pred_mask
        .iter()
        .zip(gt_mask.iter())
        .filter(|(p, g)| p == g)
        .count();
    let pixel_accuracy = if pred_mask.is_empty() {
        0.0
    } else {
        agree as f64 / pred_mask.len() as f64
    };

    let mut metrics = MetricResult::new();
    metrics.insert_scalar("iou", 100.0 * intersection as f64 / (union as f64 + MASK_EPS));
    metrics.insert_scalar(
        "dice",
        100.0 * 2.0 * intersection as f64 / (pred_sum as f64 + gt_sum as f64 + MASK_EPS),
    );
    metrics.insert_scalar("pixel_accuracy", 100.0 * pixel_accuracy);
    Ok(metrics)
}

// (intersection, union, |pred|, |gt|)
fn mask_counts(
    pred_mask: &[bool],
    gt_mask: &[bool],
) -> Result<(usize, usize, usize, usize), MetricsError> {
    check_lengths(pred_mask.len(), gt_mask.len())?;
    Ok(pred_mask.iter().zip(gt_mask.iter()).fold(
        (0, 0, 0, 0),
        |(i, u, ps, gs), (&p, &g)| {
            (
                i + (p && g) as usize,
                u + (p || g) as usize,
                ps + p as usize,
                gs + g as usize,
            )
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    #[should_panic]
    fn test_class_counts_index_out_of_range() {
        let counts = ClassCounts::new(&[0, 1], &[1, 1], 2).unwrap();
        assert_eq!(counts.num_classes(), 2);
        counts.dice(2);
    }

    #[test]
    fn test_perfect_prediction() -> Result<(), MetricsError> {
        let labels = vec![2; 10];
        let metrics = segmentation_metrics(&labels, &labels, 4)?;
        assert_eq!(metrics.scalar("accuracy"), Some(1.0));
        assert_eq!(metrics.scalar("mean_iou"), Some(1.0));
        assert_eq!(metrics.vector("per_class_iou"), Some(&[1.0][..]));

        let dice = metrics.vector("per_class_dice").unwrap();
        assert_eq!(dice.len(), 4);
        assert_relative_eq!(dice[2], 1.0, epsilon = 1e-8);
        assert_eq!(dice[0], 0.0);
        Ok(())
    }

    #[test]
    fn test_disjoint_prediction() -> Result<(), MetricsError> {
        let pred = vec![1; 8];
        let gt = vec![0; 8];
        let metrics = segmentation_metrics(&pred, &gt, 2)?;
        assert_eq!(metrics.scalar("accuracy"), Some(0.0));
        assert_eq!(metrics.scalar("mean_iou"), Some(0.0));
        assert_eq!(metrics.vector("per_class_iou"), Some(&[0.0, 0.0][..]));
        assert_eq!(metrics.scalar("mean_dice"), Some(0.0));
        Ok(())
    }

    #[test]
    fn test_partial_overlap() -> Result<(), MetricsError> {
        let pred = [0, 0, 1, 1, 1, 2];
        let gt = [0, 1, 1, 1, 2, 2];
        let counts = ClassCounts::new(&pred, &gt, 3)?;
        assert_eq!(counts.intersection, vec![1, 2, 1]);
        assert_eq!(counts.predicted, vec![2, 3, 1]);
        assert_eq!(counts.actual, vec![1, 3, 2]);

        // class 0: 1/2, class 1: 2/4, class 2: 1/2
        let metrics = segmentation_metrics(&pred, &gt, 3)?;
        assert_relative_eq!(metrics.scalar("mean_iou").unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(metrics.scalar("accuracy").unwrap(), 4.0 / 6.0, epsilon = 1e-12);
        let dice = metrics.vector("per_class_dice").unwrap();
        assert_relative_eq!(dice[0], 2.0 / 3.0, epsilon = 1e-8);
        assert_relative_eq!(dice[1], 4.0 / 6.0, epsilon = 1e-8);
        Ok(())
    }

    #[test]
    fn test_absent_class_excluded_from_iou() -> Result<(), MetricsError> {
        let pred = [0, 0, 1];
        let gt = [0, 0, 1];
        let metrics = segmentation_metrics(&pred, &gt, 5)?;
        assert_eq!(metrics.vector("per_class_iou").map(|v| v.len()), Some(2));
        assert_eq!(metrics.scalar("mean_iou"), Some(1.0));
        // dice keeps all classes, absent ones score 0
        assert_relative_eq!(metrics.scalar("mean_dice").unwrap(), 2.0 / 5.0, epsilon = 1e-8);
        Ok(())
    }

    #[test]
    fn test_empty_input() -> Result<(), MetricsError> {
        let metrics = segmentation_metrics(&[], &[], 3)?;
        assert_eq!(metrics.scalar("mean_iou"), Some(0.0));
        assert_eq!(metrics.scalar("accuracy"), Some(0.0));
        assert_eq!(metrics.scalar("mean_dice"), Some(0.0));
        Ok(())
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            segmentation_metrics(&[0, 1], &[0], 2),
            Err(MetricsError::LengthMismatch { pred: 2, target: 1 })
        ));
    }

    #[test]
    fn test_mask_metrics() -> Result<(), MetricsError> {
        let pred = [true, true, false, false];
        let gt = [true, false, true, false];
        assert_relative_eq!(compute_iou(&pred, &gt)?, 1.0 / 3.0, epsilon = 1e-8);
        assert_relative_eq!(compute_dice(&pred, &gt)?, 0.5, epsilon = 1e-8);

        let metrics = mask_metrics(&pred, &gt)?;
        assert_relative_eq!(metrics.scalar("iou").unwrap(), 100.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(metrics.scalar("dice").unwrap(), 50.0, epsilon = 1e-6);
        assert_relative_eq!(metrics.scalar("pixel_accuracy").unwrap(), 50.0, epsilon = 1e-12);

        let disjoint = compute_dice(&[true, false], &[false, true])?;
        assert_eq!(disjoint, 0.0);
        Ok(())
    }
}
