use crate::{error::check_lengths, MetricResult, MetricsError};

/// A confusion matrix over the sorted set of labels seen in targets and predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    /// The labels indexing rows and columns, ascending.
    pub labels: Vec<usize>,
    /// `counts[i][j]`: samples with ground truth `labels[i]` predicted as `labels[j]`.
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Build the confusion matrix of a prediction.
    pub fn new(predictions: &[usize], targets: &[usize]) -> Result<Self, MetricsError> {
        check_lengths(predictions.len(), targets.len())?;

        let mut labels = targets
            .iter()
            .chain(predictions.iter())
            .copied()
            .collect::<Vec<_>>();
        labels.sort_unstable();
        labels.dedup();

        let mut counts = vec![vec![0; labels.len()]; labels.len()];
        for (p, t) in predictions.iter().zip(targets.iter()) {
            // both labels are in the sorted set by construction
            if let (Ok(i), Ok(j)) = (labels.binary_search(t), labels.binary_search(p)) {
                counts[i][j] += 1;
            }
        }

        Ok(Self { labels, counts })
    }

    /// Number of samples with ground truth `labels[i]`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= labels.len()`. The same holds for [`Self::predicted`],
    /// [`Self::precision`], [`Self::recall`] and [`Self::f1`].
    pub fn support(&self, i: usize) -> usize {
        self.counts[i].iter().sum()
    }

    /// Number of samples predicted as `labels[j]`.
    pub fn predicted(&self, j: usize) -> usize {
        self.counts.iter().map(|row| row[j]).sum()
    }

    /// Precision of `labels[i]`, 0.0 when nothing was predicted as it.
    pub fn precision(&self, i: usize) -> f64 {
        safe_div(self.counts[i][i], self.predicted(i))
    }

    /// Recall of `labels[i]`, 0.0 when the label has no support.
    pub fn recall(&self, i: usize) -> f64 {
        safe_div(self.counts[i][i], self.support(i))
    }

    /// F1 score of `labels[i]`.
    pub fn f1(&self, i: usize) -> f64 {
        let (p, r) = (self.precision(i), self.recall(i));
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn safe_div(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Area under the ROC curve of a binary problem.
///
/// Computed from the Mann-Whitney U statistic with average ranks for tied
/// scores. Returns `None` if there are no positives or no negatives.
pub fn binary_roc_auc(positives: &[bool], scores: &[f64]) -> Option<f64> {
    if positives.len() != scores.len() {
        return None;
    }
    let n_pos = positives.iter().filter(|&&p| p).count();
    let n_neg = positives.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order = (0..scores.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // ranks are 1-based; ties share the mean rank of their block
        let avg_rank = (start + 1 + end) as f64 / 2.0;
        rank_sum += avg_rank * order[start..end].iter().filter(|&&i| positives[i]).count() as f64;
        start = end;
    }

    let u = rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}

/// One-vs-rest ROC AUC averaged with class-prevalence weights.
///
/// Column `c` of `probabilities` holds the score of class `c`. Every target
/// must be in `0..num_classes`, every class must occur in `targets`, and
/// there must be at least two classes.
pub fn weighted_ovr_auc(
    targets: &[usize],
    probabilities: &[Vec<f64>],
    num_classes: usize,
) -> Result<f64, MetricsError> {
    let undefined = |reason: String| MetricsError::AucUndefined(reason);

    if probabilities.len() != targets.len() {
        return Err(undefined(format!(
            "{} probability rows for {} targets",
            probabilities.len(),
            targets.len()
        )));
    }
    if let Some(row) = probabilities.iter().find(|row| row.len() != num_classes) {
        return Err(undefined(format!(
            "probability row of width {} for {} classes",
            row.len(),
            num_classes
        )));
    }
    if num_classes < 2 {
        return Err(undefined("at least two classes are required".to_string()));
    }
    if let Some(&t) = targets.iter().find(|&&t| t >= num_classes) {
        return Err(undefined(format!(
            "target {t} has no probability column among {num_classes} classes"
        )));
    }

    let mut total = 0.0;
    for c in 0..num_classes {
        let positives = targets.iter().map(|&t| t == c).collect::<Vec<_>>();
        let scores = probabilities.iter().map(|row| row[c]).collect::<Vec<_>>();
        let auc = binary_roc_auc(&positives, &scores)
            .ok_or_else(|| undefined(format!("class {c} has no positive or no negative sample")))?;
        let prevalence = positives.iter().filter(|&&p| p).count() as f64;
        total += auc * prevalence;
    }
    Ok(total / targets.len() as f64)
}

/// Compute the classification metrics of a prediction.
///
/// # Arguments
///
/// * `predictions` - Predicted labels.
/// * `targets` - Ground-truth labels.
/// * `probabilities` - Optional per-sample class probabilities, for the AUC.
/// * `num_classes` - Number of classes, required together with `probabilities`.
///
/// # Returns
///
/// A [`MetricResult`] with `accuracy`, `precision`, `recall`, `f1_score`
/// (weighted by support, in percent), `precision_per_class`,
/// `recall_per_class`, `f1_per_class`, `confusion_matrix` and, when it can be
/// computed, `auc`. An AUC that cannot be computed is left out of the result.
pub fn classification_metrics(
    predictions: &[usize],
    targets: &[usize],
    probabilities: Option<&[Vec<f64>]>,
    num_classes: Option<usize>,
) -> Result<MetricResult, MetricsError> {
    if targets.is_empty() {
        return Err(MetricsError::EmptyInput("classification metrics"));
    }
    let cm = ConfusionMatrix::new(predictions, targets)?;
    let n = targets.len() as f64;
    let k = cm.labels.len();

    let correct = (0..k).map(|i| cm.counts[i][i]).sum::<usize>();

    let precision = (0..k).map(|i| cm.precision(i)).collect::<Vec<_>>();
    let recall = (0..k).map(|i| cm.recall(i)).collect::<Vec<_>>();
    let f1 = (0..k).map(|i| cm.f1(i)).collect::<Vec<_>>();
    let weighted = |values: &[f64]| {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| v * cm.support(i) as f64)
            .sum::<f64>()
            / n
    };

    let mut metrics = MetricResult::new();
    metrics.insert_scalar("accuracy", 100.0 * correct as f64 / n);
    metrics.insert_scalar("precision", 100.0 * weighted(&precision));
    metrics.insert_scalar("recall", 100.0 * weighted(&recall));
    metrics.insert_scalar("f1_score", 100.0 * weighted(&f1));
    metrics.insert_vector("precision_per_class", precision);
    metrics.insert_vector("recall_per_class", recall);
    metrics.insert_vector("f1_per_class", f1);
    metrics.insert_matrix(
        "confusion_matrix",
        cm.counts
            .iter()
            .map(|row| row.iter().map(|&c| c as f64).collect())
            .collect(),
    );

    if let (Some(probabilities), Some(num_classes)) = (probabilities, num_classes) {
        match weighted_ovr_auc(targets, probabilities, num_classes) {
            Ok(auc) => metrics.insert_scalar("auc", auc),
            Err(e) => log::warn!("Could not calculate AUC: {e}"),
        }
    }

    Ok(metrics)
}
