use std::collections::BTreeMap;

use dental_metrics::MetricResult;

use crate::{task::Task, DataError};

/// Running mean of the scalar metrics of many samples.
///
/// Each key is averaged over the samples that reported it. Vector and matrix
/// metrics are not aggregated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricAccumulator {
    sums: BTreeMap<String, (f64, usize)>,
    num_samples: usize,
}

impl MetricAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the metrics of one sample.
    pub fn add(&mut self, metrics: &MetricResult) {
        for (name, value) in metrics.scalars() {
            let entry = self.sums.entry(name.to_owned()).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
        self.num_samples += 1;
    }

    /// Number of samples added.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// The mean of every scalar key.
    pub fn mean(&self) -> MetricResult {
        let mut result = MetricResult::new();
        for (name, (sum, count)) in &self.sums {
            result.insert_scalar(name.clone(), sum / *count as f64);
        }
        result
    }
}

/// Scores predictions of a [`Task`] one sample at a time.
pub struct Evaluator<'a, T: Task> {
    task: &'a T,
    accumulator: MetricAccumulator,
}

impl<'a, T: Task> Evaluator<'a, T> {
    /// Create an evaluator for `task`.
    pub fn new(task: &'a T) -> Self {
        Self {
            task,
            accumulator: MetricAccumulator::new(),
        }
    }

    /// Score one prediction and add it to the running means.
    ///
    /// # Returns
    ///
    /// The metrics of this sample, including its `loss`.
    pub fn update(
        &mut self,
        pred: &T::Prediction,
        target: &T::Target,
    ) -> Result<MetricResult, DataError> {
        let loss = self.task.loss(pred, target)?;
        let mut metrics = self.task.metrics(pred, target)?;
        metrics.insert_scalar("loss", loss);
        self.accumulator.add(&metrics);
        log::debug!(
            "{} sample {}: loss {loss:.6}",
            self.task.name(),
            self.accumulator.num_samples()
        );
        Ok(metrics)
    }

    /// Number of samples scored so far.
    pub fn num_samples(&self) -> usize {
        self.accumulator.num_samples()
    }

    /// The mean of every scalar metric over the scored samples.
    pub fn finish(&self) -> MetricResult {
        log::info!(
            "{} evaluation over {} samples",
            self.task.name(),
            self.accumulator.num_samples()
        );
        self.accumulator.mean()
    }
}
