use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// A scalar, e.g. a mean IoU.
    Scalar(f64),
    /// A per-class breakdown.
    Vector(Vec<f64>),
    /// A matrix, e.g. a confusion matrix.
    Matrix(Vec<Vec<f64>>),
}

impl MetricValue {
    /// The value as a scalar, if it is one.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            MetricValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a vector, if it is one.
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            MetricValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a matrix, if it is one.
    pub fn as_matrix(&self) -> Option<&[Vec<f64>]> {
        match self {
            MetricValue::Matrix(m) => Some(m),
            _ => None,
        }
    }
}

/// A mapping from metric name to value, produced by one evaluation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricResult {
    values: BTreeMap<String, MetricValue>,
}

impl MetricResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: MetricValue) {
        self.values.insert(name.into(), value);
    }

    /// Insert a scalar value.
    pub fn insert_scalar(&mut self, name: impl Into<String>, value: f64) {
        self.insert(name, MetricValue::Scalar(value));
    }

    /// Insert a per-class vector.
    pub fn insert_vector(&mut self, name: impl Into<String>, value: Vec<f64>) {
        self.insert(name, MetricValue::Vector(value));
    }

    /// Insert a matrix.
    pub fn insert_matrix(&mut self, name: impl Into<String>, value: Vec<Vec<f64>>) {
        self.insert(name, MetricValue::Matrix(value));
    }

    /// Get a value by name.
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.values.get(name)
    }

    /// Get a scalar value by name.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(MetricValue::as_scalar)
    }

    /// Get a vector value by name.
    pub fn vector(&self, name: &str) -> Option<&[f64]> {
        self.get(name).and_then(MetricValue::as_vector)
    }

    /// Get a matrix value by name.
    pub fn matrix(&self, name: &str) -> Option<&[Vec<f64>]> {
        self.get(name).and_then(MetricValue::as_matrix)
    }

    /// Whether a metric with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of metrics.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the result holds no metric.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over the scalar metrics only.
    pub fn scalars(&self) -> impl Iterator<Item = (&str, f64)> {
        self.iter()
            .filter_map(|(k, v)| v.as_scalar().map(|s| (k, s)))
    }

    /// Serialize to a pretty-printed JSON object.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
