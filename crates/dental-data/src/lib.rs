#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// JSON annotation files.
pub mod annotation;

/// Dataset configuration.
pub mod config;

/// Sample discovery and construction.
pub mod dataset;

mod error;
pub use error::DataError;

/// Aggregation of per-sample metrics.
pub mod evaluator;

/// Training samples.
pub mod sample;

/// Per-task loss and metric capability.
pub mod task;
