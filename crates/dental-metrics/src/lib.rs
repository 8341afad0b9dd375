#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Available Metrics
//!
//! - **Axis**: angular loss, angle error in degrees and origin error between
//!   predicted and ground-truth tooth axes. Direction comparisons are
//!   sign-invariant.
//! - **Segmentation**: per-class IoU and Dice, their means and point accuracy.
//! - **Landmark**: mean radial error, its standard deviation and the
//!   percentage of correct keypoints (PCK) at distance thresholds.
//! - **Classification**: accuracy, weighted precision/recall/F1, per-class
//!   scores, confusion matrix and one-vs-rest ROC AUC.
//!
//! Every metric function returns a fresh [`MetricResult`].

/// Tooth axis losses and metrics.
pub mod axis;

/// Classification metrics.
pub mod classification;

mod error;
pub use error::MetricsError;

/// Landmark detection metrics.
pub mod landmark;

mod result;
pub use result::{MetricResult, MetricValue};

/// Segmentation metrics.
pub mod segmentation;
