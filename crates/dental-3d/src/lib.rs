#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Data augmentation for training samples.
pub mod augment;

/// Tooth axis representation.
pub mod axis;

mod error;
pub use error::Dental3dError;

/// I/O utilities for reading and writing mesh data.
pub mod io;

/// Centering and unit-sphere scaling of point sets.
pub mod normalize;

/// Basic geometric operations on 3D points.
pub mod ops;

/// Point cloud container.
pub mod pointcloud;

/// Fixed-size resampling of point sets.
pub mod sampling;

/// 3D transforms algorithms.
pub mod transforms;
