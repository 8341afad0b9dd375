use crate::ops;

/// An undirected tooth axis: a point on the axis and its direction.
///
/// The direction is stored with unit length. Its sign carries no meaning, so
/// comparisons between axes must be sign-invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    /// A point on the axis.
    pub origin: [f64; 3],
    /// The unit direction of the axis.
    pub direction: [f64; 3],
}

impl Axis {
    /// Create an axis, scaling `direction` to unit length.
    ///
    /// A zero direction stays the zero vector.
    pub fn new(origin: [f64; 3], direction: [f64; 3]) -> Self {
        Self {
            origin,
            direction: ops::normalize_vector(&direction),
        }
    }
}
