use glam::DVec3;

use crate::Dental3dError;

/// Small constant added to norms before dividing by them.
pub const NORM_EPS: f64 = 1e-8;

/// Utility function to compute the Euclidean distance between two points.
///
/// # Arguments
///
/// * `a` - A point in 3D space.
/// * `b` - Another point in 3D space.
///
/// # Returns
///
/// The Euclidean distance between the two points.
///
/// Example:
/// ```
/// use dental_3d::ops::euclidean_distance;
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 5.0, 6.0];
/// let dst = euclidean_distance(&a, &b);
/// ```
pub fn euclidean_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    DVec3::from_array(*a).distance(DVec3::from_array(*b))
}

/// Euclidean norm of a 3D vector.
#[inline]
pub fn norm(v: &[f64; 3]) -> f64 {
    DVec3::from_array(*v).length()
}

/// Dot product of two 3D vectors.
#[inline]
pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    DVec3::from_array(*a).dot(DVec3::from_array(*b))
}

/// Scale a vector to unit length.
///
/// The norm is stabilized with [`NORM_EPS`], so the zero vector maps to the
/// zero vector instead of producing NaNs.
pub fn normalize_vector(v: &[f64; 3]) -> [f64; 3] {
    let v = DVec3::from_array(*v);
    (v / (v.length() + NORM_EPS)).to_array()
}

/// Compute the centroid (arithmetic mean) of a set of points.
///
/// # Arguments
///
/// * `points` - A non-empty set of points.
///
/// # Returns
///
/// The centroid, or an error if the set is empty.
pub fn centroid(points: &[[f64; 3]]) -> Result<[f64; 3], Dental3dError> {
    if points.is_empty() {
        return Err(Dental3dError::EmptyPointCloud);
    }
    let sum = points
        .iter()
        .fold(DVec3::ZERO, |acc, p| acc + DVec3::from_array(*p));
    Ok((sum / points.len() as f64).to_array())
}

/// Maximum Euclidean norm over a set of points, 0.0 for an empty set.
pub fn max_norm(points: &[[f64; 3]]) -> f64 {
    points.iter().map(norm).fold(0.0, f64::max)
}
