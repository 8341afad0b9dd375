use glam::DVec3;

use crate::{
    ops::{self, NORM_EPS},
    Dental3dError,
};

/// A centering plus uniform scaling that maps a point set into the unit sphere.
///
/// The transform is fitted once on the scan points and then applied unchanged
/// to every target living in the same frame (landmarks, axis origins).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// The centroid subtracted from every point.
    pub centroid: [f64; 3],
    /// The divisor applied after centering: max centered norm plus [`NORM_EPS`].
    pub scale: f64,
}

impl Normalization {
    /// Fit the normalization on a set of points.
    ///
    /// # Arguments
    ///
    /// * `points` - A non-empty set of points.
    ///
    /// # Returns
    ///
    /// The fitted normalization. A single point (or coincident points) gives a
    /// scale of [`NORM_EPS`] and maps to the origin.
    ///
    /// Example:
    ///
    /// ```
    /// use dental_3d::normalize::Normalization;
    ///
    /// let points = vec![[1.0, 0.0, 0.0], [3.0, 0.0, 0.0]];
    /// let normalization = Normalization::fit(&points).unwrap();
    /// assert_eq!(normalization.centroid, [2.0, 0.0, 0.0]);
    /// ```
    pub fn fit(points: &[[f64; 3]]) -> Result<Self, Dental3dError> {
        let centroid = ops::centroid(points)?;
        let c = DVec3::from_array(centroid);
        let max_dist = points
            .iter()
            .map(|p| (DVec3::from_array(*p) - c).length())
            .fold(0.0, f64::max);

        Ok(Self {
            centroid,
            scale: max_dist + NORM_EPS,
        })
    }

    /// Transform a single point.
    #[inline]
    pub fn apply_point(&self, point: &[f64; 3]) -> [f64; 3] {
        ((DVec3::from_array(*point) - DVec3::from_array(self.centroid)) / self.scale).to_array()
    }

    /// Transform a set of points.
    pub fn apply(&self, points: &[[f64; 3]]) -> Vec<[f64; 3]> {
        points.iter().map(|p| self.apply_point(p)).collect()
    }

    /// Map a normalized point back into the original frame.
    #[inline]
    pub fn invert_point(&self, point: &[f64; 3]) -> [f64; 3] {
        (DVec3::from_array(*point) * self.scale + DVec3::from_array(self.centroid)).to_array()
    }

    /// Map a set of normalized points back into the original frame.
    pub fn invert(&self, points: &[[f64; 3]]) -> Vec<[f64; 3]> {
        points.iter().map(|p| self.invert_point(p)).collect()
    }
}

/// Center a point set on its centroid and scale it into the unit sphere.
///
/// # Arguments
///
/// * `points` - A non-empty set of points.
///
/// # Returns
///
/// The normalized points and the [`Normalization`] that produced them.
pub fn normalize_points(
    points: &[[f64; 3]],
) -> Result<(Vec<[f64; 3]>, Normalization), Dental3dError> {
    let normalization = Normalization::fit(points)?;
    Ok((normalization.apply(points), normalization))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_points_unit_sphere() -> Result<(), Dental3dError> {
        let points = vec![
            [10.0, 2.0, -3.0],
            [12.0, 5.0, -1.0],
            [9.0, 1.0, 4.0],
            [11.5, 3.5, 0.5],
        ];
        let (normalized, _) = normalize_points(&points)?;

        let c = ops::centroid(&normalized)?;
        for v in c {
            assert_relative_eq!(v, 0.0, epsilon = 1e-9);
        }
        let r = ops::max_norm(&normalized);
        assert!(r <= 1.0 + 1e-8);
        assert_relative_eq!(r, 1.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_single_point() -> Result<(), Dental3dError> {
        let (normalized, normalization) = normalize_points(&[[4.0, -2.0, 7.0]])?;
        assert_eq!(normalized, vec![[0.0, 0.0, 0.0]]);
        assert_eq!(normalization.centroid, [4.0, -2.0, 7.0]);
        assert!(normalization.scale > 0.0);
        Ok(())
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize_points(&[]), Err(Dental3dError::EmptyPointCloud));
    }

    #[test]
    fn test_targets_share_transform() -> Result<(), Dental3dError> {
        let points = vec![[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [2.0, 2.0, 0.0]];
        let landmark = [2.0, 1.0, 0.0];
        let (normalized, normalization) = normalize_points(&points)?;
        let landmark_n = normalization.apply_point(&landmark);

        // distances are preserved up to the common scale
        let before = ops::euclidean_distance(&points[0], &landmark);
        let after = ops::euclidean_distance(&normalized[0], &landmark_n);
        assert_relative_eq!(after * normalization.scale, before, epsilon = 1e-9);

        let back = normalization.invert_point(&landmark_n);
        for i in 0..3 {
            assert_relative_eq!(back[i], landmark[i], epsilon = 1e-9);
        }
        Ok(())
    }
}
