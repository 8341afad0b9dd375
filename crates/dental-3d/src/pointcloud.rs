use crate::{normalize::Normalization, sampling, Dental3dError};

/// An ordered set of 3D points sampled from a scan surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    // The points in the point cloud.
    points: Vec<[f64; 3]>,
}

impl PointCloud {
    /// Create a new point cloud from points.
    pub fn new(points: Vec<[f64; 3]>) -> Self {
        Self { points }
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Consume the point cloud and return its points.
    pub fn into_points(self) -> Vec<[f64; 3]> {
        self.points
    }

    /// Get the axis-aligned bounds `(min, max)` of the point cloud.
    ///
    /// Returns `None` for an empty point cloud.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(mut lo, mut hi), p| {
            for i in 0..3 {
                lo[i] = lo[i].min(p[i]);
                hi[i] = hi[i].max(p[i]);
            }
            (lo, hi)
        }))
    }

    /// Build a new point cloud from the points at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Self, Dental3dError> {
        Ok(Self::new(sampling::gather(&self.points, indices)?))
    }

    /// Center the point cloud and scale it into the unit sphere.
    ///
    /// Returns the normalized cloud together with the transform that was
    /// applied, so that co-located targets can receive the same transform.
    pub fn normalized(&self) -> Result<(Self, Normalization), Dental3dError> {
        let normalization = Normalization::fit(&self.points)?;
        Ok((Self::new(normalization.apply(&self.points)), normalization))
    }
}

impl From<Vec<[f64; 3]>> for PointCloud {
    fn from(points: Vec<[f64; 3]>) -> Self {
        Self::new(points)
    }
}
