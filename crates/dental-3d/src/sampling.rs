use rand::Rng;

use crate::Dental3dError;

/// Draw the indices that resample a set of `num_points` to exactly `target` elements.
///
/// - `num_points > target`: `target` distinct indices, uniformly without replacement.
/// - `num_points < target`: `target` indices, uniformly with replacement.
/// - `num_points == target`: the identity sequence `0..num_points`.
///
/// The same index sequence must be used to gather every array paired with the
/// points (labels, normals) so the one-to-one correspondence is kept.
///
/// # Arguments
///
/// * `num_points` - The size of the source set.
/// * `target` - The number of indices to draw.
/// * `rng` - The random source.
///
/// Example:
///
/// ```
/// use dental_3d::sampling::sample_indices;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let indices = sample_indices(10, 4, &mut rng).unwrap();
/// assert_eq!(indices.len(), 4);
/// ```
pub fn sample_indices<R: Rng + ?Sized>(
    num_points: usize,
    target: usize,
    rng: &mut R,
) -> Result<Vec<usize>, Dental3dError> {
    if num_points == 0 {
        return Err(Dental3dError::EmptyPointCloud);
    }
    if target == 0 {
        return Err(Dental3dError::InvalidSampleSize(target));
    }

    let indices = match num_points.cmp(&target) {
        std::cmp::Ordering::Greater => rand::seq::index::sample(rng, num_points, target).into_vec(),
        std::cmp::Ordering::Less => (0..target)
            .map(|_| rng.random_range(0..num_points))
            .collect(),
        std::cmp::Ordering::Equal => (0..num_points).collect(),
    };

    Ok(indices)
}

/// Collect `values[i]` for every `i` in `indices`, in order.
pub fn gather<T: Clone>(values: &[T], indices: &[usize]) -> Result<Vec<T>, Dental3dError> {
    indices
        .iter()
        .map(|&index| {
            values
                .get(index)
                .cloned()
                .ok_or(Dental3dError::IndexOutOfBounds {
                    index,
                    len: values.len(),
                })
        })
        .collect()
}

/// Resample a point set and its per-point values with one shared index sequence.
///
/// # Returns
///
/// The resampled points, the resampled values and the indices used.
#[allow(clippy::type_complexity)]
pub fn sample_with_values<T: Clone, R: Rng + ?Sized>(
    points: &[[f64; 3]],
    values: &[T],
    target: usize,
    rng: &mut R,
) -> Result<(Vec<[f64; 3]>, Vec<T>, Vec<usize>), Dental3dError> {
    if points.len() != values.len() {
        return Err(Dental3dError::LengthMismatch {
            left: points.len(),
            right: values.len(),
        });
    }
    let indices = sample_indices(points.len(), target, rng)?;
    Ok((gather(points, &indices)?, gather(values, &indices)?, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn make_points(n: usize) -> Vec<[f64; 3]> {
        (0..n).map(|i| [i as f64, 2.0 * i as f64, -(i as f64)]).collect()
    }

    #[test]
    fn test_downsample_without_replacement() -> Result<(), Dental3dError> {
        let mut rng = StdRng::seed_from_u64(42);
        let indices = sample_indices(100, 30, &mut rng)?;
        assert_eq!(indices.len(), 30);
        let unique = indices.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), 30);
        assert!(indices.iter().all(|&i| i < 100));
        Ok(())
    }

    #[test]
    fn test_oversample_with_replacement() -> Result<(), Dental3dError> {
        let mut rng = StdRng::seed_from_u64(7);
        let points = make_points(5);
        let indices = sample_indices(points.len(), 64, &mut rng)?;
        assert_eq!(indices.len(), 64);

        let sampled = gather(&points, &indices)?;
        for p in &sampled {
            assert!(points.contains(p));
        }
        Ok(())
    }

    #[test]
    fn test_equal_size_is_identity() -> Result<(), Dental3dError> {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(sample_indices(4, 4, &mut rng)?, vec![0, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_invalid_sizes() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            sample_indices(0, 4, &mut rng),
            Err(Dental3dError::EmptyPointCloud)
        );
        assert_eq!(
            sample_indices(4, 0, &mut rng),
            Err(Dental3dError::InvalidSampleSize(0))
        );
    }

    #[test]
    fn test_label_correspondence() -> Result<(), Dental3dError> {
        let points = make_points(50);
        let labels = (0..50).map(|i| i % 7).collect::<Vec<usize>>();

        for target in [10, 50, 200] {
            let mut rng = StdRng::seed_from_u64(target as u64);
            let (p, l, indices) = sample_with_values(&points, &labels, target, &mut rng)?;
            assert_eq!(p.len(), target);
            assert_eq!(l.len(), target);
            for (i, &src) in indices.iter().enumerate() {
                assert_eq!(l[i], labels[src]);
                assert_eq!(p[i], points[src]);
            }
        }
        Ok(())
    }

    #[test]
    fn test_length_mismatch() {
        let mut rng = StdRng::seed_from_u64(0);
        let res = sample_with_values(&make_points(3), &[0usize, 1], 2, &mut rng);
        assert!(matches!(res, Err(Dental3dError::LengthMismatch { .. })));
    }
}
