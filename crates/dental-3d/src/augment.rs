//! Random training-time augmentation of normalized point sets.
//!
//! Three independent coin flips decide, in this order, whether to rotate about
//! the vertical axis, scale uniformly and add Gaussian positional noise. Targets
//! living in the point frame receive the same rotation and scale as the points.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{axis::Axis, normalize::Normalization, transforms, Dental3dError};

/// Which augmentations to apply and with which parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentConfig {
    /// Randomly rotate about the z axis.
    pub rotate: bool,
    /// Randomly scale all coordinates.
    pub scale: bool,
    /// Randomly add Gaussian noise to every point coordinate.
    pub jitter: bool,
    /// Probability that each enabled augmentation fires.
    pub probability: f64,
    /// Range `[low, high]` of the uniform scale factor.
    pub scale_range: (f64, f64),
    /// Standard deviation of the positional noise.
    pub jitter_sigma: f64,
    /// Normalize the points again after augmenting.
    pub renormalize: bool,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            rotate: false,
            scale: false,
            jitter: false,
            probability: 0.5,
            scale_range: (0.9, 1.1),
            jitter_sigma: 0.01,
            renormalize: false,
        }
    }
}

impl AugmentConfig {
    /// Rotation, scale jitter and positional jitter, followed by re-normalization.
    pub fn segmentation() -> Self {
        Self {
            rotate: true,
            scale: true,
            jitter: true,
            renormalize: true,
            ..Default::default()
        }
    }

    /// Rotation only.
    pub fn landmarks() -> Self {
        Self {
            rotate: true,
            ..Default::default()
        }
    }

    /// Rotation only, moving the origin as a point and the direction as a vector.
    pub fn axis() -> Self {
        Self {
            rotate: true,
            ..Default::default()
        }
    }

    /// No augmentation.
    pub fn none() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), Dental3dError> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(Dental3dError::InvalidAugmentParameter(format!(
                "probability {} not in [0, 1]",
                self.probability
            )));
        }
        let (low, high) = self.scale_range;
        if !(low.is_finite() && high.is_finite() && low > 0.0 && low <= high) {
            return Err(Dental3dError::InvalidAugmentParameter(format!(
                "scale range ({low}, {high})"
            )));
        }
        if !(self.jitter_sigma.is_finite() && self.jitter_sigma >= 0.0) {
            return Err(Dental3dError::InvalidAugmentParameter(format!(
                "jitter sigma {}",
                self.jitter_sigma
            )));
        }
        Ok(())
    }
}

/// Targets transformed together with the points.
#[derive(Debug)]
pub enum Targets<'a> {
    /// Per-point labels or no target: nothing to move.
    None,
    /// Landmark coordinates in the point frame.
    Landmarks(&'a mut [[f64; 3]]),
    /// A tooth axis in the point frame.
    Axis(&'a mut Axis),
}

/// What an [`augment`] call actually did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AugmentRecord {
    /// Rotation angle about z in radians, if a rotation was applied.
    pub rotation: Option<f64>,
    /// Scale factor, if scaling was applied.
    pub scale: Option<f64>,
    /// Whether positional noise was added.
    pub jitter: bool,
    /// The re-normalization applied at the end, if any.
    pub renormalization: Option<Normalization>,
}

/// Augment a normalized point set in place.
///
/// # Arguments
///
/// * `points` - The normalized points.
/// * `targets` - Targets in the same frame, moved with the points.
/// * `config` - The augmentation configuration.
/// * `rng` - The random source.
///
/// # Returns
///
/// A record of the augmentations that were applied.
pub fn augment<R: Rng + ?Sized>(
    points: &mut [[f64; 3]],
    mut targets: Targets<'_>,
    config: &AugmentConfig,
    rng: &mut R,
) -> Result<AugmentRecord, Dental3dError> {
    config.validate()?;
    let mut record = AugmentRecord::default();

    if config.rotate && rng.random_bool(config.probability) {
        let theta = rng.random_range(0.0..std::f64::consts::TAU);
        let rotation = transforms::rotation_z(theta);
        transforms::rotate_points(points, &rotation);
        match &mut targets {
            Targets::None => {}
            Targets::Landmarks(landmarks) => transforms::rotate_points(landmarks, &rotation),
            Targets::Axis(axis) => {
                axis.origin = transforms::rotate_vector(&axis.origin, &rotation);
                axis.direction = transforms::rotate_vector(&axis.direction, &rotation);
            }
        }
        record.rotation = Some(theta);
    }

    if config.scale && rng.random_bool(config.probability) {
        let (low, high) = config.scale_range;
        let s = rng.random_range(low..=high);
        scale_in_place(points, s);
        match &mut targets {
            Targets::None => {}
            Targets::Landmarks(landmarks) => scale_in_place(landmarks, s),
            Targets::Axis(axis) => {
                axis.origin = axis.origin.map(|v| v * s);
            }
        }
        record.scale = Some(s);
    }

    if config.jitter && rng.random_bool(config.probability) {
        let noise = Normal::new(0.0, config.jitter_sigma)
            .map_err(|e| Dental3dError::InvalidAugmentParameter(e.to_string()))?;
        for p in points.iter_mut() {
            for v in p.iter_mut() {
                *v += noise.sample(rng);
            }
        }
        record.jitter = true;
    }

    if config.renormalize && !points.is_empty() {
        let normalization = Normalization::fit(points)?;
        for p in points.iter_mut() {
            *p = normalization.apply_point(p);
        }
        match &mut targets {
            Targets::None => {}
            Targets::Landmarks(landmarks) => {
                for l in landmarks.iter_mut() {
                    *l = normalization.apply_point(l);
                }
            }
            Targets::Axis(axis) => axis.origin = normalization.apply_point(&axis.origin),
        }
        record.renormalization = Some(normalization);
    }

    log::trace!("augmentation applied: {record:?}");

    Ok(record)
}

fn scale_in_place(points: &mut [[f64; 3]], s: f64) {
    for p in points.iter_mut() {
        *p = p.map(|v| v * s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn always(config: AugmentConfig) -> AugmentConfig {
        AugmentConfig {
            probability: 1.0,
            ..config
        }
    }

    #[test]
    fn test_none_is_identity() -> Result<(), Dental3dError> {
        let mut rng = StdRng::seed_from_u64(1);
        let mut points = vec![[0.5, -0.2, 0.1], [0.0, 1.0, 0.0]];
        let original = points.clone();
        let record = augment(&mut points, Targets::None, &AugmentConfig::none(), &mut rng)?;
        assert_eq!(points, original);
        assert_eq!(record, AugmentRecord::default());
        Ok(())
    }

    #[test]
    fn test_rotation_preserves_point_landmark_geometry() -> Result<(), Dental3dError> {
        let mut rng = StdRng::seed_from_u64(3);
        let mut points = vec![[0.5, 0.0, 0.2], [-0.5, 0.3, -0.1], [0.0, -0.7, 0.4]];
        let mut landmarks = vec![[0.1, 0.1, 0.1]];
        let before = ops::euclidean_distance(&points[0], &landmarks[0]);
        let z_before = points.iter().map(|p| p[2]).collect::<Vec<_>>();

        let record = augment(
            &mut points,
            Targets::Landmarks(&mut landmarks),
            &always(AugmentConfig::landmarks()),
            &mut rng,
        )?;

        let theta = record.rotation.expect("rotation applied");
        assert!((0.0..std::f64::consts::TAU).contains(&theta));
        assert_eq!(record.scale, None);
        assert_relative_eq!(
            ops::euclidean_distance(&points[0], &landmarks[0]),
            before,
            epsilon = 1e-12
        );
        // rotation about z keeps the vertical coordinate
        for (p, z) in points.iter().zip(z_before) {
            assert_relative_eq!(p[2], z, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_axis_rotates_origin_and_direction() -> Result<(), Dental3dError> {
        let mut rng = StdRng::seed_from_u64(5);
        let mut points = vec![[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]];
        let mut axis = Axis::new([1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);

        let record = augment(
            &mut points,
            Targets::Axis(&mut axis),
            &always(AugmentConfig::axis()),
            &mut rng,
        )?;
        let theta = record.rotation.expect("rotation applied");

        assert_relative_eq!(axis.origin[0], theta.cos(), epsilon = 1e-12);
        assert_relative_eq!(axis.origin[1], theta.sin(), epsilon = 1e-12);
        assert_relative_eq!(ops::norm(&axis.direction), 1.0, epsilon = 1e-6);
        // origin coincided with the first point and still does
        assert_relative_eq!(
            ops::euclidean_distance(&axis.origin, &points[0]),
            0.0,
            epsilon = 1e-12
        );
        Ok(())
    }

    #[test]
    fn test_segmentation_preset_renormalizes() -> Result<(), Dental3dError> {
        let mut rng = StdRng::seed_from_u64(11);
        let mut points = (0..64)
            .map(|i| {
                let t = i as f64 * 0.1;
                [t.cos(), t.sin(), (i % 5) as f64 * 0.1]
            })
            .collect::<Vec<_>>();

        let record = augment(
            &mut points,
            Targets::None,
            &always(AugmentConfig::segmentation()),
            &mut rng,
        )?;
        assert!(record.rotation.is_some());
        let s = record.scale.expect("scale applied");
        assert!((0.9..=1.1).contains(&s));
        assert!(record.jitter);
        assert!(record.renormalization.is_some());
        assert!(ops::max_norm(&points) <= 1.0 + 1e-8);
        Ok(())
    }

    #[test]
    fn test_seeded_is_reproducible() -> Result<(), Dental3dError> {
        let base = vec![[0.3, 0.2, 0.1], [-0.4, 0.5, -0.6]];
        let mut a = base.clone();
        let mut b = base.clone();
        let config = AugmentConfig::segmentation();
        let ra = augment(&mut a, Targets::None, &config, &mut StdRng::seed_from_u64(9))?;
        let rb = augment(&mut b, Targets::None, &config, &mut StdRng::seed_from_u64(9))?;
        assert_eq!(a, b);
        assert_eq!(ra, rb);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = AugmentConfig {
            probability: 2.0,
            ..AugmentConfig::segmentation()
        };
        let res = augment(&mut [[0.0; 3]], Targets::None, &config, &mut rng);
        assert!(matches!(
            res,
            Err(Dental3dError::InvalidAugmentParameter(_))
        ));
    }

    #[test]
    fn test_non_finite_parameters_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        for scale_range in [(0.9, f64::INFINITY), (f64::INFINITY, f64::INFINITY), (f64::NAN, 1.1)] {
            let config = AugmentConfig {
                scale: true,
                probability: 1.0,
                scale_range,
                ..Default::default()
            };
            let res = augment(&mut [[0.1, 0.2, 0.3]], Targets::None, &config, &mut rng);
            assert!(matches!(
                res,
                Err(Dental3dError::InvalidAugmentParameter(_))
            ));
        }

        // rejected even when the jitter step would not fire
        for jitter_sigma in [-0.01, f64::NAN, f64::INFINITY] {
            let config = AugmentConfig {
                jitter: true,
                probability: 0.0,
                jitter_sigma,
                ..Default::default()
            };
            let res = augment(&mut [[0.1, 0.2, 0.3]], Targets::None, &config, &mut rng);
            assert!(matches!(
                res,
                Err(Dental3dError::InvalidAugmentParameter(_))
            ));
        }
    }

    #[test]
    fn test_preset_steps_fire_about_half_the_time() -> Result<(), Dental3dError> {
        let mut rng = StdRng::seed_from_u64(2024);
        let config = AugmentConfig {
            renormalize: false,
            ..AugmentConfig::segmentation()
        };
        let draws = 4000;
        let (mut rotations, mut scales, mut jitters, mut all_three) = (0, 0, 0, 0);
        for _ in 0..draws {
            let mut points = vec![[0.3, -0.2, 0.1], [-0.3, 0.2, -0.1]];
            let record = augment(&mut points, Targets::None, &config, &mut rng)?;
            rotations += record.rotation.is_some() as usize;
            scales += record.scale.is_some() as usize;
            jitters += record.jitter as usize;
            all_three +=
                (record.rotation.is_some() && record.scale.is_some() && record.jitter) as usize;
        }
        // binomial(4000, 0.5) has a standard deviation of about 32
        for count in [rotations, scales, jitters] {
            assert!((1800..=2200).contains(&count), "fired {count} of {draws}");
        }
        // independent coins: all three fire about an eighth of the time
        assert!((380..=620).contains(&all_three), "all fired {all_three} of {draws}");
        Ok(())
    }
}
