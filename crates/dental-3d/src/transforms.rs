use glam::{DMat3, DVec3};

/// Rotation matrix about the vertical (z) axis.
///
/// ```text
/// | cos -sin 0 |
/// | sin  cos 0 |
/// |  0    0  1 |
/// ```
pub fn rotation_z(angle: f64) -> [[f64; 3]; 3] {
    to_rows(DMat3::from_rotation_z(angle))
}

/// Rotate a set of points in place, `p' = R p`.
pub fn rotate_points(points: &mut [[f64; 3]], rotation: &[[f64; 3]; 3]) {
    let r = from_rows(rotation);
    for p in points.iter_mut() {
        *p = (r * DVec3::from_array(*p)).to_array();
    }
}

/// Rotate a direction vector, `v' = R v`.
pub fn rotate_vector(v: &[f64; 3], rotation: &[[f64; 3]; 3]) -> [f64; 3] {
    (from_rows(rotation) * DVec3::from_array(*v)).to_array()
}

// glam matrices are column-major
fn from_rows(m: &[[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols_array_2d(m).transpose()
}

fn to_rows(m: DMat3) -> [[f64; 3]; 3] {
    m.transpose().to_cols_array_2d()
}
