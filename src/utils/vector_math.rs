/// Vector math utilities for topocentric geometry
///
/// Helpers for spherical/cartesian conversion, normalization and the angular
/// separation between two directions.

/// Convert spherical angles (longitude-like, latitude-like) in degrees to a unit vector
pub fn spherical_to_unit_vector(lon_deg: f64, lat_deg: f64) -> [f64; 3] {
    let lon_rad = lon_deg.to_radians();
    let lat_rad = lat_deg.to_radians();
    let cos_lat = lat_rad.cos();
    [
        cos_lat * lon_rad.cos(),
        cos_lat * lon_rad.sin(),
        lat_rad.sin(),
    ]
}

/// Normalize a 3D vector to unit length
///
/// Returns [0, 0, 0] if the input magnitude is zero
pub fn normalize_vector(v: &[f64; 3]) -> [f64; 3] {
    let mag = vector_magnitude(v);
    if mag > 0.0 {
        [v[0] / mag, v[1] / mag, v[2] / mag]
    } else {
        [0.0, 0.0, 0.0]
    }
}

pub fn dot_product(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn vector_magnitude(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn scale_vector(v: &[f64; 3], k: f64) -> [f64; 3] {
    [v[0] * k, v[1] * k, v[2] * k]
}

pub fn subtract_vectors(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Rotate a vector about the x axis by `angle_rad`
pub fn rotate_x(v: &[f64; 3], angle_rad: f64) -> [f64; 3] {
    let (s, c) = angle_rad.sin_cos();
    [v[0], c * v[1] - s * v[2], s * v[1] + c * v[2]]
}

/// Rotate a vector about the z axis by `angle_rad`
pub fn rotate_z(v: &[f64; 3], angle_rad: f64) -> [f64; 3] {
    let (s, c) = angle_rad.sin_cos();
    [c * v[0] - s * v[1], s * v[0] + c * v[1], v[2]]
}

/// Angular separation in degrees between two direction vectors of any length
pub fn angular_separation_deg(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let a_unit = normalize_vector(a);
    let b_unit = normalize_vector(b);
    let cos_angle = dot_product(&a_unit, &b_unit);
    cos_angle.clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_vector_axes() {
        let x = spherical_to_unit_vector(0.0, 0.0);
        assert!((x[0] - 1.0).abs() < 1e-12);
        let z = spherical_to_unit_vector(123.0, 90.0);
        assert!((z[2] - 1.0).abs() < 1e-12);
        assert!((vector_magnitude(&spherical_to_unit_vector(47.0, -12.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_separation_is_scale_free() {
        let a = spherical_to_unit_vector(10.0, 0.0);
        let b = scale_vector(&spherical_to_unit_vector(40.0, 0.0), 384_400.0);
        assert!((angular_separation_deg(&a, &b) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_vectors_do_not_nan() {
        let a = [1.0, 1e-17, 0.0];
        assert_eq!(angular_separation_deg(&a, &a), 0.0);
        let opposite = scale_vector(&a, -2.0);
        assert!((angular_separation_deg(&a, &opposite) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotations() {
        let v = rotate_z(&[1.0, 0.0, 0.0], std::f64::consts::FRAC_PI_2);
        assert!(v[0].abs() < 1e-12 && (v[1] - 1.0).abs() < 1e-12);
        let w = rotate_x(&[0.0, 1.0, 0.0], std::f64::consts::FRAC_PI_2);
        assert!(w[1].abs() < 1e-12 && (w[2] - 1.0).abs() < 1e-12);
    }
}
