//! Geodetic helpers on the WGS-84 ellipsoid

use crate::utils::config::{EARTH_EQUATORIAL_RADIUS_KM, EARTH_FLATTENING};

/// Earth-fixed cartesian position (km) of a geodetic point
pub fn geodetic_to_ecef_km(lat_deg: f64, lon_deg: f64, height_m: f64) -> [f64; 3] {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let e2 = EARTH_FLATTENING * (2.0 - EARTH_FLATTENING);
    let (sin_lat, cos_lat) = lat.sin_cos();
    let n = EARTH_EQUATORIAL_RADIUS_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let h = height_m / 1000.0;

    [
        (n + h) * cos_lat * lon.cos(),
        (n + h) * cos_lat * lon.sin(),
        (n * (1.0 - e2) + h) * sin_lat,
    ]
}

/// Express an Earth-fixed vector in the local east/north/up frame of a geodetic point
pub fn ecef_to_enu(v: &[f64; 3], lat_deg: f64, lon_deg: f64) -> [f64; 3] {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();

    let east = -sin_lon * v[0] + cos_lon * v[1];
    let north = -sin_lat * cos_lon * v[0] - sin_lat * sin_lon * v[1] + cos_lat * v[2];
    let up = cos_lat * cos_lon * v[0] + cos_lat * sin_lon * v[1] + sin_lat * v[2];
    [east, north, up]
}

/// Azimuth (degrees from north through east) and altitude (degrees) of an ENU vector
pub fn enu_to_az_alt_deg(enu: &[f64; 3]) -> (f64, f64) {
    let horizontal = (enu[0] * enu[0] + enu[1] * enu[1]).sqrt();
    let alt = enu[2].atan2(horizontal).to_degrees();
    let az = enu[0].atan2(enu[1]).to_degrees().rem_euclid(360.0);
    (az, alt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_and_pole() {
        let eq = geodetic_to_ecef_km(0.0, 0.0, 0.0);
        assert!((eq[0] - EARTH_EQUATORIAL_RADIUS_KM).abs() < 1e-9);
        let pole = geodetic_to_ecef_km(90.0, 0.0, 0.0);
        // WGS-84 polar radius
        assert!((pole[2] - 6356.752_314).abs() < 1e-3);
    }

    #[test]
    fn test_height_adds_along_normal() {
        let base = geodetic_to_ecef_km(45.0, 10.0, 0.0);
        let raised = geodetic_to_ecef_km(45.0, 10.0, 1000.0);
        let up = ecef_to_enu(
            &[raised[0] - base[0], raised[1] - base[1], raised[2] - base[2]],
            45.0,
            10.0,
        );
        assert!((up[2] - 1.0).abs() < 1e-9);
        assert!(up[0].abs() < 1e-9 && up[1].abs() < 1e-9);
    }

    #[test]
    fn test_az_alt_conventions() {
        let (az, alt) = enu_to_az_alt_deg(&[0.0, 1.0, 0.0]);
        assert!(az.abs() < 1e-12 && alt.abs() < 1e-12);
        let (az, _) = enu_to_az_alt_deg(&[1.0, 0.0, 0.0]);
        assert!((az - 90.0).abs() < 1e-12);
        let (az, _) = enu_to_az_alt_deg(&[-1.0, 0.0, 0.0]);
        assert!((az - 270.0).abs() < 1e-12);
        let (_, alt) = enu_to_az_alt_deg(&[0.0, 0.0, 2.0]);
        assert!((alt - 90.0).abs() < 1e-12);
    }
}
