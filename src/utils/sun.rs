//! Low-precision solar position and nutation
//!
//! Mean elements with the equation of centre; accuracy is about 0.01 degree
//! in longitude, ample for apparent disk geometry.

use crate::utils::time_utils::normalize_degrees;

/// Geocentric ecliptic position of date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPosition {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub distance_km: f64,
}

/// Nutation in longitude and obliquity plus the true obliquity, all in degrees
#[derive(Debug, Clone, Copy)]
pub struct Nutation {
    pub delta_psi_deg: f64,
    pub delta_eps_deg: f64,
    pub true_obliquity_deg: f64,
}

const ABERRATION_DEG: f64 = 0.005_69;

/// Mean obliquity of the ecliptic in degrees for `t` Julian centuries of TT
pub fn mean_obliquity_deg(t: f64) -> f64 {
    let arcsec = 84_381.448 - 46.8150 * t - 0.000_59 * t * t + 0.001_813 * t * t * t;
    arcsec / 3600.0
}

/// Four-term nutation series
pub fn nutation(t: f64) -> Nutation {
    let omega = (125.044_52 - 1934.136_261 * t).to_radians();
    let l_sun = (280.4665 + 36_000.7698 * t).to_radians();
    let l_moon = (218.3165 + 481_267.8813 * t).to_radians();

    let delta_psi_arcsec = -17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin()
        - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let delta_eps_arcsec = 9.20 * omega.cos() + 0.57 * (2.0 * l_sun).cos()
        + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * omega).cos();

    let delta_eps_deg = delta_eps_arcsec / 3600.0;
    Nutation {
        delta_psi_deg: delta_psi_arcsec / 3600.0,
        delta_eps_deg,
        true_obliquity_deg: mean_obliquity_deg(t) + delta_eps_deg,
    }
}

/// Apparent geocentric position of the Sun (aberration and nutation applied)
pub fn solar_position(t: f64, nut: &Nutation) -> EclipticPosition {
    let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = 357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t;
    let e = 0.016_708_634 - 0.000_042_037 * t - 0.000_000_126_7 * t * t;
    let m_rad = m.to_radians();

    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m_rad.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m_rad).sin()
        + 0.000_289 * (3.0 * m_rad).sin();

    let true_longitude = l0 + c;
    let true_anomaly = (m + c).to_radians();
    let radius_au = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * true_anomaly.cos());

    EclipticPosition {
        longitude_deg: normalize_degrees(true_longitude - ABERRATION_DEG + nut.delta_psi_deg),
        latitude_deg: 0.0,
        distance_km: radius_au * crate::utils::config::AU_TO_KM,
    }
}
