//! Time utilities for astronomical calculations

use chrono::{DateTime, Utc};

use crate::utils::config::{DAYS_PER_JULIAN_CENTURY, J2000_JD};
use crate::utils::hifi_time;

/// Julian centuries of TT since J2000.0
#[inline]
pub fn julian_centuries_tt(dt: &DateTime<Utc>) -> f64 {
    julian_centuries(hifi_time::datetime_to_jde(dt))
}

#[inline]
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}

/// Reduce an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Greenwich mean sidereal time in degrees for a UT Julian Date
///
/// UTC stands in for UT1; the sub-second difference is negligible at the
/// precision of the analytic ephemeris.
pub fn greenwich_mean_sidereal_deg(jd_ut: f64) -> f64 {
    let t = julian_centuries(jd_ut);
    let theta = 280.460_618_37 + 360.985_647_366_29 * (jd_ut - J2000_JD) + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    normalize_degrees(theta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert!((normalize_degrees(-30.0) - 330.0).abs() < 1e-12);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_gmst_reference_epoch() {
        // 1987 April 10, 0h UT: 13h10m46.3668s
        let gmst = greenwich_mean_sidereal_deg(2_446_895.5);
        let expected = (13.0 + 10.0 / 60.0 + 46.3668 / 3600.0) * 15.0;
        assert!((gmst - expected).abs() < 1e-4, "GMST = {gmst}");
    }
}
