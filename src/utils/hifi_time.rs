//! hifitime interop for chrono timestamps
//!
//! Only the conversions needed to move an observation time onto the
//! Terrestrial Time scale used by the analytic Sun and Moon theories.

use chrono::{DateTime, Utc};
use hifitime::{Duration, Epoch};

use crate::utils::config::TT_TAI_SECONDS;

const MJD_TO_JD: f64 = 2_400_000.5;

/// Convert chrono `DateTime<Utc>` to hifitime `Epoch`
#[inline]
pub fn chrono_to_epoch(dt: &DateTime<Utc>) -> Epoch {
    let nanos = (dt.timestamp() as i128) * 1_000_000_000 + (dt.timestamp_subsec_nanos() as i128);
    Epoch::from_unix_duration(Duration::from_total_nanoseconds(nanos))
}

/// TAI-UTC in seconds, `None` before 1960
#[inline]
pub fn get_tai_utc_offset(dt: &DateTime<Utc>) -> Option<f64> {
    chrono_to_epoch(dt).leap_seconds(true)
}

/// TT-UTC in seconds (TT-TAI + TAI-UTC)
#[inline]
pub fn get_tt_utc_offset_seconds(dt: &DateTime<Utc>) -> f64 {
    get_tai_utc_offset(dt).map_or(69.184, |tai_utc| TT_TAI_SECONDS + tai_utc)
}

/// Julian Date on the UTC scale
#[inline]
pub fn datetime_to_jd_utc(dt: &DateTime<Utc>) -> f64 {
    MJD_TO_JD + chrono_to_epoch(dt).to_mjd_utc_days()
}

/// Julian Ephemeris Date (TT)
#[inline]
pub fn datetime_to_jde(dt: &DateTime<Utc>) -> f64 {
    datetime_to_jd_utc(dt) + get_tt_utc_offset_seconds(dt) / 86_400.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_j2000_utc_julian_date() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((datetime_to_jd_utc(&dt) - 2_451_545.0).abs() < 1e-8);
    }

    #[test]
    fn test_tt_offset_after_2017() {
        let dt = Utc.with_ymd_and_hms(2023, 10, 14, 16, 0, 0).unwrap();
        let offset = get_tt_utc_offset_seconds(&dt);
        assert!((offset - 69.184).abs() < 1e-6, "TT-UTC = {offset}");

        let jde = datetime_to_jde(&dt);
        let jd = datetime_to_jd_utc(&dt);
        assert!(((jde - jd) * 86_400.0 - 69.184).abs() < 1e-3);
    }
}
