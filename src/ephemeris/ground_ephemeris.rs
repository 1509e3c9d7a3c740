//! Analytic Sun/Moon ephemeris for observers on or above the ground

use chrono::{DateTime, Utc};

use crate::ephemeris::ephemeris_common::{
    BodyPosition, EphemerisProvider, EphemerisSample, ObserverLocation,
};
use crate::errors::Result;
use crate::utils::geo::{ecef_to_enu, enu_to_az_alt_deg, geodetic_to_ecef_km};
use crate::utils::hifi_time::datetime_to_jd_utc;
use crate::utils::moon::lunar_position;
use crate::utils::sun::{nutation, solar_position, EclipticPosition};
use crate::utils::time_utils::{greenwich_mean_sidereal_deg, julian_centuries_tt};
use crate::utils::vector_math::{
    angular_separation_deg, rotate_x, rotate_z, scale_vector, spherical_to_unit_vector,
    subtract_vectors, vector_magnitude,
};

/// Built-in ephemeris: low-precision solar theory, truncated ELP-2000/82 Moon,
/// topocentric parallax on the WGS-84 ellipsoid. No refraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroundEphemeris;

impl GroundEphemeris {
    pub fn new() -> Self {
        GroundEphemeris
    }

    /// Rotate an ecliptic-of-date position into the Earth-fixed frame (km)
    fn earth_fixed(body: &EclipticPosition, obliquity_deg: f64, sidereal_deg: f64) -> [f64; 3] {
        let ecliptic = scale_vector(
            &spherical_to_unit_vector(body.longitude_deg, body.latitude_deg),
            body.distance_km,
        );
        let equatorial = rotate_x(&ecliptic, obliquity_deg.to_radians());
        rotate_z(&equatorial, -sidereal_deg.to_radians())
    }

    fn topocentric(
        geocentric: &[f64; 3],
        observer: &[f64; 3],
        location: &ObserverLocation,
    ) -> ([f64; 3], BodyPosition) {
        let rel = subtract_vectors(geocentric, observer);
        let enu = ecef_to_enu(&rel, location.latitude_deg, location.longitude_deg);
        let (azimuth_deg, altitude_deg) = enu_to_az_alt_deg(&enu);
        (
            rel,
            BodyPosition {
                azimuth_deg,
                altitude_deg,
                distance_km: vector_magnitude(&rel),
            },
        )
    }
}

impl EphemerisProvider for GroundEphemeris {
    fn sample(&self, time: &DateTime<Utc>, location: &ObserverLocation) -> Result<EphemerisSample> {
        location.validate()?;

        let t = julian_centuries_tt(time);
        let nut = nutation(t);
        let sidereal_deg = greenwich_mean_sidereal_deg(datetime_to_jd_utc(time))
            + nut.delta_psi_deg * nut.true_obliquity_deg.to_radians().cos();

        let obliquity_deg = nut.true_obliquity_deg;
        let sun_geo = Self::earth_fixed(&solar_position(t, &nut), obliquity_deg, sidereal_deg);
        let moon_geo = Self::earth_fixed(&lunar_position(t, &nut), obliquity_deg, sidereal_deg);

        let observer = geodetic_to_ecef_km(
            location.latitude_deg,
            location.longitude_deg,
            location.height_m,
        );
        let (sun_rel, sun) = Self::topocentric(&sun_geo, &observer, location);
        let (moon_rel, moon) = Self::topocentric(&moon_geo, &observer, location);

        Ok(EphemerisSample {
            sun,
            moon,
            separation_deg: angular_separation_deg(&sun_rel, &moon_rel),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::AU_TO_KM;
    use chrono::TimeZone;

    fn fremont() -> ObserverLocation {
        ObserverLocation::new(37.5426, -122.1111, 0.0).unwrap()
    }

    #[test]
    fn test_sun_below_horizon_before_dawn() {
        let t = Utc.with_ymd_and_hms(2023, 10, 14, 12, 0, 0).unwrap();
        let sample = GroundEphemeris.sample(&t, &fremont()).unwrap();
        assert!(sample.sun.altitude_deg < -10.0, "alt {}", sample.sun.altitude_deg);
    }

    #[test]
    fn test_morning_sun_in_the_east() {
        let t = Utc.with_ymd_and_hms(2023, 10, 14, 16, 15, 0).unwrap();
        let sample = GroundEphemeris.sample(&t, &fremont()).unwrap();
        assert!(
            (10.0..35.0).contains(&sample.sun.altitude_deg),
            "alt {}",
            sample.sun.altitude_deg
        );
        assert!(
            (90.0..150.0).contains(&sample.sun.azimuth_deg),
            "az {}",
            sample.sun.azimuth_deg
        );
        assert!((sample.sun.distance_km / AU_TO_KM - 0.996).abs() < 0.01);
    }

    #[test]
    fn test_topocentric_moon_is_closer_overhead() {
        // Observer parallax: moon distance is within one Earth radius of geocentric
        let t = Utc.with_ymd_and_hms(2023, 10, 14, 16, 15, 0).unwrap();
        let sample = GroundEphemeris.sample(&t, &fremont()).unwrap();
        assert!((350_000.0..410_000.0).contains(&sample.moon.distance_km));
        assert!(sample.separation_deg < 1.0, "sep {}", sample.separation_deg);
    }

    #[test]
    fn test_invalid_location_rejected() {
        let t = Utc.with_ymd_and_hms(2023, 10, 14, 16, 15, 0).unwrap();
        let bad = ObserverLocation {
            latitude_deg: 120.0,
            longitude_deg: 0.0,
            height_m: 0.0,
        };
        assert!(GroundEphemeris.sample(&t, &bad).unwrap_err().is_domain());
    }
}
