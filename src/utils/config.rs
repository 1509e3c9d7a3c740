//! Physical constants and runtime settings
//!
//! Constants are process-wide and immutable. Runtime settings default to the
//! values below and may be overridden through the environment (or a `.env`
//! file) once per process.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{ObscurationError, Result};

/// IAU 2015 nominal solar radius (km)
pub const SUN_RADIUS_KM: f64 = 695_700.0;
/// Mean lunar radius (km)
pub const MOON_RADIUS_KM: f64 = 1737.1;

/// WGS-84 equatorial radius (km)
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;
/// WGS-84 flattening
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257_223_563;

pub const AU_TO_KM: f64 = 149_597_870.7;
pub const TT_TAI_SECONDS: f64 = 32.184;

pub const J2000_JD: f64 = 2_451_545.0;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Upper bound on generated time series length
pub const MAX_TIMESTAMPS: i64 = 1_000_000;

pub const ENV_MIN_ELEVATION: &str = "SOLAR_OBSCURATION_MIN_ELEVATION_DEG";
pub const ENV_PARALLEL: &str = "SOLAR_OBSCURATION_PARALLEL";

/// Settings loaded once from the environment; invalid values fall back to defaults.
pub static DEFAULT_SETTINGS: Lazy<ObscurationSettings> = Lazy::new(|| {
    ObscurationSettings::from_env().unwrap_or_else(|e| {
        log::warn!("Ignoring obscuration settings from environment: {e}");
        ObscurationSettings::default()
    })
});

/// Runtime settings for obscuration evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObscurationSettings {
    /// Solar altitude (degrees) below which obscuration is reported as zero
    pub min_solar_elevation_deg: f64,
    /// Evaluate ephemeris samples across threads
    pub parallel: bool,
}

impl Default for ObscurationSettings {
    fn default() -> Self {
        ObscurationSettings {
            min_solar_elevation_deg: 0.0,
            parallel: true,
        }
    }
}

impl ObscurationSettings {
    /// Build settings from `SOLAR_OBSCURATION_*` variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = ObscurationSettings::default();

        if let Some(raw) = lookup(ENV_MIN_ELEVATION) {
            let value: f64 = raw.trim().parse().map_err(|_| {
                ObscurationError::domain(format!("{ENV_MIN_ELEVATION} is not a number: {raw:?}"))
            })?;
            if !value.is_finite() {
                return Err(ObscurationError::domain(format!(
                    "{ENV_MIN_ELEVATION} must be finite"
                )));
            }
            settings.min_solar_elevation_deg = value;
        }

        if let Some(raw) = lookup(ENV_PARALLEL) {
            settings.parallel = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ObscurationError::domain(format!(
                        "{ENV_PARALLEL} is not a boolean: {raw:?}"
                    )))
                }
            };
        }

        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let settings = ObscurationSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, ObscurationSettings::default());
        assert_eq!(settings.min_solar_elevation_deg, 0.0);
        assert!(settings.parallel);
    }

    #[test]
    fn test_environment_overrides() {
        let settings = ObscurationSettings::from_lookup(lookup_from(&[
            (ENV_MIN_ELEVATION, " -6.5 "),
            (ENV_PARALLEL, "off"),
        ]))
        .unwrap();
        assert_eq!(settings.min_solar_elevation_deg, -6.5);
        assert!(!settings.parallel);
    }

    #[test]
    fn test_environment_rejects_garbage() {
        let err = ObscurationSettings::from_lookup(lookup_from(&[(ENV_MIN_ELEVATION, "low")]))
            .unwrap_err();
        assert!(err.is_domain());

        let err = ObscurationSettings::from_lookup(lookup_from(&[(ENV_PARALLEL, "maybe")]))
            .unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_json_partial_fields_use_defaults() {
        let settings =
            ObscurationSettings::from_json(r#"{"min_solar_elevation_deg": 5.0}"#).unwrap();
        assert_eq!(settings.min_solar_elevation_deg, 5.0);
        assert!(settings.parallel);

        let json = settings.to_json().unwrap();
        let back = ObscurationSettings::from_json(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_json_invalid() {
        let err = ObscurationSettings::from_json("{not json").unwrap_err();
        assert!(matches!(err, ObscurationError::Config(_)));
    }
}
