use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{ObscurationError, Result};
use crate::obscuration::batch::ObservationBatch;
use crate::utils::config::MAX_TIMESTAMPS;

/// Geodetic observer location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverLocation {
    /// Degrees, +N / -S
    pub latitude_deg: f64,
    /// Degrees, +E / -W
    pub longitude_deg: f64,
    /// Meters above the reference ellipsoid
    pub height_m: f64,
}

impl ObserverLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64, height_m: f64) -> Result<Self> {
        let location = ObserverLocation {
            latitude_deg,
            longitude_deg,
            height_m,
        };
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.latitude_deg.is_finite()
            && self.longitude_deg.is_finite()
            && self.height_m.is_finite())
        {
            return Err(ObscurationError::domain(format!(
                "observer location must be finite, got {self:?}"
            )));
        }
        if self.latitude_deg.abs() > 90.0 {
            return Err(ObscurationError::domain(format!(
                "latitude {} outside [-90, 90]",
                self.latitude_deg
            )));
        }
        Ok(())
    }
}

/// Observer-frame position of one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    /// Degrees from north through east
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
    /// Observer-to-body distance in km
    pub distance_km: f64,
}

/// Sun and Moon as seen by one observer at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EphemerisSample {
    pub sun: BodyPosition,
    pub moon: BodyPosition,
    /// Angular distance between the apparent centres, degrees
    pub separation_deg: f64,
}

/// Source of observer-centric Sun/Moon positions
///
/// Implementations must report angles in degrees and distances in km.
/// Errors are passed through to the caller untouched.
pub trait EphemerisProvider: Sync {
    /// Sample the Sun and Moon for one observer at one instant
    fn sample(
        &self,
        time: &DateTime<Utc>,
        location: &ObserverLocation,
    ) -> Result<EphemerisSample>;

    /// Sample every element of a batch, preserving order
    fn sample_batch(
        &self,
        batch: &ObservationBatch,
        parallel: bool,
    ) -> Result<Vec<EphemerisSample>> {
        if parallel && batch.len() > 1 {
            (0..batch.len())
                .into_par_iter()
                .map(|i| self.sample(&batch.times()[i], &batch.location(i)))
                .collect()
        } else {
            (0..batch.len())
                .map(|i| self.sample(&batch.times()[i], &batch.location(i)))
                .collect()
        }
    }
}

/// Generate timestamps from begin to end (inclusive) every `step_size` seconds
///
/// # Errors
/// Returns error if:
/// - begin > end
/// - step_size <= 0
/// - Expected timestamp count exceeds MAX_TIMESTAMPS
pub fn generate_timestamps(
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    step_size: i64,
) -> Result<Vec<DateTime<Utc>>> {
    if begin > end {
        return Err(ObscurationError::TimeRange(
            "begin must be before or equal to end".to_string(),
        ));
    }
    if step_size <= 0 {
        return Err(ObscurationError::TimeRange(
            "step_size must be positive".to_string(),
        ));
    }

    let time_range_secs = (end - begin).num_seconds();
    let expected_count = time_range_secs / step_size + 1;
    if expected_count > MAX_TIMESTAMPS {
        return Err(ObscurationError::TimeRange(format!(
            "Time range would generate approximately {expected_count} timestamps (max: {MAX_TIMESTAMPS}). Use a larger step_size."
        )));
    }

    let mut times = Vec::with_capacity(expected_count as usize);
    let mut current = begin;
    let step_duration = Duration::seconds(step_size);

    while current <= end {
        times.push(current);
        current += step_duration;
    }

    Ok(times)
}
