//! Contiguous eclipse windows over a time series

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ObscurationError, Result};

/// A run of samples with obscuration above a threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipseWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub peak_time: DateTime<Utc>,
    pub max_obscuration: f64,
}

impl EclipseWindow {
    pub fn duration_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// Group samples with obscuration strictly above `threshold` into windows
///
/// `times` must be in chronological order and aligned with `obscuration`.
pub fn find_eclipse_windows(
    times: &[DateTime<Utc>],
    obscuration: &[f64],
    threshold: f64,
) -> Result<Vec<EclipseWindow>> {
    if times.len() != obscuration.len() {
        return Err(ObscurationError::domain(format!(
            "{} timestamps but {} obscuration values",
            times.len(),
            obscuration.len()
        )));
    }

    let mut windows = Vec::new();
    // (start index, peak index)
    let mut current: Option<(usize, usize)> = None;

    for (i, &value) in obscuration.iter().enumerate() {
        if value > threshold {
            current = match current {
                Some((start, peak)) if obscuration[peak] >= value => Some((start, peak)),
                Some((start, _)) => Some((start, i)),
                None => Some((i, i)),
            };
        } else if let Some((start, peak)) = current.take() {
            windows.push(EclipseWindow {
                start: times[start],
                end: times[i - 1],
                peak_time: times[peak],
                max_obscuration: obscuration[peak],
            });
        }
    }

    if let Some((start, peak)) = current {
        windows.push(EclipseWindow {
            start: times[start],
            end: times[times.len() - 1],
            peak_time: times[peak],
            max_obscuration: obscuration[peak],
        });
    }

    Ok(windows)
}
