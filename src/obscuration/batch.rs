//! Conforming scalar and sequence inputs to one batch length

use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::ephemeris::ObserverLocation;
use crate::errors::{ObscurationError, Result};

/// A scalar for single-element batches, a sequence otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchValue {
    Scalar(f64),
    Series(Array1<f64>),
}

impl BatchValue {
    /// Collapse a length-1 array to a scalar
    pub fn from_array(values: Array1<f64>) -> Self {
        if values.len() == 1 {
            BatchValue::Scalar(values[0])
        } else {
            BatchValue::Series(values)
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            BatchValue::Scalar(v) => Some(*v),
            BatchValue::Series(_) => None,
        }
    }

    pub fn as_series(&self) -> Option<&Array1<f64>> {
        match self {
            BatchValue::Scalar(_) => None,
            BatchValue::Series(values) => Some(values),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BatchValue::Scalar(_) => 1,
            BatchValue::Series(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            BatchValue::Scalar(v) => vec![*v],
            BatchValue::Series(values) => values.to_vec(),
        }
    }
}

/// Equal-length time/latitude/longitude/height sequences
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationBatch {
    times: Vec<DateTime<Utc>>,
    latitude_deg: Array1<f64>,
    longitude_deg: Array1<f64>,
    height_m: Array1<f64>,
}

/// Stretch a length-1 field to `len`; any other mismatch is a domain error.
fn conform(field: &str, values: &[f64], len: usize) -> Result<Array1<f64>> {
    match values.len() {
        n if n == len => Ok(Array1::from(values.to_vec())),
        1 => Ok(Array1::from_elem(len, values[0])),
        n => Err(ObscurationError::domain(format!(
            "{field} has {n} elements; expected 1 or {len}"
        ))),
    }
}

impl ObservationBatch {
    /// Broadcast every field to the longest field's length
    pub fn broadcast(
        times: &[DateTime<Utc>],
        latitude_deg: &[f64],
        longitude_deg: &[f64],
        height_m: &[f64],
    ) -> Result<Self> {
        let lengths = [
            times.len(),
            latitude_deg.len(),
            longitude_deg.len(),
            height_m.len(),
        ];
        if lengths.contains(&0) {
            return Err(ObscurationError::domain(
                "observation batch fields must not be empty",
            ));
        }
        let len = lengths.into_iter().max().unwrap_or(0);

        let times = match times.len() {
            n if n == len => times.to_vec(),
            1 => vec![times[0]; len],
            n => {
                return Err(ObscurationError::domain(format!(
                    "time has {n} elements; expected 1 or {len}"
                )))
            }
        };

        let batch = ObservationBatch {
            times,
            latitude_deg: conform("latitude", latitude_deg, len)?,
            longitude_deg: conform("longitude", longitude_deg, len)?,
            height_m: conform("height", height_m, len)?,
        };
        for i in 0..batch.len() {
            batch.location(i).validate()?;
        }
        Ok(batch)
    }

    /// One fixed observer for every timestamp
    pub fn at_location(times: &[DateTime<Utc>], location: &ObserverLocation) -> Result<Self> {
        Self::broadcast(
            times,
            &[location.latitude_deg],
            &[location.longitude_deg],
            &[location.height_m],
        )
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn latitudes(&self) -> &Array1<f64> {
        &self.latitude_deg
    }

    pub fn longitudes(&self) -> &Array1<f64> {
        &self.longitude_deg
    }

    pub fn heights(&self) -> &Array1<f64> {
        &self.height_m
    }

    /// Observer of element `i`. Panics if `i` is out of range.
    pub fn location(&self, i: usize) -> ObserverLocation {
        ObserverLocation {
            latitude_deg: self.latitude_deg[i],
            longitude_deg: self.longitude_deg[i],
            height_m: self.height_m[i],
        }
    }
}
