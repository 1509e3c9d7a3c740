//! Circle-circle overlap of the apparent solar and lunar disks
//!
//! Reference: Weisstein, "Circle-Circle Intersection", MathWorld.

use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

use crate::errors::{ObscurationError, Result};

/// Unit for apparent angular sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleUnit {
    Radians,
    Degrees,
    Arcminutes,
    Arcseconds,
}

impl AngleUnit {
    pub fn from_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Radians => value,
            AngleUnit::Degrees => value.to_degrees(),
            AngleUnit::Arcminutes => value.to_degrees() * 60.0,
            AngleUnit::Arcseconds => value.to_degrees() * 3600.0,
        }
    }
}

/// Apparent angular radius of a body, `radius / distance` in the requested unit
///
/// Flat-angle approximation; not `atan`.
pub fn angular_radius(physical_radius: f64, distance: f64, unit: AngleUnit) -> Result<f64> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(ObscurationError::domain(format!(
            "distance must be positive and finite, got {distance}"
        )));
    }
    if !physical_radius.is_finite() || physical_radius < 0.0 {
        return Err(ObscurationError::domain(format!(
            "radius must be non-negative and finite, got {physical_radius}"
        )));
    }
    Ok(unit.from_radians(physical_radius / distance))
}

/// Relative placement of the two disks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapConfiguration {
    /// No common area
    Disjoint,
    /// Moon disk lies wholly inside a larger Sun disk
    Annular,
    /// Moon disk covers the whole Sun disk
    Total,
    /// Boundaries cross at two points
    Partial,
}

impl OverlapConfiguration {
    pub fn classify(r_sun: f64, r_moon: f64, d: f64) -> Self {
        if d >= r_sun + r_moon {
            OverlapConfiguration::Disjoint
        } else if d <= (r_sun - r_moon).abs() {
            if r_sun > r_moon {
                OverlapConfiguration::Annular
            } else {
                OverlapConfiguration::Total
            }
        } else {
            OverlapConfiguration::Partial
        }
    }
}

fn check_inputs(r_sun: f64, r_moon: f64, d: f64) -> Result<()> {
    for (name, value) in [("sun radius", r_sun), ("moon radius", r_moon), ("separation", d)] {
        if !value.is_finite() || value < 0.0 {
            return Err(ObscurationError::domain(format!(
                "{name} must be non-negative and finite, got {value}"
            )));
        }
    }
    Ok(())
}

/// Lens area for crossing boundaries; only valid in the Partial configuration.
fn lens_area(r_sun: f64, r_moon: f64, d: f64) -> f64 {
    let cos_moon =
        ((d * d + r_moon * r_moon - r_sun * r_sun) / (2.0 * d * r_moon)).clamp(-1.0, 1.0);
    let cos_sun = ((d * d + r_sun * r_sun - r_moon * r_moon) / (2.0 * d * r_sun)).clamp(-1.0, 1.0);
    let radicand = ((-d + r_moon + r_sun)
        * (d + r_moon - r_sun)
        * (d - r_moon + r_sun)
        * (d + r_moon + r_sun))
        .max(0.0);

    r_moon * r_moon * cos_moon.acos() + r_sun * r_sun * cos_sun.acos() - 0.5 * radicand.sqrt()
}

fn area_for(config: OverlapConfiguration, r_sun: f64, r_moon: f64, d: f64) -> f64 {
    match config {
        OverlapConfiguration::Disjoint => 0.0,
        // Both containment cases report the full lunar disk
        OverlapConfiguration::Annular | OverlapConfiguration::Total => PI * r_moon * r_moon,
        OverlapConfiguration::Partial => {
            let max_r = r_sun.max(r_moon);
            lens_area(r_sun, r_moon, d).clamp(0.0, PI * max_r * max_r)
        }
    }
}

/// Overlap area of the two disks, in squared units of the inputs
pub fn overlap_area(r_sun: f64, r_moon: f64, d: f64) -> Result<f64> {
    check_inputs(r_sun, r_moon, d)?;
    let config = OverlapConfiguration::classify(r_sun, r_moon, d);
    Ok(area_for(config, r_sun, r_moon, d))
}

/// Element-wise [`overlap_area`] over equal-length sequences
pub fn overlap_area_batch(
    r_sun: ArrayView1<f64>,
    r_moon: ArrayView1<f64>,
    d: ArrayView1<f64>,
) -> Result<Array1<f64>> {
    if r_sun.len() != r_moon.len() || r_sun.len() != d.len() {
        return Err(ObscurationError::domain(format!(
            "overlap inputs differ in length: {}, {}, {}",
            r_sun.len(),
            r_moon.len(),
            d.len()
        )));
    }
    for i in 0..d.len() {
        check_inputs(r_sun[i], r_moon[i], d[i])?;
    }

    Ok(Zip::from(&r_sun)
        .and(&r_moon)
        .and(&d)
        .map_collect(|&rs, &rm, &sep| {
            area_for(OverlapConfiguration::classify(rs, rm, sep), rs, rm, sep)
        }))
}
