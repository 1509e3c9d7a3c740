//! Fraction of the solar disk covered by the Moon
//!
//! The Sun and Moon are modelled as flat disks whose angular radii follow
//! from their physical radii and observer distances. Obscuration is the
//! disk overlap area divided by the solar disk area, forced to zero when the
//! Sun sits below the configured elevation.

pub mod batch;
pub mod geometry;
pub mod render;
pub mod windows;

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::ephemeris::{EphemerisProvider, EphemerisSample, ObserverLocation};
use crate::errors::{ObscurationError, Result};
use crate::utils::config::{
    ObscurationSettings, DEFAULT_SETTINGS, MOON_RADIUS_KM, SUN_RADIUS_KM,
};

use batch::{BatchValue, ObservationBatch};
use geometry::{angular_radius, overlap_area_batch, AngleUnit, OverlapConfiguration};
use render::{Disk, DiskRenderer, DiskScene};

/// Obscuration plus the separation and solar elevation behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObscurationReport {
    pub times: Vec<DateTime<Utc>>,
    pub obscuration: BatchValue,
    pub separation_deg: BatchValue,
    pub solar_elevation_deg: BatchValue,
    pub configuration: Vec<OverlapConfiguration>,
}

impl ObscurationReport {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Conversion into a list of observation times (a single time or a sequence)
pub trait IntoTimes {
    fn into_times(self) -> Vec<DateTime<Utc>>;
}

impl IntoTimes for DateTime<Utc> {
    fn into_times(self) -> Vec<DateTime<Utc>> {
        vec![self]
    }
}

impl IntoTimes for Vec<DateTime<Utc>> {
    fn into_times(self) -> Vec<DateTime<Utc>> {
        self
    }
}

impl IntoTimes for &[DateTime<Utc>] {
    fn into_times(self) -> Vec<DateTime<Utc>> {
        self.to_vec()
    }
}

/// Conversion into a list of values (a scalar or a sequence)
pub trait IntoValues {
    fn into_values(self) -> Vec<f64>;
}

impl IntoValues for f64 {
    fn into_values(self) -> Vec<f64> {
        vec![self]
    }
}

impl IntoValues for Vec<f64> {
    fn into_values(self) -> Vec<f64> {
        self
    }
}

impl IntoValues for &[f64] {
    fn into_values(self) -> Vec<f64> {
        self.to_vec()
    }
}

impl<const N: usize> IntoValues for [f64; N] {
    fn into_values(self) -> Vec<f64> {
        self.to_vec()
    }
}

impl IntoValues for Array1<f64> {
    fn into_values(self) -> Vec<f64> {
        self.to_vec()
    }
}

/// Caller-facing observation request before broadcasting
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationInput {
    times: Vec<DateTime<Utc>>,
    latitude_deg: Vec<f64>,
    longitude_deg: Vec<f64>,
    /// `None` means sea level
    height_m: Option<Vec<f64>>,
    location: Option<ObserverLocation>,
}

impl ObservationInput {
    /// Times plus geodetic coordinates; each may be a scalar or a sequence
    pub fn new(
        times: impl IntoTimes,
        latitude_deg: impl IntoValues,
        longitude_deg: impl IntoValues,
    ) -> Self {
        ObservationInput {
            times: times.into_times(),
            latitude_deg: latitude_deg.into_values(),
            longitude_deg: longitude_deg.into_values(),
            height_m: None,
            location: None,
        }
    }

    /// Times at a fixed observer
    pub fn at_location(times: impl IntoTimes, location: ObserverLocation) -> Self {
        ObservationInput {
            times: times.into_times(),
            latitude_deg: Vec::new(),
            longitude_deg: Vec::new(),
            height_m: None,
            location: Some(location),
        }
    }

    /// Height above the ellipsoid in meters (default 0)
    ///
    /// Conflicts with an explicit location; [`to_batch`](Self::to_batch)
    /// rejects the combination.
    pub fn with_height(mut self, height_m: impl IntoValues) -> Self {
        self.height_m = Some(height_m.into_values());
        self
    }

    /// Replace latitude, longitude and height with an explicit location
    pub fn with_location(mut self, location: ObserverLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn to_batch(&self) -> Result<ObservationBatch> {
        match &self.location {
            Some(location) => {
                if self.height_m.is_some() {
                    return Err(ObscurationError::domain(
                        "height cannot be combined with an explicit location",
                    ));
                }
                location.validate()?;
                ObservationBatch::at_location(&self.times, location)
            }
            None => {
                if self.latitude_deg.is_empty() || self.longitude_deg.is_empty() {
                    return Err(ObscurationError::domain(
                        "latitude and longitude are required unless a location is given",
                    ));
                }
                ObservationBatch::broadcast(
                    &self.times,
                    &self.latitude_deg,
                    &self.longitude_deg,
                    self.height_m.as_deref().unwrap_or(&[0.0]),
                )
            }
        }
    }
}

/// Per-call options
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObscurationOptions {
    /// Solar altitude in degrees below which obscuration is forced to zero
    pub min_solar_elevation_deg: f64,
    /// Where to write the diagnostic image; single-element batches only
    pub plot_path: Option<PathBuf>,
}

impl ObscurationOptions {
    pub fn from_settings(settings: &ObscurationSettings) -> Self {
        ObscurationOptions {
            min_solar_elevation_deg: settings.min_solar_elevation_deg,
            plot_path: None,
        }
    }

    pub fn with_min_solar_elevation(mut self, degrees: f64) -> Self {
        self.min_solar_elevation_deg = degrees;
        self
    }

    pub fn with_plot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.plot_path = Some(path.into());
        self
    }
}

/// Angular radii in degrees of the Sun and Moon for each sample
fn disk_radii(samples: &[EphemerisSample]) -> Result<(Array1<f64>, Array1<f64>)> {
    let mut r_sun = Array1::zeros(samples.len());
    let mut r_moon = Array1::zeros(samples.len());
    for (i, sample) in samples.iter().enumerate() {
        r_sun[i] = angular_radius(SUN_RADIUS_KM, sample.sun.distance_km, AngleUnit::Degrees)?;
        r_moon[i] = angular_radius(MOON_RADIUS_KM, sample.moon.distance_km, AngleUnit::Degrees)?;
    }
    Ok((r_sun, r_moon))
}

/// Obscuration for a batch given one ephemeris sample per element
pub fn compute_obscuration(
    batch: &ObservationBatch,
    samples: &[EphemerisSample],
    min_solar_elevation_deg: f64,
) -> Result<ObscurationReport> {
    if samples.len() != batch.len() {
        return Err(ObscurationError::domain(format!(
            "{} ephemeris samples for a batch of {}",
            samples.len(),
            batch.len()
        )));
    }

    if let Some(bad) = samples.iter().find(|s| !s.sun.altitude_deg.is_finite()) {
        return Err(ObscurationError::domain(format!(
            "solar altitude must be finite, got {}",
            bad.sun.altitude_deg
        )));
    }

    let (r_sun, r_moon) = disk_radii(samples)?;
    let separation: Array1<f64> = samples.iter().map(|s| s.separation_deg).collect();
    let elevation: Array1<f64> = samples.iter().map(|s| s.sun.altitude_deg).collect();

    let area = overlap_area_batch(r_sun.view(), r_moon.view(), separation.view())?;

    let mut obscuration: Array1<f64> = Array1::zeros(batch.len());
    let mut configuration = Vec::with_capacity(batch.len());
    for i in 0..batch.len() {
        if r_sun[i] <= 0.0 {
            return Err(ObscurationError::domain(
                "solar angular radius is zero; cannot normalize obscuration",
            ));
        }
        configuration.push(OverlapConfiguration::classify(r_sun[i], r_moon[i], separation[i]));
        obscuration[i] = if elevation[i] < min_solar_elevation_deg {
            0.0
        } else {
            (area[i] / (PI * r_sun[i] * r_sun[i])).min(1.0)
        };
    }

    debug!(
        "Computed obscuration for {} observations (peak {:.4})",
        batch.len(),
        obscuration.iter().cloned().fold(0.0, f64::max)
    );

    Ok(ObscurationReport {
        times: batch.times().to_vec(),
        obscuration: BatchValue::from_array(obscuration),
        separation_deg: BatchValue::from_array(separation),
        solar_elevation_deg: BatchValue::from_array(elevation),
        configuration,
    })
}

fn diagnostic_scene(
    batch: &ObservationBatch,
    sample: &EphemerisSample,
    report: &ObscurationReport,
) -> Result<DiskScene> {
    let (r_sun, r_moon) = disk_radii(std::slice::from_ref(sample))?;
    let location = batch.location(0);
    let obscuration = report.obscuration.to_vec()[0];

    Ok(DiskScene {
        sun: Disk {
            azimuth_deg: sample.sun.azimuth_deg,
            altitude_deg: sample.sun.altitude_deg,
            radius_deg: r_sun[0],
        },
        moon: Disk {
            azimuth_deg: sample.moon.azimuth_deg,
            altitude_deg: sample.moon.altitude_deg,
            radius_deg: r_moon[0],
        },
        separation_deg: sample.separation_deg,
        title_lines: vec![
            format!(
                "Lat: {:.2}° Lon: {:.2}° Height: {} km",
                location.latitude_deg,
                location.longitude_deg,
                location.height_m / 1000.0
            ),
            format!(
                "Obsc: {:.3} Sun-Moon Sep: {:.4}° Solar Elevation: {:.1}°",
                obscuration, sample.separation_deg, sample.sun.altitude_deg
            ),
        ],
    })
}

/// Render the single-observation diagnostic; failures never reach the caller
fn render_diagnostic(
    renderer: Option<&dyn DiskRenderer>,
    destination: &Path,
    batch: &ObservationBatch,
    samples: &[EphemerisSample],
    report: &ObscurationReport,
) {
    if batch.len() != 1 {
        warn!(
            "Skipping obscuration plot: batch has {} observations, plots need exactly one",
            batch.len()
        );
        return;
    }
    let Some(renderer) = renderer else {
        warn!("Skipping obscuration plot: no renderer available");
        return;
    };

    let outcome = diagnostic_scene(batch, &samples[0], report)
        .and_then(|scene| renderer.render(&scene, destination));
    match outcome {
        Ok(()) => debug!("Wrote obscuration plot to {}", destination.display()),
        Err(e) => warn!("Obscuration plot failed: {e}"),
    }
}

fn evaluate<P: EphemerisProvider + ?Sized>(
    input: &ObservationInput,
    provider: &P,
    options: &ObscurationOptions,
    parallel: bool,
    renderer: Option<&dyn DiskRenderer>,
) -> Result<ObscurationReport> {
    let batch = input.to_batch()?;
    let samples = provider.sample_batch(&batch, parallel)?;
    let report = compute_obscuration(&batch, &samples, options.min_solar_elevation_deg)?;

    if let Some(path) = &options.plot_path {
        render_diagnostic(renderer, path, &batch, &samples, &report);
    }
    Ok(report)
}

#[cfg(feature = "plot")]
fn default_renderer() -> Option<Box<dyn DiskRenderer>> {
    Some(Box::new(render::SvgDiskRenderer::default()))
}

#[cfg(not(feature = "plot"))]
fn default_renderer() -> Option<Box<dyn DiskRenderer>> {
    None
}

/// Obscuration with separation and solar elevation for each observation
pub fn calculate_obscuration_report<P: EphemerisProvider + ?Sized>(
    input: &ObservationInput,
    provider: &P,
    options: &ObscurationOptions,
) -> Result<ObscurationReport> {
    let renderer = options.plot_path.as_ref().and_then(|_| default_renderer());
    evaluate(
        input,
        provider,
        options,
        DEFAULT_SETTINGS.parallel,
        renderer.as_deref(),
    )
}

/// Obscuration only: a scalar for one observation, a series otherwise
pub fn calculate_obscuration<P: EphemerisProvider + ?Sized>(
    input: &ObservationInput,
    provider: &P,
    options: &ObscurationOptions,
) -> Result<BatchValue> {
    Ok(calculate_obscuration_report(input, provider, options)?.obscuration)
}

/// Provider, settings and renderer bundled for repeated use
pub struct ObscurationCalculator<P: EphemerisProvider> {
    provider: P,
    settings: ObscurationSettings,
    renderer: Option<Box<dyn DiskRenderer>>,
}

impl<P: EphemerisProvider> ObscurationCalculator<P> {
    /// Uses the process-wide settings and, with the `plot` feature, the SVG renderer
    pub fn new(provider: P) -> Self {
        ObscurationCalculator {
            provider,
            settings: DEFAULT_SETTINGS.clone(),
            renderer: default_renderer(),
        }
    }

    pub fn with_settings(mut self, settings: ObscurationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn DiskRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn without_renderer(mut self) -> Self {
        self.renderer = None;
        self
    }

    pub fn settings(&self) -> &ObscurationSettings {
        &self.settings
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Full report; `plot_path` is honoured for single observations only
    pub fn report(
        &self,
        input: &ObservationInput,
        plot_path: Option<&Path>,
    ) -> Result<ObscurationReport> {
        let options = ObscurationOptions {
            min_solar_elevation_deg: self.settings.min_solar_elevation_deg,
            plot_path: plot_path.map(Path::to_path_buf),
        };
        evaluate(
            input,
            &self.provider,
            &options,
            self.settings.parallel,
            self.renderer.as_deref(),
        )
    }

    pub fn obscuration(&self, input: &ObservationInput) -> Result<BatchValue> {
        Ok(self.report(input, None)?.obscuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::BodyPosition;
    use crate::utils::config::AU_TO_KM;
    use chrono::{Duration, TimeZone};

    const MOON_DISTANCE_KM: f64 = 380_000.0;

    fn sample(separation_deg: f64, sun_alt: f64) -> EphemerisSample {
        EphemerisSample {
            sun: BodyPosition {
                azimuth_deg: 120.0,
                altitude_deg: sun_alt,
                distance_km: AU_TO_KM,
            },
            moon: BodyPosition {
                azimuth_deg: 120.0,
                altitude_deg: sun_alt + separation_deg,
                distance_km: MOON_DISTANCE_KM,
            },
            separation_deg,
        }
    }

    fn batch(n: usize) -> ObservationBatch {
        let t0 = Utc.with_ymd_and_hms(2023, 10, 14, 16, 0, 0).unwrap();
        let times: Vec<_> = (0..n).map(|i| t0 + Duration::minutes(i as i64)).collect();
        ObservationBatch::broadcast(&times, &[37.5], &[-122.1], &[0.0]).unwrap()
    }

    #[test]
    fn test_scalar_for_single_element() {
        let report = compute_obscuration(&batch(1), &[sample(0.1, 20.0)], 0.0).unwrap();
        let obs = report.obscuration.as_scalar().unwrap();
        assert!(obs > 0.0 && obs < 1.0);
        assert_eq!(report.configuration, vec![OverlapConfiguration::Partial]);
    }

    #[test]
    fn test_series_keeps_order() {
        let samples = [sample(0.0, 20.0), sample(0.3, 20.0), sample(2.0, 20.0)];
        let report = compute_obscuration(&batch(3), &samples, 0.0).unwrap();
        let obs = report.obscuration.as_series().unwrap();
        assert_eq!(obs.len(), 3);
        assert!(obs[0] > obs[1] && obs[1] > obs[2]);
        assert_eq!(obs[2], 0.0);
        assert_eq!(report.separation_deg.to_vec(), vec![0.0, 0.3, 2.0]);
    }

    #[test]
    fn test_annular_ratio_of_disk_areas() {
        // Moon farther than usual: its disk fits inside the Sun's
        let mut s = sample(0.0, 30.0);
        s.moon.distance_km = 405_000.0;
        let report = compute_obscuration(&batch(1), &[s], 0.0).unwrap();
        let r_sun = SUN_RADIUS_KM / AU_TO_KM;
        let r_moon = MOON_RADIUS_KM / 405_000.0;
        let expected = (r_moon / r_sun).powi(2);
        let obs = report.obscuration.as_scalar().unwrap();
        assert!((obs - expected).abs() < 1e-9);
        assert!(obs < 1.0);
        assert_eq!(report.configuration[0], OverlapConfiguration::Annular);
    }

    #[test]
    fn test_total_clamped_to_one() {
        let mut s = sample(0.0, 30.0);
        s.moon.distance_km = 357_000.0;
        let report = compute_obscuration(&batch(1), &[s], 0.0).unwrap();
        assert_eq!(report.obscuration.as_scalar(), Some(1.0));
        assert_eq!(report.configuration[0], OverlapConfiguration::Total);
    }

    #[test]
    fn test_horizon_cutoff_forces_zero() {
        let samples = [sample(0.0, -0.5), sample(0.0, 3.0)];
        let report = compute_obscuration(&batch(2), &samples, 0.0).unwrap();
        assert_eq!(report.obscuration.to_vec()[0], 0.0);
        assert!(report.obscuration.to_vec()[1] > 0.9);

        let raised = compute_obscuration(&batch(2), &samples, 5.0).unwrap();
        assert_eq!(raised.obscuration.to_vec(), vec![0.0, 0.0]);

        let lowered = compute_obscuration(&batch(2), &samples, -10.0).unwrap();
        assert!(lowered.obscuration.to_vec().iter().all(|&v| v > 0.9));
    }

    #[test]
    fn test_zero_distance_is_domain_error() {
        let mut s = sample(0.1, 20.0);
        s.sun.distance_km = 0.0;
        let err = compute_obscuration(&batch(1), &[s], 0.0).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_non_finite_solar_altitude_is_domain_error() {
        for altitude in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut s = sample(0.0, 20.0);
            s.sun.altitude_deg = altitude;
            let err = compute_obscuration(&batch(1), &[s], 0.0).unwrap_err();
            assert!(err.is_domain(), "altitude {altitude}");
        }

        // One bad element poisons the whole batch
        let mut bad = sample(0.0, 20.0);
        bad.sun.altitude_deg = f64::NAN;
        let err = compute_obscuration(&batch(2), &[sample(0.0, 20.0), bad], 0.0).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_sample_count_mismatch() {
        let err = compute_obscuration(&batch(2), &[sample(0.1, 20.0)], 0.0).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_input_requires_coordinates() {
        let t = Utc.with_ymd_and_hms(2023, 10, 14, 16, 0, 0).unwrap();
        let input = ObservationInput::new(t, Vec::<f64>::new(), -122.0);
        assert!(input.to_batch().unwrap_err().is_domain());

        let location = ObserverLocation::new(37.5, -122.0, 10.0).unwrap();
        let batch = ObservationInput::new(t, Vec::<f64>::new(), -122.0)
            .with_location(location)
            .to_batch()
            .unwrap();
        assert_eq!(batch.location(0), location);
    }

    #[test]
    fn test_default_renderer_follows_plot_feature() {
        assert_eq!(default_renderer().is_some(), cfg!(feature = "plot"));
        let calculator = ObscurationCalculator::new(crate::GroundEphemeris);
        assert_eq!(calculator.renderer.is_some(), cfg!(feature = "plot"));
        assert!(calculator.without_renderer().renderer.is_none());
    }

    #[test]
    fn test_height_conflicts_with_location() {
        let t = Utc.with_ymd_and_hms(2023, 10, 14, 16, 0, 0).unwrap();
        let location = ObserverLocation::new(37.5, -122.0, 10.0).unwrap();
        let err = ObservationInput::at_location(t, location)
            .with_height(500.0)
            .to_batch()
            .unwrap_err();
        assert!(err.is_domain());

        let batch = ObservationInput::at_location(t, location).to_batch().unwrap();
        assert_eq!(batch.heights()[0], 10.0);
    }

    #[test]
    fn test_report_json_round_trip() {
        let samples = [sample(0.1, 20.0), sample(2.0, 20.0)];
        let report = compute_obscuration(&batch(2), &samples, 0.0).unwrap();
        let json = report.to_json().unwrap();
        let back: ObscurationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.configuration, report.configuration);
        assert_eq!(back.times, report.times);
    }

    #[test]
    fn test_input_broadcasts_height() {
        let t0 = Utc.with_ymd_and_hms(2023, 10, 14, 16, 0, 0).unwrap();
        let times = vec![t0, t0 + Duration::minutes(2), t0 + Duration::minutes(4)];
        let batch = ObservationInput::new(times, 37.5, -122.0)
            .with_height(3e5)
            .to_batch()
            .unwrap();
        assert_eq!(batch.len(), 3);
        assert!(batch.heights().iter().all(|&h| h == 3e5));
    }
}
