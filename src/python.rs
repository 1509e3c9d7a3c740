//! Python bindings, built with the `python` feature

use chrono::{DateTime, Utc};
use numpy::IntoPyArray;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyFloat};
use pyo3::wrap_pyfunction;

use crate::errors::ObscurationError;
use crate::obscuration::batch::BatchValue;
use crate::obscuration::{calculate_obscuration_report, ObscurationOptions, ObservationInput};
use crate::GroundEphemeris;

impl From<ObscurationError> for PyErr {
    fn from(err: ObscurationError) -> PyErr {
        match err {
            ObscurationError::Domain(_)
            | ObscurationError::TimeRange(_)
            | ObscurationError::Config(_) => PyValueError::new_err(err.to_string()),
            ObscurationError::Ephemeris(_) | ObscurationError::Render(_) => {
                PyRuntimeError::new_err(err.to_string())
            }
        }
    }
}

/// Convert a naive-or-UTC Python datetime to chrono
fn python_datetime_to_utc(py_dt: &Bound<PyAny>) -> PyResult<DateTime<Utc>> {
    let date = chrono::NaiveDate::from_ymd_opt(
        py_dt.getattr("year")?.extract()?,
        py_dt.getattr("month")?.extract()?,
        py_dt.getattr("day")?.extract()?,
    )
    .ok_or_else(|| PyValueError::new_err("Invalid date"))?;

    let time = chrono::NaiveTime::from_hms_micro_opt(
        py_dt.getattr("hour")?.extract()?,
        py_dt.getattr("minute")?.extract()?,
        py_dt.getattr("second")?.extract()?,
        py_dt.getattr("microsecond")?.extract()?,
    )
    .ok_or_else(|| PyValueError::new_err("Invalid time"))?;

    Ok(DateTime::from_naive_utc_and_offset(
        chrono::NaiveDateTime::new(date, time),
        Utc,
    ))
}

/// A single datetime or any iterable of datetimes
fn extract_times(obj: &Bound<PyAny>) -> PyResult<Vec<DateTime<Utc>>> {
    if obj.hasattr("year")? {
        return Ok(vec![python_datetime_to_utc(obj)?]);
    }
    obj.try_iter()?
        .map(|item| python_datetime_to_utc(&item?))
        .collect()
}

/// A float or any iterable of floats
fn extract_values(obj: &Bound<PyAny>) -> PyResult<Vec<f64>> {
    if let Ok(value) = obj.extract::<f64>() {
        return Ok(vec![value]);
    }
    obj.try_iter()?.map(|item| item?.extract::<f64>()).collect()
}

fn batch_value_to_py(py: Python, value: BatchValue) -> Py<PyAny> {
    match value {
        BatchValue::Scalar(v) => PyFloat::new(py, v).into_any().unbind(),
        BatchValue::Series(values) => values.into_pyarray(py).into_any().unbind(),
    }
}

#[pyfunction]
#[pyo3(signature = (
    date_time,
    lat=None,
    lon=None,
    height=None,
    return_dict=false,
    min_solar_elev_deg=0.0,
    plot_obscuration=None
))]
#[allow(clippy::too_many_arguments)]
fn calculate_obscuration(
    py: Python,
    date_time: &Bound<PyAny>,
    lat: Option<&Bound<PyAny>>,
    lon: Option<&Bound<PyAny>>,
    height: Option<&Bound<PyAny>>,
    return_dict: bool,
    min_solar_elev_deg: f64,
    plot_obscuration: Option<String>,
) -> PyResult<Py<PyAny>> {
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Err(PyValueError::new_err("lat and lon are required"));
    };

    let mut input = ObservationInput::new(
        extract_times(date_time)?,
        extract_values(lat)?,
        extract_values(lon)?,
    );
    if let Some(height) = height {
        input = input.with_height(extract_values(height)?);
    }

    let mut options =
        ObscurationOptions::default().with_min_solar_elevation(min_solar_elev_deg);
    if let Some(path) = plot_obscuration {
        options = options.with_plot_path(path);
    }

    let report = py.detach(|| calculate_obscuration_report(&input, &GroundEphemeris, &options))?;

    if !return_dict {
        return Ok(batch_value_to_py(py, report.obscuration));
    }

    let dict = PyDict::new(py);
    dict.set_item("obsc", batch_value_to_py(py, report.obscuration))?;
    dict.set_item("sun_moon_sep_deg", batch_value_to_py(py, report.separation_deg))?;
    dict.set_item("solar_elev_deg", batch_value_to_py(py, report.solar_elevation_deg))?;
    Ok(dict.into_any().unbind())
}

#[pymodule]
fn _solar_obscuration(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(calculate_obscuration, m)?)?;
    Ok(())
}
