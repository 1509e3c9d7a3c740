// Module declarations
pub mod ephemeris;
pub mod errors;
pub mod obscuration;
pub mod utils;

#[cfg(feature = "python")]
mod python;

// Re-export public API
pub use ephemeris::{
    generate_timestamps, BodyPosition, EphemerisProvider, EphemerisSample, GroundEphemeris,
    ObserverLocation,
};
pub use errors::{ObscurationError, Result};
pub use obscuration::batch::{BatchValue, ObservationBatch};
pub use obscuration::geometry::{
    angular_radius, overlap_area, overlap_area_batch, AngleUnit, OverlapConfiguration,
};
#[cfg(feature = "plot")]
pub use obscuration::render::SvgDiskRenderer;
pub use obscuration::render::{Disk, DiskRenderer, DiskScene};
pub use obscuration::windows::{find_eclipse_windows, EclipseWindow};
pub use obscuration::{
    calculate_obscuration, calculate_obscuration_report, compute_obscuration, IntoTimes,
    IntoValues, ObscurationCalculator, ObscurationOptions, ObscurationReport, ObservationInput,
};
pub use utils::config::{ObscurationSettings, DEFAULT_SETTINGS};
