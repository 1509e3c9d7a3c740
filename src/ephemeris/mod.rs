pub mod ephemeris_common;
pub mod ground_ephemeris;

pub use ephemeris_common::{
    generate_timestamps, BodyPosition, EphemerisProvider, EphemerisSample, ObserverLocation,
};
pub use ground_ephemeris::GroundEphemeris;
