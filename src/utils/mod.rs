pub mod config;
pub mod geo;
pub mod hifi_time;
pub mod moon;
pub mod sun;
pub mod time_utils;
pub mod vector_math;
