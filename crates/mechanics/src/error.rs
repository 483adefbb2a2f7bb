//! Configuration-error taxonomy for tire/vehicle construction and presets.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// A named preset does not exist.
    #[error("unknown preset '{name}', available: {available}")]
    UnknownPreset { name: String, available: String },

    /// A field that must be strictly positive was zero or negative.
    #[error("invalid configuration: {field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// A field outside its required open interval.
    #[error("invalid configuration: {field} must be in ({low}, {high}), got {value}")]
    OutOfRange { field: &'static str, value: f64, low: f64, high: f64 },
}
