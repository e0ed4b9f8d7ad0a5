//! Error type for scene construction and configuration.
//!
//! Stepping never fails: degenerate numeric situations (zero distance, negative
//! discriminant, impact time outside the step) are defined no-ops. Errors only
//! arise when building bodies, validating parameters, or loading scenarios.

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Shape parameter that would give a non-positive or non-finite mass.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Configuration or scenario value out of range.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("scenario parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
