//! Error types for the sensor library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when reading a sensor attribute.
#[derive(Error, Debug)]
pub enum Error {
    /// The sysfs attribute could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sysfs attribute held something other than an integer.
    #[error("unparseable value in {path}: {value:?}")]
    Parse { path: PathBuf, value: String },

    /// A fan input reported a negative speed.
    #[error("negative fan speed in {path}: {value}")]
    NegativeSpeed { path: PathBuf, value: i64 },
}
