//! Thermwatch Sensor Library
//!
//! Discovery and polling of the sensors the kernel exposes through sysfs:
//! thermal zones under `/sys/class/thermal` and fan tachometer inputs under
//! `/sys/class/hwmon`.
//!
//! Discovery runs once at startup and produces immutable source lists; the
//! per-source read methods are called every poll cycle and fail per-source
//! without affecting their siblings.

pub mod error;
pub mod fan;
pub mod thermal;

pub use error::{Error, Result};
pub use fan::FanSensor;
pub use thermal::ThermalZone;

use std::fs;
use std::path::Path;

/// Reads a sysfs attribute as a trimmed string.
///
/// Returns `None` when the attribute is missing or unreadable; callers fall
/// back to their own defaults.
pub(crate) fn read_attr(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

/// Reads a sysfs attribute holding a plain-text integer.
pub(crate) fn read_attr_integer(path: &Path) -> Result<i64> {
    let raw = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    raw.trim().parse().map_err(|_| Error::Parse {
        path: path.to_path_buf(),
        value: raw.trim().to_string(),
    })
}
