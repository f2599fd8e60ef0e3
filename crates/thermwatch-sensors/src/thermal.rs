//! Thermal zone discovery and reading.
//!
//! Each `thermal_zone<n>` directory exposes a `temp` attribute holding the
//! current value in millidegrees Celsius and a `type` attribute holding the
//! driver-reported classification (e.g. `x86_pkg_temp`).

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::{read_attr, read_attr_integer};

/// Default sysfs location for thermal zones.
pub const THERMAL_CLASS_PATH: &str = "/sys/class/thermal";

/// A discovered temperature source.
#[derive(Debug, Clone, Serialize)]
pub struct ThermalZone {
    /// Stable identifier: the numeric suffix of the zone directory.
    pub id: String,

    /// Path to the `temp` attribute.
    pub path: PathBuf,

    /// Driver-reported classification, `"unknown"` when unreadable.
    #[serde(rename = "type")]
    pub zone_type: String,

    /// Display name, e.g. `"Zone 0 (x86_pkg_temp)"`.
    pub name: String,
}

impl ThermalZone {
    /// Reads the current temperature in degrees Celsius.
    pub fn read_temperature(&self) -> Result<f64> {
        let millidegrees = read_attr_integer(&self.path)?;
        Ok(millidegrees as f64 / 1000.0)
    }
}

/// Enumerates thermal zones at the default sysfs location.
pub fn discover_zones() -> Vec<ThermalZone> {
    discover_zones_in(Path::new(THERMAL_CLASS_PATH))
}

/// Enumerates thermal zones under `root`, in directory enumeration order.
///
/// An unreadable `type` attribute is not an error; the zone reports with
/// classification `"unknown"`. A missing `temp` attribute skips the zone.
pub fn discover_zones_in(root: &Path) -> Vec<ThermalZone> {
    let mut zones = Vec::new();

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot scan {}: {}", root.display(), e);
            return zones;
        }
    };

    for entry in entries.flatten() {
        let dir_name = entry.file_name();
        let Some(zone_num) = dir_name.to_string_lossy().strip_prefix("thermal_zone").map(str::to_string) else {
            continue;
        };

        let zone_dir = entry.path();
        let temp_path = zone_dir.join("temp");
        if !temp_path.exists() {
            continue;
        }

        let zone_type =
            read_attr(&zone_dir.join("type")).unwrap_or_else(|| "unknown".to_string());

        zones.push(ThermalZone {
            id: zone_num.clone(),
            path: temp_path,
            name: format!("Zone {} ({})", zone_num, zone_type),
            zone_type,
        });
    }

    info!("Discovered {} thermal zones", zones.len());
    for zone in &zones {
        debug!("  {}: {}", zone.name, zone.path.display());
    }

    zones
}
