//! Fan sensor discovery and reading.
//!
//! Each hwmon controller directory exposes a `name` attribute and zero or
//! more `fan<n>_input` attributes holding the current speed in RPM, with an
//! optional `fan<n>_label` alongside.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::{read_attr, read_attr_integer};

/// Default sysfs location for hwmon controllers.
pub const HWMON_CLASS_PATH: &str = "/sys/class/hwmon";

/// A discovered fan speed source.
#[derive(Debug, Clone, Serialize)]
pub struct FanSensor {
    /// Stable identifier: `"<device>_<n>"`.
    pub id: String,

    /// Path to the `fan<n>_input` attribute.
    pub path: PathBuf,

    /// Per-fan label, `"Fan <n>"` when the label attribute is absent.
    pub label: String,

    /// Controller device name, `"unknown"` when unreadable.
    pub device: String,

    /// Fan input index within the controller.
    pub fan_num: String,

    /// Display name, e.g. `"nct6775 - CPU Fan"`.
    pub name: String,
}

impl FanSensor {
    /// Reads the current fan speed in RPM.
    pub fn read_speed(&self) -> Result<u32> {
        read_speed_at(&self.path)
    }
}

fn read_speed_at(path: &Path) -> Result<u32> {
    let value = read_attr_integer(path)?;
    if value < 0 {
        return Err(Error::NegativeSpeed {
            path: path.to_path_buf(),
            value,
        });
    }
    Ok(value as u32)
}

/// Enumerates fan inputs at the default sysfs location.
pub fn discover_fans() -> Vec<FanSensor> {
    discover_fans_in(Path::new(HWMON_CLASS_PATH))
}

/// Enumerates fan inputs under `root`, in directory enumeration order.
///
/// Every candidate input gets a validation read; inputs whose raw value does
/// not parse as a non-negative integer are discarded. The kernel exposes the
/// node for some controllers with no tachometer wired behind it.
pub fn discover_fans_in(root: &Path) -> Vec<FanSensor> {
    let mut fans = Vec::new();

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot scan {}: {}", root.display(), e);
            return fans;
        }
    };

    for entry in entries.flatten() {
        if !entry.file_name().to_string_lossy().starts_with("hwmon") {
            continue;
        }
        let hwmon_dir = entry.path();

        let device = read_attr(&hwmon_dir.join("name")).unwrap_or_else(|| "unknown".to_string());

        let inputs = match fs::read_dir(&hwmon_dir) {
            Ok(inputs) => inputs,
            Err(e) => {
                warn!("Cannot scan {}: {}", hwmon_dir.display(), e);
                continue;
            }
        };

        for input in inputs.flatten() {
            let file_name = input.file_name();
            let Some(fan_num) = file_name
                .to_string_lossy()
                .strip_prefix("fan")
                .and_then(|s| s.strip_suffix("_input"))
                .map(str::to_string)
            else {
                continue;
            };

            let path = input.path();

            // Validation read: nodes with no live sensor behind them fail
            // here and are excluded for the lifetime of the process.
            if let Err(e) = read_speed_at(&path) {
                debug!("Ignoring fan input {}: {}", path.display(), e);
                continue;
            }

            let label = read_attr(&hwmon_dir.join(format!("fan{}_label", fan_num)))
                .unwrap_or_else(|| format!("Fan {}", fan_num));

            fans.push(FanSensor {
                id: format!("{}_{}", device, fan_num),
                path,
                name: format!("{} - {}", device, label),
                label,
                device: device.clone(),
                fan_num,
            });
        }
    }

    info!("Discovered {} fan sensors", fans.len());
    for fan in &fans {
        debug!("  {}: {}", fan.name, fan.path.display());
    }

    fans
}
