//! Background sampling engine.
//!
//! One poll cycle per second: read every discovered sensor, publish fresh
//! temperature and fan snapshots, append the selected CPU temperature to a
//! bounded history, and recompute rolling statistics. The poll loop is the
//! only writer; HTTP handlers take read locks and receive owned copies.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;
use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tracing::debug;

use thermwatch_sensors::{fan, thermal, FanSensor, ThermalZone};

/// Fixed poll period. Each cycle sleeps the full interval after completing,
/// so the actual period is poll duration + interval.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Maximum retained history entries.
const HISTORY_CAPACITY: usize = 100;

/// Number of trailing history entries feeding the rolling statistics.
const STATS_WINDOW: usize = 20;

/// Zone classifications that identify the CPU, in priority order.
const CPU_ZONE_TYPES: [&str; 4] = ["x86_pkg_temp", "cpu_thermal", "coretemp", "acpi-0"];

/// One zone's reading from the current cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneReading {
    pub temperature: f64,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub name: String,
}

/// One fan's reading from the current cycle.
#[derive(Debug, Clone, Serialize)]
pub struct FanReading {
    pub speed: u32,
    pub label: String,
    pub device: String,
    pub name: String,
}

/// A `(timestamp, cpu temperature)` pair appended once per successful cycle.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub temperature: f64,
}

/// Rolling statistics over the trailing history window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TempStats {
    pub avg_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub cpu_temp: f64,
}

/// State published by the poll loop.
#[derive(Default)]
struct MonitorState {
    current_temps: HashMap<String, ZoneReading>,
    current_fans: HashMap<String, FanReading>,
    history: VecDeque<HistoryEntry>,
    stats: TempStats,
}

/// Sampling engine over the discovered sensor set.
///
/// The zone and fan lists are fixed at construction and never change for
/// the lifetime of the process.
pub struct Monitor {
    zones: Vec<ThermalZone>,
    fans: Vec<FanSensor>,
    state: RwLock<MonitorState>,
}

impl Monitor {
    /// Creates a monitor over an explicit sensor set.
    pub fn new(zones: Vec<ThermalZone>, fans: Vec<FanSensor>) -> Self {
        Self {
            zones,
            fans,
            state: RwLock::new(MonitorState::default()),
        }
    }

    /// Discovers sensors at the default sysfs locations.
    pub fn discover() -> Self {
        Self::new(thermal::discover_zones(), fan::discover_fans())
    }

    /// Runs one full poll cycle.
    ///
    /// A read failure skips that source for this cycle only; the source
    /// stays in the list and is retried next cycle. When every temperature
    /// read fails the cycle appends no history entry and leaves the stats
    /// untouched. Fan reads are not gated on temperature success.
    pub fn poll_cycle(&self) {
        let mut temps = HashMap::new();
        for zone in &self.zones {
            match zone.read_temperature() {
                Ok(temperature) => {
                    temps.insert(
                        zone.id.clone(),
                        ZoneReading {
                            temperature,
                            zone_type: zone.zone_type.clone(),
                            name: zone.name.clone(),
                        },
                    );
                }
                Err(e) => debug!("Skipping zone {}: {}", zone.id, e),
            }
        }

        let cpu_temp = self.select_cpu_temperature(&temps);

        let mut fans = HashMap::new();
        for fan in &self.fans {
            match fan.read_speed() {
                Ok(speed) => {
                    fans.insert(
                        fan.id.clone(),
                        FanReading {
                            speed,
                            label: fan.label.clone(),
                            device: fan.device.clone(),
                            name: fan.name.clone(),
                        },
                    );
                }
                Err(e) => debug!("Skipping fan {}: {}", fan.id, e),
            }
        }

        let mut state = self.state.write().unwrap();
        state.current_temps = temps;
        state.current_fans = fans;

        if let Some(cpu_temp) = cpu_temp {
            if state.history.len() == HISTORY_CAPACITY {
                state.history.pop_front();
            }
            state.history.push_back(HistoryEntry {
                timestamp: Local::now().to_rfc3339(),
                temperature: cpu_temp,
            });
            let stats = compute_stats(&state.history, cpu_temp);
            state.stats = stats;
        }
    }

    /// Selects the primary CPU temperature from this cycle's readings.
    ///
    /// Classified zones win in `CPU_ZONE_TYPES` priority order; otherwise
    /// the first zone in discovery order that read successfully. `None`
    /// when no temperature was read at all this cycle.
    fn select_cpu_temperature(&self, temps: &HashMap<String, ZoneReading>) -> Option<f64> {
        for cpu_type in CPU_ZONE_TYPES {
            for zone in &self.zones {
                if zone.zone_type.to_lowercase().contains(cpu_type) {
                    if let Some(reading) = temps.get(&zone.id) {
                        return Some(reading.temperature);
                    }
                }
            }
        }

        self.zones
            .iter()
            .find_map(|zone| temps.get(&zone.id))
            .map(|reading| reading.temperature)
    }

    /// Current rolling statistics.
    pub fn stats(&self) -> TempStats {
        self.state.read().unwrap().stats.clone()
    }

    /// Current statistics plus history length, read under one lock.
    pub fn stats_snapshot(&self) -> (TempStats, usize) {
        let state = self.state.read().unwrap();
        (state.stats.clone(), state.history.len())
    }

    /// This cycle's temperature snapshot, keyed by zone id.
    pub fn current_temperatures(&self) -> HashMap<String, ZoneReading> {
        self.state.read().unwrap().current_temps.clone()
    }

    /// This cycle's fan snapshot, keyed by sensor id.
    pub fn current_fans(&self) -> HashMap<String, FanReading> {
        self.state.read().unwrap().current_fans.clone()
    }

    /// CPU temperature history, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.read().unwrap().history.iter().cloned().collect()
    }

    /// The discovered thermal zones.
    pub fn zones(&self) -> &[ThermalZone] {
        &self.zones
    }

    /// The discovered fan sensors.
    pub fn fan_sensors(&self) -> &[FanSensor] {
        &self.fans
    }
}

fn compute_stats(history: &VecDeque<HistoryEntry>, cpu_temp: f64) -> TempStats {
    let window: Vec<f64> = history
        .iter()
        .rev()
        .take(STATS_WINDOW)
        .map(|entry| entry.temperature)
        .collect();

    if window.is_empty() {
        return TempStats {
            cpu_temp,
            ..TempStats::default()
        };
    }

    TempStats {
        avg_temp: window.iter().sum::<f64>() / window.len() as f64,
        max_temp: window.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        min_temp: window.iter().copied().fold(f64::INFINITY, f64::min),
        cpu_temp,
    }
}
