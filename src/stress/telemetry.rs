use std::fmt;

use sysinfo::{Components, System};
use tracing::debug;

/// Labels that identify a CPU package/core sensor across platforms
const CPU_SENSOR_HINTS: [&str; 5] = ["coretemp", "package", "k10temp", "tctl", "cpu"];

/// One reading of host load
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub total_memory: u64,
    pub cpu_freq_ghz: Option<f32>,
    pub cpu_temp_c: Option<f32>,
}

impl fmt::Display for TelemetrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CPU Usage: {:.1}% | RAM Usage: {:.1}%", self.cpu_percent, self.memory_percent)?;
        match self.cpu_freq_ghz {
            Some(ghz) => write!(f, " | CPU Freq: {ghz:.2} GHz")?,
            None => write!(f, " | CPU Freq: N/A")?,
        }
        match self.cpu_temp_c {
            Some(c) => write!(f, " | CPU Temp: {c:.1}°C"),
            None => write!(f, " | CPU Temp: N/A"),
        }
    }
}

pub trait TelemetrySource {
    fn sample(&mut self) -> TelemetrySnapshot;
}

/// Reads the host through `sysinfo`
pub struct SystemTelemetry {
    system: System,
    components: Components,
}

impl SystemTelemetry {
    pub fn new() -> Self {
        let mut system = System::new();
        // cpu usage is a delta between two refreshes
        system.refresh_cpu();
        system.refresh_memory();
        Self { system, components: Components::new_with_refreshed_list() }
    }

    pub fn total_memory(&self) -> u64 {
        self.system.total_memory()
    }

    fn cpu_temperature(&self) -> Option<f32> {
        let mut fallback = None;
        for component in &self.components {
            let label = component.label().to_lowercase();
            let temp = component.temperature();
            if !temp.is_finite() || temp <= 0.0 {
                continue;
            }
            if label.contains(CPU_SENSOR_HINTS[0]) {
                return Some(temp);
            }
            if fallback.is_none() && CPU_SENSOR_HINTS.iter().any(|hint| label.contains(hint)) {
                fallback = Some(temp);
            }
        }
        fallback
    }
}

impl Default for SystemTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySource for SystemTelemetry {
    fn sample(&mut self) -> TelemetrySnapshot {
        self.system.refresh_cpu();
        self.system.refresh_memory();
        self.components.refresh();

        let total = self.system.total_memory();
        let memory_percent = if total == 0 {
            0.0
        } else {
            (self.system.used_memory() as f64 / total as f64 * 100.0) as f32
        };
        let cpu_freq_ghz = self
            .system
            .cpus()
            .first()
            .map(|cpu| cpu.frequency())
            .filter(|mhz| *mhz > 0)
            .map(|mhz| mhz as f32 / 1000.0);

        let snapshot = TelemetrySnapshot {
            cpu_percent: self.system.global_cpu_info().cpu_usage(),
            memory_percent,
            total_memory: total,
            cpu_freq_ghz,
            cpu_temp_c: self.cpu_temperature(),
        };
        debug!(%snapshot, "telemetry sampled");
        snapshot
    }
}
