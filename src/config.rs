use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::model::TerrainConfig;
use crate::stress::{StressPlan, TestKind};
use crate::view::RenderConfig;

/// Defaults for the `stress` subcommand
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    pub cpu_percent: u8,
    pub ram_percent: u8,
    pub duration_secs: u64,
    pub kind: TestKind,
    pub cpu_threads: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self { cpu_percent: 70, ram_percent: 50, duration_secs: 60, kind: TestKind::CpuRam, cpu_threads: 1 }
    }
}

impl StressConfig {
    pub fn plan(&self) -> StressPlan {
        StressPlan {
            cpu_percent: self.cpu_percent,
            ram_percent: self.ram_percent,
            duration: Duration::from_secs(self.duration_secs),
            kind: self.kind,
            cpu_threads: self.cpu_threads,
        }
    }
}

/// Everything that can be set from a JSON config file. Missing keys keep
/// their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub terrain: TerrainConfig,
    pub render: RenderConfig,
    pub stress: StressConfig,
}

impl AppConfig {
    /// Read `path` if given, otherwise return the defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })?;
        config.render.validate().map_err(|reason| ConfigError::Invalid { path: path.to_path_buf(), reason })?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
