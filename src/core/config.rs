//! Configuration management for NexVer.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::project::Simulator;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Simulation run settings
    pub simulation: SimulationConfig,

    /// Long-running operation settings
    pub operations: OperationsConfig,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory new projects are created under
    pub projects_dir: PathBuf,

    /// Simulator selected for new sessions
    pub simulator: Simulator,
}

/// Simulation run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Milliseconds between progress ticks
    pub tick_interval_ms: u64,

    /// Largest progress step per tick, in percent
    pub max_increment: u8,

    /// Milliseconds between reaching 100% and the report
    pub finalize_delay_ms: u64,

    /// Seed for the progress and outcome generator; entropy when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Chance of logging a failure detail for a single test (0.0 - 1.0)
    pub failure_detail_probability: f64,

    /// Passing test count reported in the summary
    pub passed: u32,

    /// Failing test count reported in the summary
    pub failed: u32,
}

/// Long-running operation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationsConfig {
    /// Give up on a generation call after this many seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl OperationsConfig {
    /// The timeout as a duration.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.nexver.toml` in current directory
    /// 2. `~/.config/nexver/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(".nexver.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = Self::config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> anyhow::Result<()> {
        let probability = self.simulation.failure_detail_probability;
        if !(0.0..=1.0).contains(&probability) {
            anyhow::bail!(
                "simulation.failure_detail_probability must be between 0.0 and 1.0, got {}",
                probability
            );
        }
        Ok(())
    }

    /// Save configuration to a specific file.
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("nexver"))
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        let projects_dir = dirs::document_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("NexVer_Projects");
        Self { projects_dir, simulator: Simulator::default() }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            max_increment: 10,
            finalize_delay_ms: 500,
            seed: None,
            failure_detail_probability: 0.2,
            passed: 1253,
            failed: 12,
        }
    }
}
