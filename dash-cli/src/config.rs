use anyhow::{Context, Result};
use installs::Roster;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    /// Base URL of the dash-api server, e.g. "http://localhost:8080"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Simulated per-day delay when loading demo installs
    #[serde(default = "default_demo_latency_ms")]
    pub demo_latency_ms: u64,
    #[serde(default)]
    pub roster: Roster,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_demo_latency_ms() -> u64 {
    150
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            demo_latency_ms: default_demo_latency_ms(),
            roster: Roster::demo(),
        }
    }
}

impl DashConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("dash-cli")
            .join("config.toml"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }
}
