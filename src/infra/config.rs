// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::AuditPopError;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "auditpop.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub flow: FlowConfig,

    #[serde(default)]
    pub studio: StudioConfig,

    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Timing for the simulated analysis pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Milliseconds between progress ticks.
    pub tick_ms: u64,
    /// Progress added per tick (progress runs 0–100).
    pub step: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { tick_ms: 30, step: 2 }
    }
}

/// Timing for the post-scan action flows (auto-fix, nuke, lockdown, export).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Delay before an auto-fix lands, in milliseconds.
    pub resolve_delay_ms: u64,
    pub nuke_tick_ms: u64,
    pub nuke_step: u8,
    /// Lockdown runs slightly faster than a single nuke.
    pub lockdown_tick_ms: u64,
    pub lockdown_step: u8,
    /// Simulated export compile time, in milliseconds.
    pub export_delay_ms: u64,
    /// How long the "Download Ready!" toast stays up.
    pub toast_ms: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            resolve_delay_ms: 2000,
            nuke_tick_ms: 20,
            nuke_step: 1,
            lockdown_tick_ms: 25,
            lockdown_step: 2,
            export_delay_ms: 2000,
            toast_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Target platform preset: "youtube", "spotify", or "general".
    pub platform: String,
    /// Fixed RNG seed for reproducible demo runs. Entropy-seeded when unset.
    pub seed: Option<u64>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            platform: "general".into(),
            seed: None,
        }
    }
}

/// Canned identity shown on the creator-hub tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    pub role: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "Jordan Reyes".into(),
            role: "Podcast Host".into(),
        }
    }
}

impl Config {
    /// Load config from `./auditpop.toml`, falling back to defaults.
    pub fn load() -> Result<Self, AuditPopError> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, AuditPopError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| AuditPopError::ConfigParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(config)
    }
}
