// WHY: Threshold overrides from a TOML file, layered between built-in defaults and CLI flags

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::detector::Thresholds;

/// Optional threshold values; anything left out keeps the lower layer's value
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdOverrides {
    pub cantonese_tolerance: Option<f64>,
    pub swc_tolerance: Option<f64>,
    pub cantonese_presence: Option<f64>,
    pub swc_presence: Option<f64>,
}

/// Layout of the config file: `[thresholds]` table, every key optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
}

impl ThresholdOverrides {
    /// Apply on top of `base`, then validate the result
    pub fn apply(&self, base: Thresholds) -> Result<Thresholds> {
        let merged = Thresholds {
            cantonese_tolerance: self.cantonese_tolerance.unwrap_or(base.cantonese_tolerance),
            swc_tolerance: self.swc_tolerance.unwrap_or(base.swc_tolerance),
            cantonese_presence: self.cantonese_presence.unwrap_or(base.cantonese_presence),
            swc_presence: self.swc_presence.unwrap_or(base.swc_presence),
        };
        merged.validate()?;
        Ok(merged)
    }
}

impl SettingsFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid settings file")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = Self::parse(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        info!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }
}

/// Defaults, then the optional settings file, then explicit flags
pub fn resolve_thresholds(
    file: Option<&SettingsFile>,
    flags: &ThresholdOverrides,
) -> Result<Thresholds> {
    let base = match file {
        Some(settings) => settings.thresholds.apply(Thresholds::default())?,
        None => Thresholds::default(),
    };
    flags.apply(base)
}
