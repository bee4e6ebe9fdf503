use crate::error::LifeOsError;
use crate::lifeos::paths::LifeOsPaths;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Recent-window size for the tag and idea passes. The throttle window is
    /// a separate, fixed constant on purpose.
    pub window_size: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self { window_size: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LifeOsConfig {
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialLifeOsConfig {
    analytics: Option<AnalyticsConfig>,
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    match env::var(var) {
        Ok(v) => v.trim().parse::<usize>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn validate(cfg: &LifeOsConfig) -> Result<()> {
    if cfg.analytics.window_size == 0 {
        return Err(LifeOsError::InvalidConfig(
            "analytics window size must be >= 1".to_string(),
        )
        .into());
    }
    Ok(())
}

fn merge_file_config(paths: &LifeOsPaths, base: &mut LifeOsConfig) -> Result<()> {
    let path = &paths.config_file;
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(path)?;
    let parsed: PartialLifeOsConfig = toml::from_str(&raw).map_err(|err| {
        LifeOsError::InvalidConfig(format!("{}: {err}", path.display()))
    })?;
    if let Some(analytics) = parsed.analytics {
        base.analytics = analytics;
    }
    Ok(())
}

/// Build the explicit configuration object handed to every component:
/// defaults, then the TOML file, then env-var overrides, then validation.
/// No module-level mutable state anywhere.
pub fn load_config(paths: &LifeOsPaths) -> Result<LifeOsConfig> {
    let mut cfg = LifeOsConfig::default();
    merge_file_config(paths, &mut cfg)?;

    cfg.analytics.window_size = env_or_usize("LIFEOS_WINDOW_SIZE", cfg.analytics.window_size);

    validate(&cfg)?;
    Ok(cfg)
}
