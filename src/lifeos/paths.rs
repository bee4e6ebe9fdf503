use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LifeOsPaths {
    pub lifeos_home: PathBuf,
    pub inbox_dir: PathBuf,
    pub archive_dir: PathBuf,
    /// Full-fidelity binary archive artifact (embeddings included).
    pub archive_file: PathBuf,
    /// Display archive artifact for the front-end (embeddings stripped).
    pub display_file: PathBuf,
    /// Derived system-state artifact.
    pub state_file: PathBuf,
    pub logs_dir: PathBuf,
    pub config_file: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<LifeOsPaths> {
    let home = required_home_dir()?;
    let lifeos_home = env_or_default_path("LIFEOS_HOME", home.join("LifeOS"));

    let inbox_dir = env_or_default_path("LIFEOS_INBOX_DIR", lifeos_home.join("inbox"));
    let archive_dir = env_or_default_path("LIFEOS_ARCHIVE_DIR", lifeos_home.join("archive"));
    let archive_file = archive_dir.join("journal.bin");
    let display_file = archive_dir.join("lifeos_db.json");
    let state_file = archive_dir.join("system_state.json");
    let logs_dir = env_or_default_path("LIFEOS_LOGS_DIR", lifeos_home.join("logs"));
    let config_file = env_or_default_path("LIFEOS_CONFIG_PATH", lifeos_home.join("lifeos.toml"));

    Ok(LifeOsPaths {
        lifeos_home,
        inbox_dir,
        archive_dir,
        archive_file,
        display_file,
        state_file,
        logs_dir,
        config_file,
    })
}
