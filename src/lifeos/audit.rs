use crate::lifeos::paths::LifeOsPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// One line per compaction pass in the run ledger. The archive hash lets a
/// later inspection confirm which artifact a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub at_epoch_secs: u64,
    pub new_records: usize,
    pub skipped_records: usize,
    pub degraded_records: usize,
    pub merged_entries: usize,
    pub swept_files: usize,
    pub mode: String,
    pub archive_sha256: String,
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

fn ledger_path(paths: &LifeOsPaths) -> PathBuf {
    paths.logs_dir.join("runs.jsonl")
}

pub fn append_run(paths: &LifeOsPaths, record: &RunRecord) -> Result<PathBuf> {
    fs::create_dir_all(&paths.logs_dir)
        .with_context(|| format!("failed to create {}", paths.logs_dir.display()))?;

    let line = format!("{}\n", serde_json::to_string(record)?);
    use std::io::Write;
    let path = ledger_path(paths);
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    file.write_all(line.as_bytes())?;
    Ok(path)
}
