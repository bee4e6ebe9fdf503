use crate::lifeos::paths::LifeOsPaths;
use crate::lifeos::warn;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// One pending source record: the decoded payload plus the file it came from,
/// kept so the sweeper knows exactly what was folded in.
#[derive(Debug, Clone)]
pub struct PendingRecord {
    pub path: PathBuf,
    pub value: Value,
}

#[derive(Debug, Clone, Default)]
pub struct InboxScan {
    pub records: Vec<PendingRecord>,
    /// Files that failed to read or decode. They stay in the inbox and are
    /// retried on the next run.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOutcome {
    pub removed_files: usize,
    pub failed_removals: usize,
}

/// Collect the pending `*.json` records. Discovery order is not guaranteed by
/// the filesystem, so the listing is sorted for deterministic processing.
pub fn scan(paths: &LifeOsPaths) -> Result<InboxScan> {
    let dir = &paths.inbox_dir;
    let mut out = InboxScan::default();
    if !dir.exists() {
        return Ok(out);
    }

    let mut files: Vec<PathBuf> = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|v| v.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();

    for file in files {
        let source = file.display().to_string();
        let raw = match fs::read_to_string(&file) {
            Ok(raw) => raw,
            Err(err) => {
                warn::emit(
                    "RECORD_READ_FAILED",
                    "inbox-scan",
                    &source,
                    "retry-next-run",
                    "unreadable-source-file",
                    &err.to_string(),
                );
                out.skipped += 1;
                continue;
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => out.records.push(PendingRecord { path: file, value }),
            Err(err) => {
                warn::emit(
                    "RECORD_DECODE_FAILED",
                    "inbox-scan",
                    &source,
                    "retry-next-run",
                    "invalid-json",
                    &err.to_string(),
                );
                out.skipped += 1;
            }
        }
    }

    Ok(out)
}

/// Delete the source files that were folded into the archive. Runs strictly
/// after both sinks are durably written; a failed removal warns and leaves the
/// file for the next pass, which is harmless because the merge deduplicates.
pub fn sweep(records: &[PendingRecord]) -> SweepOutcome {
    let mut out = SweepOutcome::default();
    for record in records {
        // Ingestion writes a markdown twin next to each sidecar record.
        let markdown_twin = record.path.with_extension("md");
        for path in [&record.path, &markdown_twin] {
            if !path.exists() {
                continue;
            }
            match fs::remove_file(path) {
                Ok(_) => out.removed_files += 1,
                Err(err) => {
                    out.failed_removals += 1;
                    warn::emit(
                        "SWEEP_FAILED",
                        "inbox-sweep",
                        &path.display().to_string(),
                        "retry-next-run",
                        "remove-failed",
                        &err.to_string(),
                    );
                }
            }
        }
    }
    out
}
