use crate::error::LifeOsError;
use crate::lifeos::analytics::SystemState;
use crate::lifeos::entry::{Analysis, Entry};
use crate::lifeos::paths::LifeOsPaths;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOutcome {
    pub archive_bytes: usize,
    pub display_bytes: usize,
}

/// Front-end row: embeddings stripped, date rendered as `YYYY-MM-DD`.
#[derive(Debug, Serialize)]
struct DisplayRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mood: Option<f64>,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a Analysis>,
}

fn display_rows(entries: &[Entry]) -> Vec<DisplayRow<'_>> {
    entries
        .iter()
        .map(|entry| DisplayRow {
            id: entry.id.as_deref(),
            date: entry.date.map(|d| d.format("%Y-%m-%d").to_string()),
            content: &entry.content,
            mood: entry.mood,
            tags: &entry.tags,
            analysis: entry.analysis.as_ref(),
        })
        .collect()
}

/// Write `bytes` to `path` through a temp file in the same directory plus a
/// rename, so a crash mid-write never leaves a truncated artifact behind.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent directory for {}", path.display()))?;
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("failed to write temp file for {}", path.display()))?;
    tmp.persist(path)
        .map_err(|err| LifeOsError::SinkWrite(format!("{}: {err}", path.display())))?;
    Ok(())
}

/// Serialize the archive snapshot to both sinks. Each sink derives from the
/// same in-memory snapshot, never one from the other, so they cannot drift.
pub fn export_archive(paths: &LifeOsPaths, entries: &[Entry]) -> Result<ExportOutcome> {
    let full =
        rmp_serde::to_vec_named(entries).context("failed to encode full-fidelity archive")?;
    write_atomic(&paths.archive_file, &full)?;

    let display = serde_json::to_vec_pretty(&display_rows(entries))
        .context("failed to encode display archive")?;
    write_atomic(&paths.display_file, &display)?;

    Ok(ExportOutcome {
        archive_bytes: full.len(),
        display_bytes: display.len(),
    })
}

/// Persist the derived system state. Independent of the archive sinks: the
/// state is recomputable from the archive at any time.
pub fn export_state(paths: &LifeOsPaths, state: &SystemState) -> Result<()> {
    let json = serde_json::to_vec_pretty(state).context("failed to encode system state")?;
    write_atomic(&paths.state_file, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifeos::archive;
    use crate::lifeos::entry::ProjectData;
    use chrono::NaiveDate;
    use serde_json::Value;

    fn test_paths(root: &Path) -> LifeOsPaths {
        LifeOsPaths {
            lifeos_home: root.to_path_buf(),
            inbox_dir: root.join("inbox"),
            archive_dir: root.join("archive"),
            archive_file: root.join("archive/journal.bin"),
            display_file: root.join("archive/lifeos_db.json"),
            state_file: root.join("archive/system_state.json"),
            logs_dir: root.join("logs"),
            config_file: root.join("lifeos.toml"),
        }
    }

    fn sample_entries() -> Vec<Entry> {
        vec![
            Entry {
                id: Some("a".to_string()),
                date: NaiveDate::from_ymd_opt(2026, 1, 1),
                content: "first".to_string(),
                mood: Some(6.0),
                tags: vec!["#LifeOS".to_string()],
                analysis: Some(Analysis {
                    project_data: ProjectData {
                        signals: "s".to_string(),
                        ..ProjectData::default()
                    },
                    ..Analysis::default()
                }),
                embedding: Some(vec![0.1, 0.2, 0.3]),
            },
            Entry {
                id: Some("b".to_string()),
                date: None,
                content: "undated".to_string(),
                ..Entry::default()
            },
        ]
    }

    #[test]
    fn full_fidelity_sink_round_trips() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let paths = test_paths(tmp.path());
        let entries = sample_entries();

        export_archive(&paths, &entries).expect("export");
        let reloaded = archive::load(&paths.archive_file).expect("reload");
        assert_eq!(reloaded, entries);
    }

    #[test]
    fn display_sink_strips_embeddings_and_stringifies_dates() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let paths = test_paths(tmp.path());

        export_archive(&paths, &sample_entries()).expect("export");

        let raw = fs::read_to_string(&paths.display_file).expect("read display");
        assert!(!raw.contains("embedding"));

        let rows: Vec<Value> = serde_json::from_str(&raw).expect("parse display");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("date").and_then(Value::as_str), Some("2026-01-01"));
        // Undated rows omit the field rather than emitting a non-string.
        assert!(rows[1].get("date").is_none());
    }

    #[test]
    fn empty_archive_exports_empty_sinks() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let paths = test_paths(tmp.path());

        let outcome = export_archive(&paths, &[]).expect("export");
        assert!(outcome.archive_bytes > 0);
        let reloaded = archive::load(&paths.archive_file).expect("reload");
        assert!(reloaded.is_empty());

        let rows: Vec<Value> =
            serde_json::from_slice(&fs::read(&paths.display_file).expect("read")).expect("parse");
        assert!(rows.is_empty());
    }
}
