use crate::error::LifeOsError;
use crate::lifeos::entry::Entry;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Fold `incoming` into `base` and return the new canonical archive:
/// deduplicated, ascending by date. Neither input is mutated, so callers can
/// retry with the originals after a failed pass.
///
/// Dedup key: entry id when every combined entry carries a non-empty id,
/// otherwise the entry date (undated entries share the sentinel key). Within
/// a key, last write wins: incoming is appended after base, so a re-submitted
/// correction supersedes the stale row.
pub fn merge(base: &[Entry], incoming: &[Entry]) -> Vec<Entry> {
    if base.is_empty() && incoming.is_empty() {
        return Vec::new();
    }

    let key_by_id = base.iter().chain(incoming.iter()).all(Entry::has_id);

    let mut first_seen: Vec<String> = Vec::new();
    let mut by_key: BTreeMap<String, Entry> = BTreeMap::new();
    for entry in base.iter().chain(incoming.iter()) {
        let key = if key_by_id {
            entry.id.clone().unwrap_or_default()
        } else {
            entry.sort_date().to_string()
        };
        if by_key.insert(key.clone(), entry.clone()).is_none() {
            first_seen.push(key);
        }
    }

    let mut merged: Vec<Entry> = first_seen
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect();
    // Stable sort: undated entries (sentinel date) group first, ties keep
    // first-seen order.
    merged.sort_by_key(Entry::sort_date);
    merged
}

/// Load the full-fidelity archive artifact. A missing file is an empty
/// archive (first run); a present-but-undecodable file is an error the
/// caller decides how to handle.
pub fn load(path: &Path) -> Result<Vec<Entry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let entries: Vec<Entry> = rmp_serde::from_slice(&raw)
        .map_err(|err| LifeOsError::CorruptArchive(format!("{}: {err}", path.display())))?;
    Ok(entries)
}
