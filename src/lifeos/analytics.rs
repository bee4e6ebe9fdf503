use crate::lifeos::config::AnalyticsConfig;
use crate::lifeos::entry::{BaselineSafety, EnergyStability, Entry};
use crate::lifeos::util::truncate_chars;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A tag becomes an active project once it appears this many times inside the
/// recent window.
pub const ACTIVE_TAG_THRESHOLD: usize = 3;

/// The throttle scans only the most recent entries. Deliberately much smaller
/// than the tag/idea window: safety signals must react to the last day or two,
/// while project trends need a longer baseline to shake out noise.
pub const SAFETY_WINDOW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "BUILD")]
    Build,
    #[serde(rename = "MAINTENANCE")]
    Maintenance,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Build => write!(f, "BUILD"),
            Mode::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub mode: Mode,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaSeed {
    pub date: String,
    pub core_concept: String,
}

/// Derived view over the archive. Never persisted as state of record: it is a
/// pure function of the archive contents and fully recomputable at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub active_projects: Vec<String>,
    pub idea_seeds: Vec<IdeaSeed>,
    pub system_status: SystemStatus,
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            active_projects: Vec::new(),
            idea_seeds: Vec::new(),
            system_status: SystemStatus {
                mode: Mode::Build,
                reason: "No Data".to_string(),
            },
        }
    }
}

/// Tags resolve from the annotation first; the entry-level field is the
/// fallback when the annotation has none.
fn entry_tags(entry: &Entry) -> &[String] {
    if let Some(analysis) = &entry.analysis
        && !analysis.tags.is_empty()
    {
        return &analysis.tags;
    }
    &entry.tags
}

fn active_projects(recent: &[&Entry]) -> Vec<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    for entry in recent {
        for raw in entry_tags(entry) {
            let tag = raw.trim_start_matches('#');
            if tag.is_empty() {
                continue;
            }
            if !counts.contains_key(tag) {
                first_seen.push(tag.to_string());
            }
            *counts.entry(tag.to_string()).or_insert(0) += 1;
        }
    }

    // Output in first-seen order over the window, so the result is stable for
    // a given archive snapshot.
    first_seen
        .into_iter()
        .filter(|tag| counts[tag] >= ACTIVE_TAG_THRESHOLD)
        .collect()
}

fn idea_seeds(recent: &[&Entry]) -> Vec<IdeaSeed> {
    let mut out = Vec::new();
    for entry in recent {
        let Some(analysis) = &entry.analysis else {
            continue;
        };
        let project = &analysis.project_data;
        // An idea surfaces only when the entry records an observation, an
        // unresolved question and an open thought at the same time.
        if project.signals.is_empty()
            || project.blind_spots.is_empty()
            || project.open_nodes.is_empty()
        {
            continue;
        }
        out.push(IdeaSeed {
            date: entry.display_date(),
            core_concept: format!(
                "{}... + {}...",
                truncate_chars(&project.signals, 20),
                truncate_chars(&project.open_nodes, 20)
            ),
        });
    }
    out
}

fn throttle_status(sorted_desc: &[&Entry]) -> SystemStatus {
    for entry in sorted_desc.iter().take(SAFETY_WINDOW) {
        let Some(analysis) = &entry.analysis else {
            continue;
        };
        let life = &analysis.life_data;
        let intervene = life.baseline_safety == Some(BaselineSafety::Intervene);
        let depleted = life.energy_stability == Some(EnergyStability::Low);
        // First hit in descending order wins; an older trigger never
        // overrides a more recent one.
        if intervene || depleted {
            return SystemStatus {
                mode: Mode::Maintenance,
                reason: format!("Safety Protocol Triggered on {}", entry.display_date()),
            };
        }
    }

    SystemStatus {
        mode: Mode::Build,
        reason: "All Systems Nominal".to_string(),
    }
}

/// Compute the derived system state from the archive. Pure: no hidden memory,
/// no side effects. The input does not have to be sorted.
pub fn compute_state(archive: &[Entry], cfg: &AnalyticsConfig) -> SystemState {
    if archive.is_empty() {
        return SystemState::default();
    }

    let mut sorted: Vec<&Entry> = archive.iter().collect();
    sorted.sort_by(|a, b| b.sort_date().cmp(&a.sort_date()));
    let recent = &sorted[..sorted.len().min(cfg.window_size)];

    SystemState {
        active_projects: active_projects(recent),
        idea_seeds: idea_seeds(recent),
        system_status: throttle_status(&sorted),
    }
}
