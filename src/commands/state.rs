use anyhow::Result;

use crate::commands::CommandReport;
use crate::lifeos::analytics;
use crate::lifeos::archive;
use crate::lifeos::config::load_config;
use crate::lifeos::paths::resolve_paths;
use crate::lifeos::sink;

#[derive(Debug, Clone, Default)]
pub struct StateOptions {
    /// Persist the recomputed artifact in addition to printing it.
    pub write: bool,
}

pub fn run(opts: &StateOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config(&paths)?;
    let mut report = CommandReport::new("state");

    let entries = match archive::load(&paths.archive_file) {
        Ok(entries) => entries,
        Err(err) => {
            report.issue(format!("archive unreadable: {err:#}"));
            return Ok(report);
        }
    };

    let state = analytics::compute_state(&entries, &cfg.analytics);
    report.detail(format!("archive_entries={}", entries.len()));
    report.detail(format!("window_size={}", cfg.analytics.window_size));
    report.detail(serde_json::to_string_pretty(&state)?);

    if opts.write {
        sink::export_state(&paths, &state)?;
        report.detail(format!("state_file={}", paths.state_file.display()));
    }

    Ok(report)
}
