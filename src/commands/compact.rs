use anyhow::Result;

use crate::commands::CommandReport;
use crate::lifeos::archive;
use crate::lifeos::audit::{self, RunRecord};
use crate::lifeos::config::load_config;
use crate::lifeos::entry::{Entry, normalize};
use crate::lifeos::inbox;
use crate::lifeos::paths::resolve_paths;
use crate::lifeos::sink;
use crate::lifeos::util::now_epoch_secs;
use crate::lifeos::warn;
use crate::lifeos::{analytics, paths::LifeOsPaths};

#[derive(Debug, Clone, Default)]
pub struct CompactOptions {
    pub dry_run: bool,
}

fn load_base(paths: &LifeOsPaths, report: &mut CommandReport) -> Vec<Entry> {
    match archive::load(&paths.archive_file) {
        Ok(entries) => entries,
        // An undecodable base mirrors first-run semantics: warn loudly and
        // start fresh rather than blocking every future pass.
        Err(err) => {
            warn::emit(
                "ARCHIVE_UNREADABLE",
                "load-base",
                &paths.archive_file.display().to_string(),
                "none",
                "starting-fresh",
                &format!("{err:#}"),
            );
            report.detail("base archive unreadable, starting fresh");
            Vec::new()
        }
    }
}

pub fn run(opts: &CompactOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config(&paths)?;
    let mut report = CommandReport::new("compact");

    report.detail(format!("inbox_dir={}", paths.inbox_dir.display()));
    report.detail(format!("archive_file={}", paths.archive_file.display()));

    let scan = inbox::scan(&paths)?;
    if scan.records.is_empty() && scan.skipped == 0 {
        report.detail("no pending records to compact");
        return Ok(report);
    }

    let base = load_base(&paths, &mut report);

    let mut degraded = 0usize;
    let mut incoming = Vec::with_capacity(scan.records.len());
    for record in &scan.records {
        let normalized = normalize(&record.value);
        if normalized.degraded {
            degraded += 1;
            warn::emit(
                "RECORD_DEGRADED",
                "normalize",
                &record.path.display().to_string(),
                "none",
                "defaulted-malformed-fields",
                "",
            );
        }
        incoming.push(normalized.entry);
    }

    let merged = archive::merge(&base, &incoming);
    let state = analytics::compute_state(&merged, &cfg.analytics);

    report.detail(format!("pending_records={}", scan.records.len()));
    report.detail(format!("skipped_records={}", scan.skipped));
    report.detail(format!("degraded_records={degraded}"));
    report.detail(format!("base_entries={}", base.len()));
    report.detail(format!("merged_entries={}", merged.len()));
    report.detail(format!("mode={}", state.system_status.mode));

    if opts.dry_run {
        report.detail("dry-run: sinks not written, inbox not swept");
        return Ok(report);
    }

    // Any sink failure aborts here: nothing has been swept yet, the previous
    // artifacts are still intact, and the whole pass can simply be re-run.
    let export = sink::export_archive(&paths, &merged)?;
    sink::export_state(&paths, &state)?;
    report.detail(format!("archive_bytes={}", export.archive_bytes));
    report.detail(format!("display_bytes={}", export.display_bytes));
    report.detail(format!("state_file={}", paths.state_file.display()));

    let swept = inbox::sweep(&scan.records);
    report.detail(format!("swept_files={}", swept.removed_files));
    if swept.failed_removals > 0 {
        report.detail(format!(
            "failed_removals={} (retried next run)",
            swept.failed_removals
        ));
    }

    let run = RunRecord {
        at_epoch_secs: now_epoch_secs()?,
        new_records: scan.records.len(),
        skipped_records: scan.skipped,
        degraded_records: degraded,
        merged_entries: merged.len(),
        swept_files: swept.removed_files,
        mode: state.system_status.mode.to_string(),
        archive_sha256: audit::file_sha256(&paths.archive_file)?,
    };
    let ledger = audit::append_run(&paths, &run)?;
    report.detail(format!("run_ledger={}", ledger.display()));

    Ok(report)
}
