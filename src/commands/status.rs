use anyhow::Result;

use crate::commands::CommandReport;
use crate::lifeos::inbox;
use crate::lifeos::paths::resolve_paths;

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("lifeos_home={}", paths.lifeos_home.display()));
    report.detail(format!("inbox_dir={}", paths.inbox_dir.display()));
    report.detail(format!("archive_dir={}", paths.archive_dir.display()));
    report.detail(format!("archive_file={}", paths.archive_file.display()));
    report.detail(format!("display_file={}", paths.display_file.display()));
    report.detail(format!("state_file={}", paths.state_file.display()));
    report.detail(format!("logs_dir={}", paths.logs_dir.display()));
    report.detail(format!("config_file={}", paths.config_file.display()));

    if paths.inbox_dir.exists() {
        let scan = inbox::scan(&paths)?;
        report.detail(format!("pending_records={}", scan.records.len()));
        if scan.skipped > 0 {
            report.issue(format!(
                "{} inbox records cannot be decoded and will never compact",
                scan.skipped
            ));
        }
    } else {
        report.detail("inbox dir does not exist yet (nothing pending)");
    }

    report.detail(format!("archive_present={}", paths.archive_file.exists()));
    report.detail(format!("display_present={}", paths.display_file.exists()));
    report.detail(format!("state_present={}", paths.state_file.exists()));

    if paths.display_file.exists() && !paths.archive_file.exists() {
        report.issue("display sink exists without the full-fidelity archive; re-run compact");
    }

    Ok(report)
}
