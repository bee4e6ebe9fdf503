use anyhow::Result;
use std::env;

use crate::commands::CommandReport;
use crate::commands::status;
use crate::lifeos::config::load_config;
use crate::lifeos::paths::resolve_paths;

include!(concat!(env!("OUT_DIR"), "/lifeos_env_allowlist.rs"));

pub fn run() -> Result<CommandReport> {
    let mut report = CommandReport::new("verify");
    report.detail(format!("build_id={}", env!("BUILD_UUID")));

    let paths = resolve_paths()?;
    match load_config(&paths) {
        Ok(cfg) => report.detail(format!(
            "config: ok (window_size={})",
            cfg.analytics.window_size
        )),
        Err(err) => report.issue(format!("config invalid: {err:#}")),
    }

    // Catch typoed overrides: every LIFEOS_* variable must be one the binary
    // actually reads.
    for (key, _) in env::vars() {
        if !key.starts_with("LIFEOS_") {
            continue;
        }
        if !GENERATED_LIFEOS_ENV_ALLOWLIST.contains(&key.as_str()) {
            report.issue(format!("unrecognized env var {key} (typo?)"));
        }
    }

    report.merge(status::run()?);

    Ok(report)
}
