use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::commands::CommandReport;

#[derive(Debug, Parser)]
#[command(
    name = "lifeos",
    version,
    about = "LifeOS journal compaction pipeline"
)]
struct Cli {
    /// Emit the command report as JSON instead of plain lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fold pending inbox records into the archive, refresh system state and
    /// sweep the folded sources.
    Compact {
        /// Plan the pass without writing sinks or sweeping the inbox.
        #[arg(long)]
        dry_run: bool,
    },
    /// Recompute system state from the current archive without merging.
    State {
        /// Also persist the recomputed state artifact.
        #[arg(long)]
        write: bool,
    },
    /// Report pipeline paths and artifact health.
    Status,
    /// Strict environment and configuration check.
    Verify,
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    for detail in &report.details {
        println!("{detail}");
    }
    for issue in &report.issues {
        eprintln!("issue: {issue}");
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let report = match &cli.command {
        Command::Compact { dry_run } => commands::compact::run(&commands::compact::CompactOptions {
            dry_run: *dry_run,
        })?,
        Command::State { write } => {
            commands::state::run(&commands::state::StateOptions { write: *write })?
        }
        Command::Status => commands::status::run()?,
        Command::Verify => commands::verify::run()?,
    };

    print_report(&report, cli.json)?;
    if !report.ok {
        std::process::exit(1);
    }
    Ok(())
}
