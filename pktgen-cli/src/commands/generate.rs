//! `pktgen generate`: scaffold, merge and write every managed artifact.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use pktgen_sync::{run, RunReport, WriteResult};

/// Arguments for `pktgen generate` (also accepted with no subcommand).
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Show what would be written without writing, scaffolding or publishing.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    pub fn run(self, config: Option<&PathBuf>) -> Result<()> {
        let config = crate::load_config(config)?;
        tracing::debug!("schema: {}", config.schema_path().display());
        tracing::debug!("target: {}", config.target_dir().display());

        let report = run(&config, self.dry_run).context("code generation failed")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize run report")?
            );
            return Ok(());
        }

        print_report(&report);
        Ok(())
    }
}

fn marker(result: &WriteResult) -> &'static str {
    match result {
        WriteResult::Written { .. } => "✎",
        WriteResult::WouldWrite { .. } => "~",
        WriteResult::Unchanged { .. } => "·",
    }
}

fn print_report(report: &RunReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };

    for path in &report.scaffolded {
        println!("  {}  {}", "+".green(), path.display());
    }

    let changed = report.artifacts.iter().filter(|a| a.result.is_change()).count();
    println!(
        "{prefix}{} packets, {} changed, {} unchanged",
        report.packets,
        changed,
        report.artifacts.len() - changed
    );
    for artifact in &report.artifacts {
        let inserted = if artifact.inserted > 0 {
            format!(" (+{} handler)", artifact.inserted)
        } else {
            String::new()
        };
        println!(
            "  {}  {}{}",
            marker(&artifact.result),
            artifact.result.path().display(),
            inserted.bright_black()
        );
    }

    if !report.published.is_empty() {
        println!("{prefix}published:");
        for result in &report.published {
            println!("  {}  {}", marker(result), result.path().display());
        }
    }

    if report.dry_run {
        println!("{prefix}no files written");
    } else {
        println!("{}", "Code generated successfully".green());
    }
}
