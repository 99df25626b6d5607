//! `pktgen check`: validate the schema only.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use pktgen_sync::load_checked;

/// Arguments for `pktgen check`.
#[derive(Args, Debug)]
pub struct CheckArgs {}

impl CheckArgs {
    pub fn run(self, config: Option<&PathBuf>) -> Result<()> {
        let config = crate::load_config(config)?;
        let path = config.schema_path();
        let schema = load_checked(&config)
            .with_context(|| format!("schema check failed for '{}'", path.display()))?;

        println!(
            "{} {} ({} packets)",
            "✓".green(),
            path.display(),
            schema.len()
        );
        Ok(())
    }
}
