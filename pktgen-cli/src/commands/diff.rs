//! `pktgen diff`: show unified diffs for what generate would write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pktgen_sync::diff_at;

/// Arguments for `pktgen diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {}

impl DiffArgs {
    pub fn run(self, config: Option<&PathBuf>) -> Result<()> {
        let config = crate::load_config(config)?;
        let diffs = diff_at(&config).context("diff failed")?;

        if diffs.is_empty() {
            println!("No differences.");
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
