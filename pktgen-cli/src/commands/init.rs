//! `pktgen init [dir]`: write a default pktgen.yaml.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use pktgen_core::{GeneratorConfig, CONFIG_FILE_NAME};

/// Arguments for `pktgen init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write pktgen.yaml into.
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing pktgen.yaml.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE_NAME);
        if path.exists() && !self.force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("cannot create '{}'", self.dir.display()))?;
        let yaml = GeneratorConfig::with_base_dir(&self.dir)
            .to_yaml()
            .context("failed to serialize default config")?;
        std::fs::write(&path, yaml)
            .with_context(|| format!("cannot write '{}'", path.display()))?;

        println!("{} Wrote {}", "✓".green(), path.display());
        println!("  Run `pktgen` in that directory to scaffold and generate.");
        Ok(())
    }
}
