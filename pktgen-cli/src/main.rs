//! pktgen: packet code generator.
//!
//! # Usage
//!
//! ```text
//! pktgen [generate] [--config <path>] [--dry-run] [--json]
//! pktgen check
//! pktgen diff
//! pktgen list [--json]
//! pktgen init [dir] [--force]
//! ```

mod commands;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{
    check::CheckArgs, diff::DiffArgs, generate::GenerateArgs, init::InitArgs, list::ListArgs,
};
use pktgen_core::GeneratorConfig;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pktgen",
    version,
    about = "Generate packet ids, classes and handler stubs from a YAML schema",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Options for the implicit `generate` when no subcommand is given.
    #[command(flatten)]
    generate: GenerateArgs,

    /// Path to pktgen.yaml. Defaults to ./pktgen.yaml, or built-in defaults
    /// rooted at the current directory when that file does not exist.
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scaffold, merge and write every managed artifact.
    Generate(GenerateArgs),

    /// Load and validate the schema without touching any artifact.
    Check(CheckArgs),

    /// Show unified diff of what generate would write.
    Diff(DiffArgs),

    /// Print the packets declared in the schema.
    List(ListArgs),

    /// Write a default pktgen.yaml.
    Init(InitArgs),
}

/// Config from `--config`, else discovered in the current directory.
pub(crate) fn load_config(path: Option<&PathBuf>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::load_at(path)
            .with_context(|| format!("failed to load config '{}'", path.display())),
        None => {
            let cwd = std::env::current_dir().context("could not determine current directory")?;
            GeneratorConfig::discover_at(&cwd).context("failed to load pktgen.yaml")
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_ref();
    match cli.command {
        None => cli.generate.run(config),
        Some(Commands::Generate(args)) => args.run(config),
        Some(Commands::Check(args)) => args.run(config),
        Some(Commands::Diff(args)) => args.run(config),
        Some(Commands::List(args)) => args.run(config),
        Some(Commands::Init(args)) => args.run(),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(cli) {
        println!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
