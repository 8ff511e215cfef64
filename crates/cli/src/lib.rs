//! Terminal shell for the assignee picker.
//!
//! Loads a candidate pool snapshot from JSON and either prints one
//! computation (`--query`) or runs a line-oriented session on stdin.

use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use picker_candidates::{CandidatePools, PickerConfig};
use std::path::PathBuf;

mod render;
mod shell;

pub use render::render_text;
pub use shell::{run_interactive, run_once, ShellInput};

#[derive(Parser)]
#[command(name = "picker")]
#[command(about = "Pick an assignee from conversations and contacts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Candidate pool snapshot (JSON)
    #[arg(long)]
    pools: PathBuf,

    /// Picker configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the options for this query and exit
    #[arg(long)]
    query: Option<String>,

    /// Emit session snapshots as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || cli.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = match &cli.config {
        Some(path) => PickerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PickerConfig::default(),
    };
    let pools = CandidatePools::from_json_file(&cli.pools)
        .with_context(|| format!("failed to load pools {}", cli.pools.display()))?;

    match cli.query.as_deref() {
        Some(query) => {
            let snapshot = run_once(pools, config, query);
            shell::print_snapshot(&snapshot, cli.json)
        }
        None => run_interactive(pools, config, cli.json).await,
    }
}
