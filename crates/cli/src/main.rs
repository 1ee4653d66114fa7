//! DDD Catalog CLI - Command-line interface for the catalog builder
//!
//! Usage:
//!   ddd-catalog build <input>             - Build the catalog and print a summary
//!   ddd-catalog check <input>             - Report diagnostics, fail on the configured severity
//!   ddd-catalog show <input> --kind <k>   - Query records
//!   ddd-catalog kinds                     - List pattern kinds
//!
//! `<input>` is a marker file, a directory of marker files, or a glob pattern.

use clap::{Parser, Subcommand};
use cli::commands::{BuildCommand, CheckCommand, KindsCommand, RunContext, ShowCommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ddd-catalog")]
#[command(about = "Build a validated catalog of DDD pattern markers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the catalog and print a summary
    Build(BuildCommand),
    /// Report diagnostics and fail on the configured severity
    Check(CheckCommand),
    /// Query catalog records
    Show(ShowCommand),
    /// List the known pattern kinds
    Kinds(KindsCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (stderr keeps JSON output clean)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = RunContext::load(cli.config.as_deref(), cli.json)?;

    match cli.command {
        Commands::Build(cmd) => cmd.run(&ctx),
        Commands::Check(cmd) => cmd.run(&ctx),
        Commands::Show(cmd) => cmd.run(&ctx),
        Commands::Kinds(cmd) => cmd.run(&ctx),
    }
}
