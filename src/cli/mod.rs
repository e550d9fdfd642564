//! Command-line interface for mesh-recon
//!
//! Provides `report` and `dupes` subcommands plus shell completion
//! generation.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod dupes;
mod report;

/// Track CAD reconstruction progress of mesh file trees
#[derive(Parser)]
#[command(name = "mesh-recon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile reference trees against their design counterparts
    Report(report::ReportArgs),

    /// List identical mesh files by content hash
    Dupes(dupes::DupesArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Report(args) => report::run(args),
        Commands::Dupes(args) => dupes::run(args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "mesh-recon", &mut std::io::stdout());
            Ok(())
        }
    }
}
