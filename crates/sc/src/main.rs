//! SC CLI - Shortcode expansion.
//!
//! Provides commands for:
//! - `expand`: Expand shortcodes in a file or stdin
//! - `list`: List the available shortcodes

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExpandArgs, ListArgs};
use output::Output;

/// SC - Bracket shortcode expansion.
#[derive(Parser)]
#[command(name = "sc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand shortcodes in a file or stdin and write the result to stdout.
    Expand(ExpandArgs),
    /// List available shortcodes, shadowed duplicates included.
    List(ListArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Expand(args) => args.registry.verbose,
        Commands::List(args) => args.registry.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG (default: errors only)
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Expand(args) => args.execute(&output),
        Commands::List(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
