//! `rw` - figure captions and numbering for rendered documents.
//!
//! Commands:
//! - `captions`: bind caption blocks and number figures in an XHTML document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::CaptionsArgs;
use output::Output;

/// RW - figure captions and numbering.
#[derive(Parser)]
#[command(name = "rw", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind caption blocks and number figures.
    Captions(CaptionsArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Captions(args) => args.verbose,
        }
    }
}

fn init_tracing(verbose: bool) {
    // --verbose forces info; otherwise RUST_LOG decides (warn by default)
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.command.verbose());

    let result = match cli.command {
        Commands::Captions(args) => args.execute(),
    };

    if let Err(err) = result {
        Output::new().failure(&err);
        std::process::exit(1);
    }
}
