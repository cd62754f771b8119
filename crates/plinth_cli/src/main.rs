//! Plinth CLI
//!
//! Resolves the storage backend for an installation the same way the
//! application does at startup, and reports the result.
//!
//! # Commands
//!
//! - `resolve` - Run discovery, selection, and startup; print the chosen backend
//! - `modules` - List installed backend modules without selecting one
//! - `version` - Show version information
//!
//! # Providers
//!
//! The binary links in only the built-in provider (`plinth.embedded`). A
//! `.plugin` file that names any other provider id is reported as
//! `unknown provider` by `modules` and makes `resolve` fail. A program that
//! ships its own backends resolves them by building its context with
//! `ProcessContext::builder().loader(ManifestLoader::new(providers))`, where
//! `providers` registers each backend factory under its id.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use plinth_core::ContextOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Plinth storage backend tools.
#[derive(Parser)]
#[command(name = "plinth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing backend modules (*.plugin)
    #[arg(global = true, long, default_value = "plugin")]
    plugin_dir: PathBuf,

    /// Backend configuration file
    #[arg(global = true, short, long, default_value = "config.json")]
    config: PathBuf,

    /// Always use the embedded in-memory backend
    #[arg(global = true, long)]
    force_in_memory: bool,

    /// Use the installed backend even if it reports it cannot be used
    #[arg(global = true, long, conflicts_with = "force_in_memory")]
    force_no_in_memory: bool,

    /// Use the embedded backend when no module is installed
    #[arg(global = true, long)]
    fallback_on_empty: bool,

    /// Suppress backend console output
    #[arg(global = true, short, long)]
    silent: bool,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable text.
    Text,
    /// JSON.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and initialize the storage backend
    Resolve {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// List installed backend modules
    Modules {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn options(&self) -> ContextOptions {
        ContextOptions::new()
            .force_embedded(self.force_in_memory)
            .force_external(self.force_no_in_memory)
            .fallback_on_empty(self.fallback_on_empty)
            .silent(self.silent)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.silent {
        EnvFilter::new("warn")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = cli.options();
    let result = match cli.command {
        Commands::Resolve { format } => {
            commands::resolve::run(&cli.plugin_dir, &cli.config, options, format)
        }
        Commands::Modules { format } => commands::modules::run(&cli.plugin_dir, format),
        Commands::Version => {
            println!("Plinth CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Plinth Core v{}", plinth_core::VERSION);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
