//! NORI CLI
//!
//! Command-line interface for the NORI analyzers

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;

#[derive(Parser)]
#[command(name = "nori")]
#[command(about = "Structural analyzers and automated fixes for CS source")]
#[command(version = nori_core::VERSION)]
#[command(
    long_about = "NORI detects simplifiable patterns in CS source and rewrites them.\n\
\n\
Examples:\n  \
nori check src/              # Report findings\n  \
nori fix src/                # Apply safe fixes in place\n  \
nori fix --dry-run src/      # Preview fixes as diffs\n  \
nori rules                   # List available rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (default: discovered .nori.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads (default: number of CPU cores)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze files and report diagnostics
    Check {
        /// Files or directories to analyze (default: current directory)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
    /// Apply automatic fixes
    Fix {
        /// Files or directories to fix (default: current directory)
        paths: Vec<PathBuf>,

        /// Show diffs without modifying files
        #[arg(long)]
        dry_run: bool,

        /// Also apply fixes classified as unsafe
        #[arg(long = "unsafe")]
        apply_unsafe: bool,
    },
    /// List available rules
    Rules,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Human,
    Json,
}

fn main() -> ExitCode {
    nori_core::init_tracing();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = match cli.command {
        Commands::Check { ref paths, format } => {
            commands::check(paths, cli.config.as_deref(), format, cli.threads, cli.no_color)
        }
        Commands::Fix {
            ref paths,
            dry_run,
            apply_unsafe,
        } => commands::fix(paths, cli.config.as_deref(), dry_run, apply_unsafe),
        Commands::Rules => commands::rules(cli.config.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
