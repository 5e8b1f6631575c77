//! Weave CLI - Command-line interface for Weave
//!
//! Merges graph documents produced by independent plugins and inspects the
//! result.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weave_graph::IntegrityPolicy;

mod commands;
mod config;

use config::PolicyKind;

#[derive(Parser)]
#[command(name = "weave")]
#[command(author = "Weave Contributors")]
#[command(version)]
#[command(about = "Combine plugin graphs into one consolidated graph", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Weave in a directory
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Merge graph documents, later files after earlier ones
    Merge {
        /// Graph JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Conflict policy (overrides config)
        #[arg(short, long, value_enum)]
        policy: Option<PolicyKind>,

        /// Dangling edge handling (overrides config)
        #[arg(long, value_parser = parse_integrity)]
        integrity: Option<IntegrityPolicy>,

        /// Also save the result as a named snapshot
        #[arg(long)]
        snapshot: Option<String>,
    },

    /// Report edges whose endpoints are missing
    Check {
        /// Graph JSON file
        file: PathBuf,
    },

    /// Show node and edge counts per plugin
    Stats {
        /// Graph JSON file
        file: Option<PathBuf>,

        /// Read a stored snapshot instead of a file
        #[arg(long, conflicts_with = "file")]
        snapshot: Option<String>,
    },

    /// Print the token for an identifier
    Encode {
        plugin: String,
        source: String,
        local: String,
    },

    /// Split a token into its parts
    Decode { token: String },
}

fn parse_integrity(s: &str) -> Result<IntegrityPolicy, String> {
    match s {
        "ignore" => Ok(IntegrityPolicy::Ignore),
        "warn" => Ok(IntegrityPolicy::Warn),
        "reject" => Ok(IntegrityPolicy::Reject),
        other => Err(format!(
            "unknown integrity mode {:?} (expected ignore, warn or reject)",
            other
        )),
    }
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let root = PathBuf::from(".");

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Merge {
            files,
            output,
            policy,
            integrity,
            snapshot,
        } => commands::merge(
            &root,
            commands::MergeArgs {
                files,
                output,
                policy,
                integrity,
                snapshot,
            },
        ),
        Commands::Check { file } => commands::check(&file),
        Commands::Stats { file, snapshot } => {
            commands::stats(&root, file.as_deref(), snapshot.as_deref())
        }
        Commands::Encode {
            plugin,
            source,
            local,
        } => commands::encode_id(&plugin, &source, &local),
        Commands::Decode { token } => commands::decode_token(&token),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
