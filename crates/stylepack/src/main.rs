//! Stylepack CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "stylepack")]
#[command(version)]
#[command(about = "CSS build tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the dist directory from the CSS sources
    Build {
        /// Path to the config file (defaults to stylepack.toml if present)
        #[arg(short, long)]
        config: Option<String>,

        /// Source directory (overrides the config)
        #[arg(long)]
        src_dir: Option<String>,

        /// Output directory (overrides the config)
        #[arg(long)]
        dist_dir: Option<String>,

        /// Skip writing .min.css copies
        #[arg(long)]
        no_minify: bool,
    },

    /// Purge the jsDelivr CDN cache for the published dist files
    Purge {
        /// Path to the config file (defaults to stylepack.toml if present)
        #[arg(short, long)]
        config: Option<String>,

        /// GitHub repository (owner/name or URL, overrides the config)
        #[arg(long)]
        repository: Option<String>,

        /// Published version to purge alongside the latest ref
        #[arg(long)]
        version: Option<String>,

        /// Dist directory holding the files to purge
        #[arg(long)]
        dist_dir: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stylepack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            src_dir,
            dist_dir,
            no_minify,
        } => commands::build::execute(commands::build::BuildArgs {
            config,
            src_dir,
            dist_dir,
            no_minify,
        }),
        Commands::Purge {
            config,
            repository,
            version,
            dist_dir,
        } => commands::purge::execute(commands::purge::PurgeArgs {
            config,
            repository,
            version,
            dist_dir,
        }),
    }
}
