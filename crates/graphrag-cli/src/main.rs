use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{classify, config as config_cmd};

/// Command-line interface for the GraphRAG query optimizer
#[derive(Parser)]
#[command(name = "graphrag")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, env = "GRAPHRAG_CONFIG")]
    pub config: Option<String>,

    /// Override the fingerprint cache size
    #[arg(long, global = true)]
    pub fingerprint_cache_size: Option<usize>,

    /// Override the graph-type cache size
    #[arg(long, global = true)]
    pub graph_type_cache_size: Option<usize>,

    /// Disable both caches
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify JSON queries, one per line
    Classify(classify::ClassifyArgs),
    /// Configuration management
    Config(config_cmd::ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!(
                    "graphrag={default_level},graphrag_core={default_level}"
                ))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration, then apply flag overrides
    let mut cfg = config::Config::load(cli.config.as_deref())?;
    cfg.apply_overrides(config::Overrides {
        fingerprint_cache_size: cli.fingerprint_cache_size,
        graph_type_cache_size: cli.graph_type_cache_size,
        no_cache: cli.no_cache,
    });

    match cli.command {
        Commands::Classify(args) => classify::execute(args, &cfg),
        Commands::Config(args) => config_cmd::execute(args, &cfg),
    }
}
