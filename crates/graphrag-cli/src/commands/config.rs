use anyhow::Result;
use clap::{Args, Subcommand};
use graphrag_core::ConfigurationPresets;

use super::{print_error, print_success, print_table};
use crate::config::Config;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
    /// List named presets
    Presets,
    /// Write the effective configuration to a file
    Init {
        /// Target path (defaults to the user config directory)
        #[arg(long)]
        path: Option<String>,
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
}

pub fn execute(args: ConfigArgs, cfg: &Config) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(cfg),
        ConfigCommands::Presets => list_presets(),
        ConfigCommands::Init { path, force } => init_config(cfg, path.as_deref(), force),
        ConfigCommands::Path => {
            println!("{}", Config::default_path().display());
            Ok(())
        }
    }
}

fn show_config(cfg: &Config) -> Result<()> {
    cfg.optimizer.validate()?;
    print!("{}", cfg.to_toml()?);
    Ok(())
}

fn list_presets() -> Result<()> {
    let rows: Vec<Vec<String>> = ConfigurationPresets::list()
        .into_iter()
        .map(|preset| {
            vec![
                preset.name.to_string(),
                preset.config.fingerprint_cache_size.to_string(),
                preset.config.graph_type_cache_size.to_string(),
                preset.config.enable_caching.to_string(),
                preset.description.to_string(),
            ]
        })
        .collect();

    print_table(
        &["Preset", "Fingerprints", "Graph Types", "Caching", "Description"],
        &rows,
    );
    Ok(())
}

fn init_config(cfg: &Config, path: Option<&str>, force: bool) -> Result<()> {
    let target = path
        .map(std::path::PathBuf::from)
        .unwrap_or_else(Config::default_path);

    if target.exists() && !force {
        print_error(&format!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            target.display()
        ));
        return Ok(());
    }

    cfg.optimizer.validate()?;
    cfg.save(path)?;
    print_success(&format!("Configuration file created at {}", target.display()));
    Ok(())
}
