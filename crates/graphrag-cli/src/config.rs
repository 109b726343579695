use anyhow::{Context, Result};
use graphrag_core::{ConfigurationPresets, OptimizerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Preset applied before the `[optimizer]` table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

/// Command-line overrides, applied on top of the file
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub fingerprint_cache_size: Option<usize>,
    pub graph_type_cache_size: Option<usize>,
    pub no_cache: bool,
}

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_path(),
        };

        if config_path.exists() {
            Self::from_file(&config_path)
        } else if path.is_some() {
            anyhow::bail!("config file not found: {}", config_path.display())
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config in {}", path.display()))
    }

    /// Parse TOML, resolving `preset` against the fields the file leaves unset
    pub fn parse(content: &str) -> Result<Self> {
        let raw: toml::Table = toml::from_str(content)?;
        let mut config: Config = toml::from_str(content)?;

        if let Some(name) = config.preset.as_deref() {
            let mut base = ConfigurationPresets::get(name)
                .with_context(|| format!("unknown preset '{}'", name))?;
            if let Some(table) = raw.get("optimizer").and_then(toml::Value::as_table) {
                let explicit = &config.optimizer;
                if table.contains_key("fingerprint_cache_size") {
                    base.fingerprint_cache_size = explicit.fingerprint_cache_size;
                }
                if table.contains_key("graph_type_cache_size") {
                    base.graph_type_cache_size = explicit.graph_type_cache_size;
                }
                if table.contains_key("enable_caching") {
                    base.enable_caching = explicit.enable_caching;
                }
            }
            config.optimizer = base;
        }

        Ok(config)
    }

    pub fn save(&self, path: Option<&str>) -> Result<()> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_path(),
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&config_path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("graphrag")
            .join("config.toml")
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(size) = overrides.fingerprint_cache_size {
            self.optimizer.fingerprint_cache_size = size;
        }
        if let Some(size) = overrides.graph_type_cache_size {
            self.optimizer.graph_type_cache_size = size;
        }
        if overrides.no_cache {
            self.optimizer.enable_caching = false;
        }
    }
}
