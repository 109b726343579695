//! Optimizer configuration
//!
//! Cache sizes and the global caching switch, with named presets.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default entry limit of the fingerprint cache
pub const DEFAULT_FINGERPRINT_CACHE_SIZE: usize = 1000;

/// Default entry limit of the graph-type cache
pub const DEFAULT_GRAPH_TYPE_CACHE_SIZE: usize = 500;

/// Configuration for a [`QueryOptimizer`](crate::QueryOptimizer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Maximum number of fingerprint signatures kept
    pub fingerprint_cache_size: usize,
    /// Maximum number of detection signatures kept
    pub graph_type_cache_size: usize,
    /// When false, every lookup is computed directly
    pub enable_caching: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            fingerprint_cache_size: DEFAULT_FINGERPRINT_CACHE_SIZE,
            graph_type_cache_size: DEFAULT_GRAPH_TYPE_CACHE_SIZE,
            enable_caching: true,
        }
    }
}

impl OptimizerConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Caching switched off; every classification is recomputed
    pub fn disabled() -> Self {
        Self {
            enable_caching: false,
            ..Self::default()
        }
    }

    /// Small caches for short-lived optimizers
    pub fn compact() -> Self {
        Self {
            fingerprint_cache_size: 100,
            graph_type_cache_size: 50,
            enable_caching: true,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.enable_caching {
            return Ok(());
        }

        let mut errors = Vec::new();
        if self.fingerprint_cache_size == 0 {
            errors.push("fingerprint_cache_size cannot be zero while caching is enabled");
        }
        if self.graph_type_cache_size == 0 {
            errors.push("graph_type_cache_size cannot be zero while caching is enabled");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::config(errors.join("; ")))
        }
    }
}

/// Named configuration preset
#[derive(Debug, Clone)]
pub struct ConfigurationPreset {
    /// Preset name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Resulting configuration
    pub config: OptimizerConfig,
}

/// Configuration presets
pub struct ConfigurationPresets;

impl ConfigurationPresets {
    /// All available presets
    pub fn list() -> Vec<ConfigurationPreset> {
        vec![
            ConfigurationPreset {
                name: "default",
                description: "1000 fingerprints, 500 graph types",
                config: OptimizerConfig::default(),
            },
            ConfigurationPreset {
                name: "compact",
                description: "Small caches for short-lived optimizers",
                config: OptimizerConfig::compact(),
            },
            ConfigurationPreset {
                name: "disabled",
                description: "No caching, every query classified from scratch",
                config: OptimizerConfig::disabled(),
            },
        ]
    }

    /// Look up a preset by name
    pub fn get(name: &str) -> Option<OptimizerConfig> {
        match name {
            "default" => Some(OptimizerConfig::default()),
            "compact" => Some(OptimizerConfig::compact()),
            "disabled" => Some(OptimizerConfig::disabled()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = OptimizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fingerprint_cache_size, 1000);
        assert_eq!(config.graph_type_cache_size, 500);
        assert!(config.enable_caching);
    }

    #[test]
    fn test_presets_validate() {
        for preset in ConfigurationPresets::list() {
            assert!(preset.config.validate().is_ok(), "preset {}", preset.name);
            assert_eq!(ConfigurationPresets::get(preset.name), Some(preset.config));
        }
        assert!(ConfigurationPresets::get("unknown").is_none());
    }

    #[test]
    fn test_zero_size_rejected_when_enabled() {
        let config = OptimizerConfig {
            graph_type_cache_size: 0,
            ..OptimizerConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("graph_type_cache_size"));
    }

    #[test]
    fn test_zero_size_allowed_when_disabled() {
        let config = OptimizerConfig {
            fingerprint_cache_size: 0,
            graph_type_cache_size: 0,
            enable_caching: false,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: OptimizerConfig =
            serde_json::from_str(r#"{"fingerprint_cache_size": 64}"#).unwrap();
        assert_eq!(config.fingerprint_cache_size, 64);
        assert_eq!(config.graph_type_cache_size, DEFAULT_GRAPH_TYPE_CACHE_SIZE);
        assert!(config.enable_caching);
    }
}
