//! Unified query optimizer entry points
//!
//! [`QueryOptimizer`] owns one fingerprint cache and one graph-type cache.
//! Both live exactly as long as the optimizer; nothing is shared between
//! instances.

use crate::cache::{CacheStats, FingerprintCache, GraphTypeCache};
use crate::config::OptimizerConfig;
use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::graph_type::GraphType;
use crate::query::{Query, keys};
use serde::{Deserialize, Serialize};

/// Result of [`QueryOptimizer::optimize_query`]
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// Query identifier
    pub fingerprint: Fingerprint,
    /// Detected or overridden graph type
    pub graph_type: GraphType,
    /// Copy of the input with `graph_type` filled in for downstream routing
    pub query: Query,
}

/// Snapshot of both caches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationStats {
    /// Fingerprint cache
    pub fingerprint_cache: CacheStats,
    /// Graph-type cache
    pub graph_type_cache: CacheStats,
}

/// Query optimizer with per-instance classification caches
#[derive(Debug, Clone)]
pub struct QueryOptimizer {
    config: OptimizerConfig,
    fingerprints: FingerprintCache,
    graph_types: GraphTypeCache,
}

impl QueryOptimizer {
    /// Create an optimizer, validating `config` first
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_validated_config(config))
    }

    fn with_validated_config(config: OptimizerConfig) -> Self {
        let (fingerprints, graph_types) = if config.enable_caching {
            (
                FingerprintCache::new(config.fingerprint_cache_size),
                GraphTypeCache::new(config.graph_type_cache_size),
            )
        } else {
            (
                FingerprintCache::disabled(config.fingerprint_cache_size),
                GraphTypeCache::disabled(config.graph_type_cache_size),
            )
        };

        tracing::info!(
            fingerprint_cache_size = config.fingerprint_cache_size,
            graph_type_cache_size = config.graph_type_cache_size,
            enable_caching = config.enable_caching,
            "query optimizer created"
        );

        Self {
            config,
            fingerprints,
            graph_types,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Fingerprint of `query`, served from the fingerprint cache
    pub fn query_fingerprint(&mut self, query: &Query) -> Fingerprint {
        self.fingerprints.lookup_or_compute(query)
    }

    /// Graph type of `query`, served from the graph-type cache
    pub fn detect_graph_type(&mut self, query: &Query) -> GraphType {
        self.graph_types.lookup_or_compute(query)
    }

    /// Classify `query` for planning.
    ///
    /// Resolves the graph type first, then fingerprints the caller's query as
    /// given. The returned plan carries an annotated copy; the input is left
    /// untouched.
    pub fn optimize_query(&mut self, query: &Query) -> QueryPlan {
        let graph_type = self.detect_graph_type(query);
        let fingerprint = self.query_fingerprint(query);

        let mut routed = query.clone();
        routed.insert(keys::GRAPH_TYPE, graph_type.as_str());

        tracing::debug!(
            fingerprint = %fingerprint,
            graph_type = %graph_type,
            "query classified"
        );

        QueryPlan {
            fingerprint,
            graph_type,
            query: routed,
        }
    }

    /// Snapshot of cache sizes, limits and counters
    pub fn get_optimization_stats(&self) -> OptimizationStats {
        OptimizationStats {
            fingerprint_cache: self.fingerprints.stats(),
            graph_type_cache: self.graph_types.stats(),
        }
    }

    /// Direct access to the fingerprint cache
    pub fn fingerprint_cache(&self) -> &FingerprintCache {
        &self.fingerprints
    }

    /// Direct access to the graph-type cache
    pub fn graph_type_cache(&self) -> &GraphTypeCache {
        &self.graph_types
    }
}

impl Default for QueryOptimizer {
    fn default() -> Self {
        Self::with_validated_config(OptimizerConfig::default())
    }
}
