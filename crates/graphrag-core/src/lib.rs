//! GraphRAG Core - Query Classification and Memoization
//!
//! This crate provides the query-optimizer front end of a GraphRAG engine:
//! - Query fingerprinting (normalized, SHA-256 digested)
//! - Heuristic graph-type detection (wikipedia / ipld / mixed / general)
//! - Bounded signature caches for both classifications
//! - Per-cache statistics
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              QueryOptimizer                  │
//! │  (optimize_query, stats, configuration)     │
//! └──────────────┬──────────────────────────────┘
//!                │
//! ┌──────────────┴──────────────────────────────┐
//! │          ClassificationCache                 │
//! │     (signature → value, hits/accesses)      │
//! └──────────────┬──────────────────────────────┘
//!                │
//! ┌──────────────┴──────────────────────────────┐
//! │            Classifiers                       │
//! │     (fingerprint, graph-type detection)     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use graphrag_core::{GraphType, Query, QueryOptimizer};
//!
//! let mut optimizer = QueryOptimizer::default();
//! let query = Query::new().with("query", "search wikidata entries");
//!
//! let plan = optimizer.optimize_query(&query);
//! assert_eq!(plan.graph_type, GraphType::Wikipedia);
//! assert_eq!(plan.fingerprint.as_str().len(), 64);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod graph_type;
pub mod optimizer;
pub mod query;
pub mod signature;

pub use cache::{
    CacheStats, ClassificationCache, FingerprintCache, GraphTypeCache, Lookup, QueryClassifier,
};
pub use config::{ConfigurationPresets, OptimizerConfig};
pub use error::{Error, Result};
pub use fingerprint::{DigestSource, Fingerprint};
pub use graph_type::GraphType;
pub use optimizer::{OptimizationStats, QueryOptimizer, QueryPlan};
pub use query::{Query, QueryValue};
