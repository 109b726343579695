//! Bounded memoization cache for query classification
//!
//! One [`ClassificationCache`] exists per classification task. Each maps a
//! cheap signature to the computed value and counts accesses and hits.
//!
//! Admission policy is cache-aside without eviction: once the map holds
//! `max_size` entries new signatures are computed but not stored, until the
//! owning optimizer is recreated. Existing entries are never displaced.
//!
//! # Thread Safety
//!
//! **This cache is NOT thread-safe.** All mutating methods take `&mut self`.
//! Callers that need concurrent classification use one optimizer per thread
//! or wrap it in a lock of their own.

use crate::fingerprint::{self, Fingerprint};
use crate::graph_type::{self, GraphType};
use crate::query::{Query, QueryValue, keys};
use crate::signature;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How a lookup should skip the cache
#[derive(Debug, Clone, PartialEq)]
pub enum Bypass<V> {
    /// Caller already supplied the answer
    Override(V),
    /// Compute directly, neither reading nor writing the map
    Uncached,
}

/// One classification task served through a [`ClassificationCache`]
pub trait QueryClassifier {
    /// Cached value type
    type Output: Clone + fmt::Debug;

    /// Task name, used in logs and stats
    const NAME: &'static str;

    /// Explicit caller intent that skips the cache, if any
    fn bypass(query: &Query) -> Option<Bypass<Self::Output>>;

    /// Cheap lookup key
    fn signature(query: &Query) -> String;

    /// Authoritative computation
    fn compute(query: &Query) -> Self::Output;
}

/// Fingerprint task: signature over query shape, value is the SHA-256 digest
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintClassifier;

impl QueryClassifier for FingerprintClassifier {
    type Output = Fingerprint;

    const NAME: &'static str = "fingerprint";

    fn bypass(query: &Query) -> Option<Bypass<Fingerprint>> {
        query.skip_cache().then_some(Bypass::Uncached)
    }

    fn signature(query: &Query) -> String {
        signature::fingerprint_signature(query)
    }

    fn compute(query: &Query) -> Fingerprint {
        fingerprint::fingerprint(query)
    }
}

/// Graph-type task: signature over detection features, value is the label
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphTypeClassifier;

impl QueryClassifier for GraphTypeClassifier {
    type Output = GraphType;

    const NAME: &'static str = "graph_type";

    fn bypass(query: &Query) -> Option<Bypass<GraphType>> {
        if let Some(label) = query.get(keys::GRAPH_TYPE).and_then(QueryValue::as_str) {
            return Some(Bypass::Override(GraphType::from_label(label)));
        }
        query.skip_cache().then_some(Bypass::Uncached)
    }

    fn signature(query: &Query) -> String {
        signature::detection_signature(query)
    }

    fn compute(query: &Query) -> GraphType {
        graph_type::detect(query)
    }
}

/// Outcome of a single lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    /// Cache was skipped
    Bypassed(V),
    /// Value came from the map
    Hit(V),
    /// Value was computed; `admitted` tells whether it was stored
    Miss {
        /// Computed value
        value: V,
        /// Whether the map had room for it
        admitted: bool,
    },
}

impl<V> Lookup<V> {
    /// Take the value regardless of path
    pub fn into_value(self) -> V {
        match self {
            Lookup::Bypassed(value) | Lookup::Hit(value) | Lookup::Miss { value, .. } => value,
        }
    }

    /// Whether the value came from the map
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }
}

/// Point-in-time statistics for one cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,
    /// Configured entry limit
    pub max_size: usize,
    /// Lookups, bypassed ones included
    pub accesses: u64,
    /// Lookups answered from the map
    pub hits: u64,
    /// Hit rate as a percentage (0.0 to 100.0)
    pub hit_rate: f64,
}

impl CacheStats {
    /// Percentage of accesses that were hits; 0.0 before the first access
    pub fn hit_rate_percent(hits: u64, accesses: u64) -> f64 {
        if accesses == 0 {
            0.0
        } else {
            hits as f64 / accesses as f64 * 100.0
        }
    }
}

/// Size-bounded signature → value memo table for one classifier
#[derive(Debug, Clone)]
pub struct ClassificationCache<C: QueryClassifier> {
    entries: HashMap<String, C::Output>,
    max_size: usize,
    enabled: bool,
    accesses: u64,
    hits: u64,
    saturation_logged: bool,
}

impl<C: QueryClassifier> ClassificationCache<C> {
    /// Create an empty cache admitting at most `max_size` signatures
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(max_size.min(1024)),
            max_size,
            enabled: true,
            accesses: 0,
            hits: 0,
            saturation_logged: false,
        }
    }

    /// Create a cache that computes every lookup directly
    pub fn disabled(max_size: usize) -> Self {
        Self {
            enabled: false,
            ..Self::new(max_size)
        }
    }

    /// Classify `query`, reporting which path answered.
    ///
    /// Every call counts as an access. A bypass returns without touching the
    /// map or the hit counter. On a miss the computed value is stored only if
    /// the map has room.
    pub fn lookup(&mut self, query: &Query) -> Lookup<C::Output> {
        self.accesses += 1;

        let bypass = if self.enabled {
            C::bypass(query)
        } else {
            Some(Bypass::Uncached)
        };
        match bypass {
            Some(Bypass::Override(value)) => {
                tracing::trace!(cache = C::NAME, "explicit override, cache bypassed");
                return Lookup::Bypassed(value);
            }
            Some(Bypass::Uncached) => {
                tracing::trace!(cache = C::NAME, "caching disabled for lookup");
                return Lookup::Bypassed(C::compute(query));
            }
            None => {}
        }

        let signature = C::signature(query);
        if let Some(value) = self.entries.get(&signature) {
            self.hits += 1;
            tracing::trace!(cache = C::NAME, %signature, "cache hit");
            return Lookup::Hit(value.clone());
        }

        let value = C::compute(query);
        let admitted = self.entries.len() < self.max_size;
        if admitted {
            tracing::trace!(cache = C::NAME, %signature, "cache miss, entry stored");
            self.entries.insert(signature, value.clone());
        } else if !self.saturation_logged {
            self.saturation_logged = true;
            tracing::debug!(
                cache = C::NAME,
                max_size = self.max_size,
                "cache full, new signatures will not be stored"
            );
        } else {
            tracing::trace!(cache = C::NAME, %signature, "cache full, entry not stored");
        }

        Lookup::Miss { value, admitted }
    }

    /// Classify `query`, returning only the value
    pub fn lookup_or_compute(&mut self, query: &Query) -> C::Output {
        self.lookup(query).into_value()
    }

    /// Cached value for a signature, without counting an access
    pub fn peek(&self, signature: &str) -> Option<&C::Output> {
        self.entries.get(signature)
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry has been stored yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the map has reached its entry limit
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max_size
    }

    /// Configured entry limit
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Whether lookups consult the map at all
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Total lookups
    pub fn accesses(&self) -> u64 {
        self.accesses
    }

    /// Lookups answered from the map
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Snapshot of size, limit and counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max_size: self.max_size,
            accesses: self.accesses,
            hits: self.hits,
            hit_rate: CacheStats::hit_rate_percent(self.hits, self.accesses),
        }
    }
}

/// Cache of query fingerprints
pub type FingerprintCache = ClassificationCache<FingerprintClassifier>;

/// Cache of detected graph types
pub type GraphTypeCache = ClassificationCache<GraphTypeClassifier>;
