//! Query fingerprinting
//!
//! A fingerprint is the SHA-256 digest of a normalized query. Normalization
//! is lossy on purpose: the vector payload and any list longer than
//! [`MAX_INLINE_LIST_LEN`] are replaced by size-hint tokens before hashing, so
//! queries that differ only inside those payloads share a fingerprint.
//!
//! Hashing goes through one of two forms. The canonical form is compact JSON
//! with sorted keys. When the normalized query holds a value JSON cannot
//! express (a NaN or infinite float), the debug rendering of the normalized
//! map is hashed instead. Both branches are deterministic and neither fails.

use crate::query::{Query, QueryValue, keys};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Lists longer than this are replaced by a length token
pub const MAX_INLINE_LIST_LEN: usize = 10;

/// Normalized query: same keys, payloads elided
pub type NormalizedQuery = BTreeMap<String, QueryValue>;

/// Which form of the normalized query was hashed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestSource {
    /// Sorted-key JSON
    Canonical,
    /// Debug rendering fallback
    Repr,
}

/// Serialized form of a normalized query, ready for hashing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalForm {
    /// Compact JSON with sorted keys
    Json(String),
    /// Debug rendering, used when JSON cannot represent a value
    Repr(String),
}

impl CanonicalForm {
    /// Text to hash
    pub fn as_str(&self) -> &str {
        match self {
            CanonicalForm::Json(text) | CanonicalForm::Repr(text) => text,
        }
    }

    /// Branch that produced this form
    pub fn source(&self) -> DigestSource {
        match self {
            CanonicalForm::Json(_) => DigestSource::Canonical,
            CanonicalForm::Repr(_) => DigestSource::Repr,
        }
    }
}

/// Collision-resistant query identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Lower-case hex SHA-256 digest
    pub digest: String,
    /// Form the digest was computed over
    pub source: DigestSource,
}

impl Fingerprint {
    /// Hex digest
    pub fn as_str(&self) -> &str {
        &self.digest
    }

    /// Whether the fallback form was hashed
    pub fn is_fallback(&self) -> bool {
        self.source == DigestSource::Repr
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digest)
    }
}

/// Compute the fingerprint of a query
pub fn fingerprint(query: &Query) -> Fingerprint {
    let normalized = normalize(query);
    let form = canonical_form(&normalized);
    if form.source() == DigestSource::Repr {
        tracing::debug!("query has no canonical JSON form, fingerprinting its repr");
    }
    Fingerprint {
        digest: digest_hex(form.as_str()),
        source: form.source(),
    }
}

/// Shallow normalization.
///
/// - `query_vector` becomes `<vector len=N>`
/// - a top-level map keeps its entries, except lists longer than
///   [`MAX_INLINE_LIST_LEN`] which become `<list len=N>` (one level only)
/// - a top-level list longer than [`MAX_INLINE_LIST_LEN`] becomes `<list len=N>`
/// - everything else is copied unchanged
pub fn normalize(query: &Query) -> NormalizedQuery {
    query
        .iter()
        .map(|(key, value)| {
            let normalized = if key == keys::QUERY_VECTOR {
                QueryValue::Text(vector_token(value.len_hint()))
            } else {
                match value {
                    QueryValue::Map(entries) => QueryValue::Map(
                        entries
                            .iter()
                            .map(|(k, v)| (k.clone(), elide_long_list(v)))
                            .collect(),
                    ),
                    other => elide_long_list(other),
                }
            };
            (key.clone(), normalized)
        })
        .collect()
}

/// Pick the hashing form: canonical JSON when possible, repr otherwise
pub fn canonical_form(normalized: &NormalizedQuery) -> CanonicalForm {
    match canonical_json(normalized) {
        Some(json) => CanonicalForm::Json(json),
        None => CanonicalForm::Repr(repr_form(normalized)),
    }
}

/// Compact JSON with sorted keys, `None` if a value has no JSON form
pub fn canonical_json(normalized: &NormalizedQuery) -> Option<String> {
    let mut object = serde_json::Map::new();
    for (key, value) in normalized {
        object.insert(key.clone(), value.to_json()?);
    }
    serde_json::to_string(&serde_json::Value::Object(object)).ok()
}

/// Debug rendering of the normalized map; keys are already sorted
pub fn repr_form(normalized: &NormalizedQuery) -> String {
    format!("{:?}", normalized)
}

/// SHA-256 of UTF-8 text as lower-case hex
pub fn digest_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

fn elide_long_list(value: &QueryValue) -> QueryValue {
    match value {
        QueryValue::List(items) if items.len() > MAX_INLINE_LIST_LEN => {
            QueryValue::Text(list_token(items.len()))
        }
        other => other.clone(),
    }
}

fn vector_token(len: usize) -> String {
    format!("<vector len={}>", len)
}

fn list_token(len: usize) -> String {
    format!("<list len={}>", len)
}
