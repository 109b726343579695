//! Cheap cache keys derived from a query's shape
//!
//! Signatures are lookup keys only. They never touch large payloads and two
//! different queries may share one.

use crate::graph_type::{
    GraphType, classify_id_prefix, classify_text_keywords, distinct_sources, explicit_source,
};
use crate::query::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_VECTOR_RESULTS, DEFAULT_PRIORITY, Query, QueryValue, keys,
};
use xxhash_rust::xxh3::xxh3_64;

/// Number of leading characters of free text that feed the text token
pub const TEXT_SIGNATURE_CHARS: usize = 50;

/// Modulus applied to the text hash
pub const TEXT_HASH_MODULUS: u64 = 1_000_003;

/// Token separator
pub const SEPARATOR: &str = "|";

/// Signature used when no detection feature is present
pub const DEFAULT_DETECTION_SIGNATURE: &str = "default";

/// Build the fingerprint-cache signature.
///
/// Tokens, in order: vector length and requested result count, a bounded
/// hash of the text prefix, traversal depth and edge filter count, and the
/// priority. The priority token is always present, so the result is never
/// empty.
pub fn fingerprint_signature(query: &Query) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(6);

    if let Some(vector) = query.get(keys::QUERY_VECTOR) {
        parts.push(format!("vec_{}", vector.len_hint()));
        parts.push(format!(
            "topk_{}",
            render_or(query.get(keys::MAX_VECTOR_RESULTS), DEFAULT_MAX_VECTOR_RESULTS)
        ));
    }

    if let Some(text) = query.text() {
        parts.push(format!("text_{}", text_hash(text)));
    }

    if let Some(traversal) = query.get(keys::TRAVERSAL).and_then(QueryValue::as_map) {
        parts.push(format!(
            "depth_{}",
            render_or(traversal.get(keys::MAX_DEPTH), DEFAULT_MAX_DEPTH)
        ));
        if let Some(edge_types) = traversal.get(keys::EDGE_TYPES) {
            parts.push(format!("edges_{}", edge_types.len_hint()));
        }
    }

    parts.push(format!(
        "priority_{}",
        render_or(query.get(keys::PRIORITY), DEFAULT_PRIORITY)
    ));

    parts.join(SEPARATOR)
}

/// Build the graph-type-cache signature.
///
/// Covers every feature the detection rules read: the built-in label named
/// by the explicit source marker, the distinct source count, the keyword
/// group matched in the text prefix and the class of the first entity id.
/// Tokens only carry values from fixed vocabularies, never caller text.
pub fn detection_signature(query: &Query) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4);

    if let Some(label) = explicit_source(query) {
        parts.push(format!("src_{}", label));
    }

    if query.contains_key(keys::ENTITY_SOURCES) {
        parts.push(format!("multi_{}", distinct_sources(query)));
    }

    if let Some(label) = query.text().and_then(classify_text_keywords) {
        parts.push(format!("kw_{}", label));
    }

    if let Some(first) = first_entity_id(query) {
        let class = match classify_id_prefix(first) {
            Some(GraphType::Ipld) => "cid",
            _ => "other",
        };
        parts.push(format!("id_{}", class));
    }

    if parts.is_empty() {
        DEFAULT_DETECTION_SIGNATURE.to_string()
    } else {
        parts.join(SEPARATOR)
    }
}

/// Deterministic bounded hash of the first [`TEXT_SIGNATURE_CHARS`] characters
pub fn text_hash(text: &str) -> u64 {
    let end = text
        .char_indices()
        .nth(TEXT_SIGNATURE_CHARS)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    xxh3_64(&text.as_bytes()[..end]) % TEXT_HASH_MODULUS
}

fn first_entity_id(query: &Query) -> Option<&QueryValue> {
    query
        .get(keys::ENTITY_IDS)
        .and_then(QueryValue::as_list)
        .and_then(|ids| ids.first())
}

fn render_or(value: Option<&QueryValue>, default: impl ToString) -> String {
    match value {
        Some(value) => value.to_string(),
        None => default.to_string(),
    }
}
