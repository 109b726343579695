//! Heuristic graph-type detection
//!
//! Classification walks [`DETECTION_RULES`] in order and stops at the first
//! rule that yields a label. Rule order decides the outcome for queries that
//! match several heuristics at once, so the slice order is part of the
//! contract.

use crate::query::{Query, QueryValue, keys};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading characters of free text scanned for keywords
pub const KEYWORD_SCAN_CHARS: usize = 100;

/// Keyword groups scanned in order; the first group with a hit wins
pub const KEYWORD_GROUPS: &[(GraphType, &[&str])] = &[
    (GraphType::Wikipedia, &["wikipedia", "wikidata", "dbpedia"]),
    (GraphType::Ipld, &["ipld", "ipfs", "content-addressed", "cid:"]),
];

/// Content-address prefixes recognised on entity identifiers
pub const CONTENT_ADDRESS_PREFIXES: &[&str] = &["Qm", "bafy", "bafk", "ipfs://"];

/// Graph-type label.
///
/// The four built-in labels come out of detection. [`GraphType::Other`] only
/// comes from an explicit `graph_type` override on the query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum GraphType {
    /// Wikipedia / Wikidata derived knowledge graph
    Wikipedia,
    /// Content-addressed IPLD graph
    Ipld,
    /// Query spanning several sources
    Mixed,
    /// Fallback
    General,
    /// Caller-supplied label
    Other(String),
}

impl GraphType {
    /// Label text
    pub fn as_str(&self) -> &str {
        match self {
            GraphType::Wikipedia => "wikipedia",
            GraphType::Ipld => "ipld",
            GraphType::Mixed => "mixed",
            GraphType::General => "general",
            GraphType::Other(label) => label,
        }
    }

    /// Parse a built-in label, `None` for anything else
    pub fn builtin(label: &str) -> Option<Self> {
        match label {
            "wikipedia" => Some(GraphType::Wikipedia),
            "ipld" => Some(GraphType::Ipld),
            "mixed" => Some(GraphType::Mixed),
            "general" => Some(GraphType::General),
            _ => None,
        }
    }

    /// Parse any label, unknown text becomes [`GraphType::Other`]
    pub fn from_label(label: &str) -> Self {
        Self::builtin(label).unwrap_or_else(|| GraphType::Other(label.to_string()))
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GraphType> for String {
    fn from(graph_type: GraphType) -> Self {
        graph_type.as_str().to_string()
    }
}

impl From<String> for GraphType {
    fn from(label: String) -> Self {
        GraphType::from_label(&label)
    }
}

/// A detection rule: yields a label or passes
pub type DetectionRule = fn(&Query) -> Option<GraphType>;

/// Ordered detection chain, evaluated first-match-wins
pub const DETECTION_RULES: &[(&str, DetectionRule)] = &[
    ("explicit_source", explicit_source),
    ("multi_source", multi_source),
    ("text_keywords", text_keywords),
    ("entity_id_prefix", entity_id_prefix),
];

/// Run the detection chain, falling back to [`GraphType::General`]
pub fn detect(query: &Query) -> GraphType {
    for (name, rule) in DETECTION_RULES {
        if let Some(label) = rule(query) {
            tracing::trace!(rule = *name, graph_type = %label, "graph type rule matched");
            return label;
        }
    }
    GraphType::General
}

/// Rule 1: `entity_source` naming a built-in label
pub fn explicit_source(query: &Query) -> Option<GraphType> {
    query
        .get(keys::ENTITY_SOURCE)
        .and_then(QueryValue::as_str)
        .and_then(GraphType::builtin)
}

/// Rule 2: more than one distinct entry in `entity_sources`
pub fn multi_source(query: &Query) -> Option<GraphType> {
    (distinct_sources(query) > 1).then_some(GraphType::Mixed)
}

/// Rule 3: keyword group found in the text prefix
pub fn text_keywords(query: &Query) -> Option<GraphType> {
    query.text().and_then(classify_text_keywords)
}

/// Rule 4: content-address prefix on the first entity id
pub fn entity_id_prefix(query: &Query) -> Option<GraphType> {
    query
        .get(keys::ENTITY_IDS)
        .and_then(QueryValue::as_list)
        .and_then(|ids| ids.first())
        .and_then(classify_id_prefix)
}

/// Count distinct entries of `entity_sources`; zero when absent or not a list.
///
/// Entries compare by value, so text `"1"` and integer `1` are two sources.
/// NaN floats compare equal to each other.
pub fn distinct_sources(query: &Query) -> usize {
    let Some(sources) = query.get(keys::ENTITY_SOURCES).and_then(QueryValue::as_list) else {
        return 0;
    };

    let mut seen: Vec<&QueryValue> = Vec::with_capacity(sources.len());
    for source in sources {
        if !seen.iter().any(|known| same_source(known, source)) {
            seen.push(source);
        }
    }
    seen.len()
}

fn same_source(a: &QueryValue, b: &QueryValue) -> bool {
    match (a, b) {
        (QueryValue::Float(x), QueryValue::Float(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => a == b,
    }
}

/// Scan the lower-cased first [`KEYWORD_SCAN_CHARS`] characters of `text`
pub fn classify_text_keywords(text: &str) -> Option<GraphType> {
    let prefix: String = text.chars().take(KEYWORD_SCAN_CHARS).collect();
    let prefix = prefix.to_lowercase();

    KEYWORD_GROUPS
        .iter()
        .find(|(_, words)| words.iter().any(|word| prefix.contains(word)))
        .map(|(label, _)| label.clone())
}

/// Classify an entity id by content-address prefix
pub fn classify_id_prefix(id: &QueryValue) -> Option<GraphType> {
    let id = id.as_str()?;
    CONTENT_ADDRESS_PREFIXES
        .iter()
        .any(|prefix| id.starts_with(prefix))
        .then_some(GraphType::Ipld)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(value: serde_json::Value) -> Query {
        Query::from_json(value).unwrap()
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let names: Vec<&str> = DETECTION_RULES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["explicit_source", "multi_source", "text_keywords", "entity_id_prefix"]
        );
    }

    #[test]
    fn test_explicit_source() {
        assert_eq!(
            explicit_source(&query(json!({"entity_source": "ipld"}))),
            Some(GraphType::Ipld)
        );
        assert_eq!(explicit_source(&query(json!({"entity_source": "arxiv"}))), None);
        assert_eq!(explicit_source(&query(json!({"entity_source": 3}))), None);
    }

    #[test]
    fn test_multi_source_counts_distinct() {
        assert_eq!(
            multi_source(&query(json!({"entity_sources": ["a", "b"]}))),
            Some(GraphType::Mixed)
        );
        assert_eq!(multi_source(&query(json!({"entity_sources": ["a", "a"]}))), None);
        assert_eq!(multi_source(&query(json!({"entity_sources": "a,b"}))), None);
        // Text and integer forms of the same digits are different sources
        assert_eq!(
            multi_source(&query(json!({"entity_sources": ["1", 1]}))),
            Some(GraphType::Mixed)
        );
        let nans = Query::new().with("entity_sources", vec![f64::NAN, f64::NAN]);
        assert_eq!(distinct_sources(&nans), 1);
    }

    #[test]
    fn test_text_keywords_groups_in_order() {
        assert_eq!(
            classify_text_keywords("search WIKIDATA entries"),
            Some(GraphType::Wikipedia)
        );
        assert_eq!(classify_text_keywords("resolve an ipfs path"), Some(GraphType::Ipld));
        // Both groups present: wikipedia group is checked first
        assert_eq!(
            classify_text_keywords("ipld mirror of wikipedia"),
            Some(GraphType::Wikipedia)
        );
        assert_eq!(classify_text_keywords("find contracts"), None);
    }

    #[test]
    fn test_text_keywords_bounded_prefix() {
        let text = format!("{} wikipedia", "a".repeat(KEYWORD_SCAN_CHARS));
        assert_eq!(classify_text_keywords(&text), None);
    }

    #[test]
    fn test_entity_id_prefix() {
        assert_eq!(
            entity_id_prefix(&query(json!({"entity_ids": ["bafybeigdyr", "Q1"]}))),
            Some(GraphType::Ipld)
        );
        // Only the first id is inspected
        assert_eq!(entity_id_prefix(&query(json!({"entity_ids": ["Q1", "Qm123"]}))), None);
        assert_eq!(entity_id_prefix(&query(json!({"entity_ids": []}))), None);
        assert_eq!(entity_id_prefix(&query(json!({"entity_ids": [42]}))), None);
    }

    #[test]
    fn test_detect_mixed_beats_id_prefix() {
        let q = query(json!({"entity_sources": ["a", "b"], "entity_ids": ["Qm123"]}));
        assert_eq!(detect(&q), GraphType::Mixed);
    }

    #[test]
    fn test_detect_explicit_source_beats_keywords() {
        let q = query(json!({"entity_source": "ipld", "query": "wikipedia articles"}));
        assert_eq!(detect(&q), GraphType::Ipld);
    }

    #[test]
    fn test_detect_default_general() {
        assert_eq!(detect(&Query::new()), GraphType::General);
        assert_eq!(detect(&query(json!({"query": "find contracts"}))), GraphType::General);
    }

    #[test]
    fn test_label_round_trip_through_string() {
        assert_eq!(GraphType::from_label("mixed"), GraphType::Mixed);
        assert_eq!(
            GraphType::from_label("custom_x"),
            GraphType::Other("custom_x".to_string())
        );
        let json = serde_json::to_string(&GraphType::Ipld).unwrap();
        assert_eq!(json, "\"ipld\"");
    }
}
