use graphrag_core::cache::{FingerprintCache, GraphTypeCache, Lookup};
use graphrag_core::fingerprint::fingerprint;
use graphrag_core::graph_type::detect;
use graphrag_core::{GraphType, Query, QueryValue};
use proptest::prelude::*;
use std::collections::BTreeMap;

const KEYS: &[&str] = &[
    "query",
    "query_text",
    "query_vector",
    "max_vector_results",
    "priority",
    "entity_source",
    "entity_sources",
    "entity_ids",
    "limit",
    "tags",
];

fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,30}",
        "[a-z_| ]{0,30}",
        Just("x|kw_wikipedia".to_string()),
        Just("wikipedia|multi_2".to_string()),
        Just("search wikidata entries".to_string()),
        Just("resolve an ipfs path".to_string()),
        Just("wikipedia".to_string()),
        Just("ipld".to_string()),
        Just("QmXoypiz".to_string()),
        Just("bafybeig".to_string()),
    ]
}

fn leaf() -> impl Strategy<Value = QueryValue> {
    prop_oneof![
        Just(QueryValue::Null),
        any::<bool>().prop_map(QueryValue::Bool),
        any::<i64>().prop_map(QueryValue::Int),
        (-1.0e6..1.0e6f64).prop_map(QueryValue::Float),
        text().prop_map(QueryValue::Text),
    ]
}

fn value() -> impl Strategy<Value = QueryValue> {
    prop_oneof![
        3 => leaf(),
        1 => prop::collection::vec(leaf(), 0..16).prop_map(QueryValue::List),
    ]
}

fn fields() -> impl Strategy<Value = BTreeMap<String, QueryValue>> {
    prop::collection::btree_map(prop::sample::select(KEYS).prop_map(String::from), value(), 0..6)
}

fn build(entries: impl Iterator<Item = (String, QueryValue)>) -> Query {
    let mut query = Query::new();
    for (key, value) in entries {
        query.insert(key, value);
    }
    query
}

proptest! {
    #[test]
    fn fingerprint_is_deterministic(fields in fields()) {
        let q = build(fields.into_iter());
        prop_assert_eq!(fingerprint(&q), fingerprint(&q.clone()));
    }

    #[test]
    fn insertion_order_does_not_matter(fields in fields()) {
        let forward = build(fields.clone().into_iter());
        let backward = build(fields.into_iter().rev());
        prop_assert_eq!(fingerprint(&forward), fingerprint(&backward));
        prop_assert_eq!(detect(&forward), detect(&backward));
    }

    #[test]
    fn elided_list_contents_do_not_matter(
        fields in fields(),
        a in prop::collection::vec(any::<i64>(), 11..40),
        seed in any::<i64>(),
    ) {
        let b: Vec<i64> = a.iter().map(|x| x.wrapping_add(seed)).collect();
        let qa = build(fields.clone().into_iter()).with("payload", a);
        let qb = build(fields.into_iter()).with("payload", b);
        prop_assert_eq!(fingerprint(&qa), fingerprint(&qb));
    }

    #[test]
    fn vector_contents_do_not_matter(
        fields in fields(),
        len in 0usize..64,
        x in -1.0f64..1.0,
        y in -1.0f64..1.0,
    ) {
        let qa = build(fields.clone().into_iter()).with("query_vector", vec![x; len]);
        let qb = build(fields.into_iter()).with("query_vector", vec![y; len]);
        prop_assert_eq!(fingerprint(&qa), fingerprint(&qb));
    }

    #[test]
    fn repeat_lookup_is_a_hit(fields in fields()) {
        let q = build(fields.into_iter());
        let mut cache = FingerprintCache::new(16);

        let first = cache.lookup(&q);
        let hits = cache.hits();
        let second = cache.lookup(&q);

        let admitted = matches!(first, Lookup::Miss { admitted: true, .. });
        prop_assert!(admitted, "first lookup was {:?}", first);
        prop_assert!(second.is_hit());
        prop_assert_eq!(cache.hits(), hits + 1);
        prop_assert_eq!(first.into_value(), second.into_value());
    }

    #[test]
    fn cached_graph_type_matches_detection(
        queries in prop::collection::vec(fields(), 1..40),
    ) {
        let mut cache = GraphTypeCache::new(500);
        for fields in queries {
            let q = build(fields.into_iter());
            prop_assert_eq!(cache.lookup_or_compute(&q), detect(&q));
        }
    }

    #[test]
    fn growth_is_bounded(
        max_size in 0usize..8,
        queries in prop::collection::vec(fields(), 0..60),
    ) {
        let mut fingerprints = FingerprintCache::new(max_size);
        let mut graph_types = GraphTypeCache::new(max_size);
        for fields in queries {
            let q = build(fields.into_iter());
            fingerprints.lookup_or_compute(&q);
            graph_types.lookup_or_compute(&q);
            prop_assert!(fingerprints.len() <= max_size);
            prop_assert!(graph_types.len() <= max_size);
        }
    }

    #[test]
    fn override_is_returned_verbatim(fields in fields(), label in "[a-z_]{1,12}") {
        let q = build(fields.into_iter()).with("graph_type", label.clone());
        let mut cache = GraphTypeCache::new(16);

        let result = cache.lookup_or_compute(&q);
        prop_assert_eq!(result.as_str(), label.as_str());
        prop_assert_eq!(result, GraphType::from_label(&label));
        prop_assert!(cache.is_empty());
        prop_assert_eq!(cache.hits(), 0);
        prop_assert_eq!(cache.accesses(), 1);
    }
}
