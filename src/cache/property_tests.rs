//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store, key and wrapper behaviour over generated
//! operation sequences.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::key::{canonical_query, subject_of};
use crate::cache::{get_or_fetch, shared, CacheKey, CacheStore, MockClock, DEFAULT_TTL};

// == Strategies ==
fn subject_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9:%]{1,12}"
}

fn path_strategy() -> impl Strategy<Value = String> {
    "(/[a-z0-9:]{1,8}){1,3}"
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,32}".prop_map(|s| json!(s)),
        ("[a-z]{1,8}", any::<bool>()).prop_map(|(k, b)| json!({ k: b })),
    ]
}

fn query_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z]{1,4}", "[a-z0-9]{0,4}"), 0..6)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: usize, value: Value },
    Get { key: usize },
    Delete { key: usize },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (0usize..8, value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        (0usize..8).prop_map(|key| CacheOp::Get { key }),
        (0usize..8).prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // The store behaves like a plain map while nothing has expired.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new();
        let mut model: HashMap<String, Value> = HashMap::new();
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let key = format!("k{}", key);
                    store.set(key.clone(), value.clone(), DEFAULT_TTL);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let key = format!("k{}", key);
                    let expected = model.get(&key).cloned();
                    match &expected {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                    prop_assert_eq!(store.get(&key), expected);
                }
                CacheOp::Delete { key } => {
                    let key = format!("k{}", key);
                    prop_assert_eq!(store.delete(&key), model.remove(&key).is_some());
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.total, model.len());
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
    }

    // Setting the same key twice always yields the second value.
    #[test]
    fn prop_overwrite_semantics(v1 in value_strategy(), v2 in value_strategy()) {
        let mut store = CacheStore::new();

        store.set("key", v1, DEFAULT_TTL);
        store.set("key", v2.clone(), DEFAULT_TTL);

        prop_assert_eq!(store.get("key"), Some(v2));
        prop_assert_eq!(store.len(), 1);
    }

    // Invalidating one subject never touches another subject's entries.
    #[test]
    fn prop_subject_isolation(
        a in subject_strategy(),
        b in subject_strategy(),
        path in path_strategy(),
        query in query_strategy(),
    ) {
        prop_assume!(a != b);
        let mut store = CacheStore::new();
        let key_a = CacheKey::new("api", Some(&a), &path, &query).unwrap().to_string();
        let key_b = CacheKey::new("api", Some(&b), &path, &query).unwrap().to_string();

        store.set(key_a.clone(), json!("a"), DEFAULT_TTL);
        store.set(key_b.clone(), json!("b"), DEFAULT_TTL);

        prop_assert_eq!(store.clear_for_subject(&b), 1);
        prop_assert_eq!(store.get(&key_a), Some(json!("a")));
        prop_assert_eq!(store.get(&key_b), None);
    }

    // The subject round-trips through key derivation even with separators in it.
    #[test]
    fn prop_subject_is_recoverable(
        subject in subject_strategy(),
        path in path_strategy(),
        query in query_strategy(),
    ) {
        let key = CacheKey::new("user", Some(&subject), &path, &query).unwrap();
        let rendered = key.to_string();
        prop_assert_eq!(subject_of(&rendered), Some(key.subject()));
    }

    // Reordering distinct parameter names does not change the key.
    #[test]
    fn prop_query_order_is_canonical(query in query_strategy()) {
        let mut deduped: Vec<(String, String)> = Vec::new();
        for (name, value) in query {
            if !deduped.iter().any(|(n, _)| *n == name) {
                deduped.push((name, value));
            }
        }
        let mut reversed = deduped.clone();
        reversed.reverse();

        prop_assert_eq!(canonical_query(&deduped).unwrap(), canonical_query(&reversed).unwrap());
    }

    // A sweep removes exactly the expired entries and leaves zero expired.
    #[test]
    fn prop_sweep_removes_exactly_expired(ttls in prop::collection::vec(1u64..200, 1..40), elapsed in 0u64..250) {
        let clock = MockClock::starting_at(10_000);
        let mut store = CacheStore::with_clock(Arc::new(clock.clone()));

        for (i, ttl) in ttls.iter().enumerate() {
            store.set(format!("k{}", i), json!(i), Duration::from_millis(*ttl));
        }
        clock.advance(Duration::from_millis(elapsed));

        let expected_expired = ttls.iter().filter(|ttl| elapsed > **ttl).count();
        prop_assert_eq!(store.stats().expired, expected_expired);
        prop_assert_eq!(store.sweep_expired(), expected_expired);

        let stats = store.stats();
        prop_assert_eq!(stats.expired, 0);
        prop_assert_eq!(stats.total, ttls.len() - expected_expired);
    }

    // The wrapped read runs once per key until invalidated.
    #[test]
    fn prop_wrapper_fetches_once_per_key(keys in prop::collection::vec(0usize..5, 1..30)) {
        let cache = shared(CacheStore::new());
        let calls = AtomicUsize::new(0);

        tokio_test::block_on(async {
            for key in &keys {
                get_or_fetch(&cache, &format!("k{}", key), DEFAULT_TTL, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(json!({"success": true}))
                })
                .await
                .unwrap();
            }
        });

        let distinct: std::collections::HashSet<_> = keys.iter().collect();
        prop_assert_eq!(calls.load(Ordering::SeqCst), distinct.len());
    }
}
