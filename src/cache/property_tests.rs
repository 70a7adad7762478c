//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify counter accuracy, the capacity bound, and key
//! normalization over generated operation sequences.

use proptest::prelude::*;
use std::time::Duration;

use crate::cache::{derive_key, KeyedCache};

// == Test Configuration ==
const TEST_CAPACITY: usize = 8;
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,12}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations the hit/miss counters match what the
    // operations actually observed.
    #[test]
    fn prop_counter_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut cache = KeyedCache::new(TEST_CAPACITY, TEST_TTL);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.entries, cache.len());
    }

    // The entry count never exceeds the configured capacity, whatever the
    // insertion order.
    #[test]
    fn prop_capacity_bound(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let mut cache = KeyedCache::new(TEST_CAPACITY, TEST_TTL);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Get { key } => { cache.get(&key); }
            }
            prop_assert!(cache.len() <= TEST_CAPACITY);
        }
    }

    // A value set under any case variant of the parameters is found again
    // under any other case variant.
    #[test]
    fn prop_key_derivation_case_insensitive(name in "[a-zA-Z]{1,12}", skill in 0u8..=28) {
        let skill = skill.to_string();
        let lower = derive_key(&[&name.to_lowercase(), &skill]);
        let upper = derive_key(&[&name.to_uppercase(), &skill]);
        prop_assert_eq!(&lower, &upper);

        let mut cache = KeyedCache::new(TEST_CAPACITY, TEST_TTL);
        cache.set(lower, "xp".to_string());
        prop_assert!(cache.get(&upper).is_some());
    }

    // Distinct parameter tuples never derive the same key.
    #[test]
    fn prop_key_derivation_injective_on_flags(name in "[a-z]{1,12}", a in 0u8..=28, b in 0u8..=28) {
        prop_assume!(a != b);
        prop_assert_ne!(
            derive_key(&[&name, &a.to_string()]),
            derive_key(&[&name, &b.to_string()])
        );
    }
}
