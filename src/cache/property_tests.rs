//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple reference model.

use proptest::prelude::*;

use crate::cache::{FloatKey, LruCache};

// == Strategies ==
/// Small key space so sequences hit existing keys often
fn key_strategy() -> impl Strategy<Value = i64> {
    0i64..16
}

/// A single cache operation
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: i64, value: i64 },
    Get { key: i64 },
    GetWrongType { key: i64 },
    Remove { key: i64 },
    Clear,
    Limit(usize),
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), any::<i64>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::GetWrongType { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
        1 => Just(CacheOp::Clear),
        1 => (0usize..8).prop_map(CacheOp::Limit),
    ]
}

// == Reference Model ==
/// Key/value pairs, most recently used first.
#[derive(Debug, Default)]
struct Model {
    order: Vec<(i64, i64)>,
    limit: usize,
}

impl Model {
    fn position(&self, key: i64) -> Option<usize> {
        self.order.iter().position(|(k, _)| *k == key)
    }

    fn enforce_limit(&mut self) {
        if self.limit > 0 {
            self.order.truncate(self.limit);
        }
    }

    /// Applies `op`, returning the value a typed read should observe.
    fn apply(&mut self, op: &CacheOp) -> Option<i64> {
        match *op {
            CacheOp::Set { key, value } => {
                if let Some(pos) = self.position(key) {
                    self.order.remove(pos);
                }
                self.order.insert(0, (key, value));
                self.enforce_limit();
                None
            }
            CacheOp::Get { key } => {
                let pos = self.position(key)?;
                let entry = self.order.remove(pos);
                self.order.insert(0, entry);
                Some(entry.1)
            }
            CacheOp::GetWrongType { .. } => None,
            CacheOp::Remove { key } => {
                self.order.retain(|(k, _)| *k != key);
                None
            }
            CacheOp::Clear => {
                self.order.clear();
                None
            }
            CacheOp::Limit(limit) => {
                self.limit = limit;
                self.enforce_limit();
                None
            }
        }
    }

    fn keys(&self) -> Vec<i64> {
        self.order.iter().map(|(k, _)| *k).collect()
    }
}

fn apply_to_cache(cache: &mut LruCache, op: &CacheOp) -> Option<i64> {
    match *op {
        CacheOp::Set { key, value } => {
            cache.set(key, value);
            None
        }
        CacheOp::Get { key } => cache.get::<i64, _>(&key).copied(),
        CacheOp::GetWrongType { key } => cache.get::<String, _>(&key).map(|_| i64::MIN),
        CacheOp::Remove { key } => {
            cache.remove_item(&key);
            None
        }
        CacheOp::Clear => {
            cache.remove_all_items();
            None
        }
        CacheOp::Limit(limit) => {
            cache.set_count_limit(limit);
            None
        }
    }
}

fn cache_keys(cache: &LruCache) -> Vec<i64> {
    cache
        .keys()
        .filter_map(|key| key.downcast_ref::<i64>().copied())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every observable result and the full recency order match the model
    // after each operation.
    #[test]
    fn prop_matches_reference_model(ops in prop::collection::vec(cache_op_strategy(), 1..120)) {
        let mut cache = LruCache::new();
        let mut model = Model::default();

        for op in &ops {
            let observed = apply_to_cache(&mut cache, op);
            let expected = model.apply(op);

            prop_assert_eq!(observed, expected, "read mismatch on {:?}", op);
            prop_assert_eq!(cache_keys(&cache), model.keys(), "order mismatch after {:?}", op);
            prop_assert_eq!(cache.count(), model.order.len());
            cache.assert_consistent();
        }
    }

    // Once a limit is set the count never exceeds it, including right after
    // the limit is lowered.
    #[test]
    fn prop_count_never_exceeds_limit(
        ops in prop::collection::vec(
            prop_oneof![
                (key_strategy(), any::<i64>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
                (1usize..6).prop_map(CacheOp::Limit),
            ],
            1..200
        )
    ) {
        let mut cache = LruCache::with_count_limit(5);

        for op in &ops {
            apply_to_cache(&mut cache, op);
            prop_assert!(
                cache.count() <= cache.count_limit(),
                "count {} exceeds limit {}",
                cache.count(),
                cache.count_limit()
            );
        }
    }

    // A re-set key is never the next eviction victim.
    #[test]
    fn prop_upsert_promotes(
        keys in prop::collection::hash_set(key_strategy(), 2..10),
        pick in any::<prop::sample::Index>()
    ) {
        let keys: Vec<i64> = keys.into_iter().collect();
        let mut cache = LruCache::new();
        for key in &keys {
            cache.set(*key, 0_i64);
        }

        let chosen = keys[pick.index(keys.len())];
        cache.set(chosen, 1_i64);
        prop_assert_eq!(cache.count(), keys.len());

        cache.set_count_limit(keys.len() - 1);
        prop_assert!(cache.contains_key(&chosen));
        prop_assert_eq!(cache.get::<i64, _>(&chosen), Some(&1));
    }

    // Integer and float keys with the same numeric value stay separate.
    #[test]
    fn prop_key_types_never_collide(keys in prop::collection::hash_set(-1000i64..1000, 1..30)) {
        let mut cache = LruCache::new();
        for key in &keys {
            cache.set(*key, "int");
            cache.set(FloatKey::from(*key as f64), "float");
        }

        prop_assert_eq!(cache.count(), keys.len() * 2);
        for key in &keys {
            prop_assert_eq!(cache.get::<&str, _>(key), Some(&"int"));
            prop_assert_eq!(cache.get::<&str, _>(&FloatKey::from(*key as f64)), Some(&"float"));
        }
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_eviction_order() {
        let mut model = Model {
            limit: 3,
            ..Model::default()
        };
        for key in 1..=4 {
            model.apply(&CacheOp::Set { key, value: key });
        }
        assert_eq!(model.keys(), vec![4, 3, 2]);
    }

    #[test]
    fn test_wrong_type_read_on_absent_key() {
        let mut cache = LruCache::new();
        assert!(apply_to_cache(&mut cache, &CacheOp::GetWrongType { key: 3 }).is_none());
        assert_eq!(cache.count(), 0);
    }
}
