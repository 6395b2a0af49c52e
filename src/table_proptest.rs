#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check the
// slot-level counters and probe reachability after every operation.

use crate::config::TableConfig;
use crate::table::HashTable;
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations so shrinking converges on short key lists.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, Vec<u8>),
    Delete(usize),
    Lookup(usize),
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<Op>)> {
    proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..6), 1..=120)
        .prop_flat_map(|pool| {
            let idx = 0..pool.len();
            let op = prop_oneof![
                8 => (idx.clone(), proptest::collection::vec(any::<u8>(), 0..4))
                    .prop_map(|(i, v)| Op::Insert(i, v)),
                4 => idx.clone().prop_map(Op::Delete),
                3 => idx.prop_map(Op::Lookup),
                1 => Just(Op::Clear),
            ];
            proptest::collection::vec(op, 1..400).prop_map(move |ops| (pool.clone(), ops))
        })
}

fn run(config: TableConfig, pool: &[Vec<u8>], ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut sut = HashTable::with_config(config);
    let mut model: HashMap<Vec<u8>, Vec<u8>> = HashMap::new();

    for op in ops {
        let used_before = sut.stats().used;
        let cap_before = sut.capacity();
        match op {
            Op::Insert(i, v) => {
                let k = &pool[i];
                let existed = model.contains_key(k);
                let live_before = sut.len();
                sut.insert(k, &v);
                if existed {
                    prop_assert_eq!(sut.len(), live_before);
                }
                model.insert(k.clone(), v);
            }
            Op::Delete(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.delete(k), model.remove(k).is_some());
                if sut.capacity() == cap_before {
                    prop_assert_eq!(sut.stats().used, used_before);
                }
            }
            Op::Lookup(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.lookup(k), model.get(k).map(Vec::as_slice));
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), sut.base_capacity());
            }
        }

        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.stats().load_factor < 1.0);
    }

    for (k, v) in &model {
        prop_assert_eq!(sut.lookup(k), Some(v.as_slice()));
    }
    Ok(())
}

// Property: the table matches a HashMap model and keeps its structural
// invariants (prime capacity, live/used counts, unique and reachable keys)
// across random insert/delete/lookup/clear sequences.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(TableConfig::default(), &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_without_shrink((pool, ops) in arb_scenario()) {
        run(TableConfig::new().with_shrink(false), &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_dense((pool, ops) in arb_scenario()) {
        run(TableConfig::new().with_grow_at(0.95).with_shrink_below(0.3), &pool, ops)?;
    }
}

// Thresholds anywhere in the range `TableConfig::validate` accepts.
fn arb_config() -> impl Strategy<Value = TableConfig> {
    (0.05f64..0.999, any::<bool>()).prop_flat_map(|(grow_at, shrink)| {
        (0.001f64..grow_at / 2.0).prop_map(move |shrink_below| {
            TableConfig::new()
                .with_grow_at(grow_at)
                .with_shrink_below(shrink_below)
                .with_shrink(shrink)
        })
    })
}

// Property: the state machine above holds for any accepted pair of
// thresholds, including ones at the edges where a shrink lands next to the
// grow threshold or the grow threshold sits above `(capacity - 1) / capacity`.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_any_thresholds(config in arb_config(), (pool, ops) in arb_scenario()) {
        prop_assert!(config.validate().is_ok());
        run(config, &pool, ops)?;
    }
}

// Property: every probe of every operation stays within `capacity` attempts;
// a missing key is reported as absent even when the table is mostly
// tombstones.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_absent_keys_terminate(n in 1usize..200) {
        let mut t = HashTable::with_config(TableConfig::new().with_shrink(false));
        for i in 0..n {
            t.insert(i.to_le_bytes(), b"v");
        }
        for i in 0..n {
            prop_assert!(t.delete(i.to_le_bytes()));
        }
        for i in n..n + 50 {
            prop_assert_eq!(t.lookup(i.to_le_bytes()), None);
            prop_assert!(!t.delete(i.to_le_bytes()));
        }
        t.assert_invariants();
    }
}
