use super::*;

use crate::compress::{compute_branch, compute_skip};
use crate::key::field_after;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn validate_trie<K: TrieKey, V>(t: &LcTrie<K, V>) {
    if t.entries.is_empty() {
        assert!(t.nodes.is_empty(), "empty trie must have no nodes");
        return;
    }

    for w in t.entries.windows(2) {
        assert!(w[0].key < w[1].key, "entries must be strictly ascending");
    }
    for e in &t.entries {
        assert!((e.value as usize) < t.values.len(), "value offset out of range");
    }

    let mut owner = vec![None; t.entries.len()];
    let mut reached = vec![false; t.nodes.len()];
    let mut stack: Vec<(usize, u32)> = vec![(0, 0)];
    while let Some((slot, pre)) = stack.pop() {
        assert!(!reached[slot], "slot {slot} reached twice");
        reached[slot] = true;

        let node = t.nodes[slot];
        if node.is_leaf() {
            assert_eq!(node.skip(), 0, "leaf skip must be zero");
            let entry = node.next() as usize;
            assert!(entry < t.entries.len(), "leaf entry out of range");
            if t.leaf_slot(t.entries[entry].key) == Some(slot) {
                assert!(owner[entry].is_none(), "entry {entry} owned by two leaves");
                owner[entry] = Some(slot);
            }
            continue;
        }

        let next = node.next() as usize;
        let width = 1usize << node.branch();
        assert!(next > slot, "children must follow their parent");
        assert!(next + width <= t.nodes.len(), "child block out of range");
        let child_pre = pre + node.skip() + node.branch();
        assert!(child_pre <= K::BITS, "node consumes more bits than the key has");
        for child in next..next + width {
            stack.push((child, child_pre));
        }
    }

    assert!(reached.iter().all(|&r| r), "unreachable node slot");
    assert!(owner.iter().all(|o| o.is_some()), "entry without a leaf");
}

fn pairs_strategy() -> impl Strategy<Value = Vec<(u32, u8)>> {
    // Mix uniform keys with keys clustered under a few prefixes so that both
    // deep skips and wide branches show up.
    let key = prop_oneof![
        any::<u32>(),
        (0u32..4, any::<u16>()).prop_map(|(hi, lo)| (hi << 30) | u32::from(lo)),
        (0u32..64).prop_map(|i| 0xc0a8_0000 | (i << 8)),
    ];
    prop::collection::vec((key, 0u8..40), 1..=600)
}

fn config_strategy() -> impl Strategy<Value = BuildConfig> {
    (
        prop_oneof![Just(1.0), Just(0.75), Just(0.5), Just(0.25)],
        prop::option::of(1u8..=12),
    )
        .prop_map(|(fill_factor, root_branch)| BuildConfig {
            fill_factor,
            root_branch,
            allow_empty: false,
        })
}

fn model_of(pairs: &[(u32, u8)]) -> BTreeMap<u32, u8> {
    // First value wins, matching how the trie keeps the first duplicate.
    let mut m = BTreeMap::new();
    for &(k, v) in pairs {
        m.entry(k).or_insert(v);
    }
    m
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(
        pairs in pairs_strategy(),
        queries in prop::collection::vec(any::<u32>(), 0..200),
    ) {
        let m = model_of(&pairs);
        let t: LcTrie<u32, u8> = LcTrie::build(m.iter().map(|(&k, &v)| (k, v))).unwrap();

        validate_trie(&t);
        prop_assert_eq!(t.len(), m.len());
        for (&k, v) in &m {
            prop_assert_eq!(t.lookup(k), Some(v));
        }
        for k in queries {
            prop_assert_eq!(t.lookup(k), m.get(&k));
        }

        let got: Vec<(u32, u8)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(u32, u8)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_equivalence_with_config(pairs in pairs_strategy(), config in config_strategy()) {
        let m = model_of(&pairs);
        let t: LcTrie<u32, u8> =
            LcTrie::build_with_config(m.iter().map(|(&k, &v)| (k, v)), &config).unwrap();

        validate_trie(&t);
        for (&k, v) in &m {
            prop_assert_eq!(t.lookup(k), Some(v));
            let neighbour = k.wrapping_add(1);
            prop_assert_eq!(t.lookup(neighbour), m.get(&neighbour));
        }
        if config.fill_factor == 1.0 && config.root_branch.is_none() {
            prop_assert_eq!(t.stats().empty_leaves, 0);
        }
    }

    #[test]
    fn prop_value_table_is_deduplicated(pairs in pairs_strategy()) {
        let m = model_of(&pairs);
        let t: LcTrie<u32, u8> = LcTrie::build(m.iter().map(|(&k, &v)| (k, v))).unwrap();

        let mut distinct: Vec<u8> = m.values().copied().collect();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(t.value_count(), distinct.len());
        for (i, a) in t.values().iter().enumerate() {
            prop_assert!(!t.values()[i + 1..].contains(a), "value {} stored twice", a);
        }
    }

    #[test]
    fn prop_input_order_irrelevant(pairs in pairs_strategy(), seed in any::<u64>()) {
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let m = model_of(&pairs);
        let sorted: Vec<(u32, u8)> = m.iter().map(|(&k, &v)| (k, v)).collect();
        let mut shuffled = sorted.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        let a: LcTrie<u32, u8> = LcTrie::build(sorted).unwrap();
        let b: LcTrie<u32, u8> = LcTrie::build(shuffled).unwrap();
        // Same key set, so the same shape; only the value table order may differ.
        prop_assert_eq!(a.nodes(), b.nodes());
        for (&k, v) in &m {
            prop_assert_eq!(b.lookup(k), Some(v));
        }
    }

    #[test]
    fn prop_skip_and_branch(pairs in pairs_strategy(), ff in prop_oneof![Just(1.0), Just(0.5)]) {
        let m = model_of(&pairs);
        let (entries, _) = dedup::dedup(m.into_iter()).unwrap();
        let n = entries.len();

        let skip = compute_skip(&entries, 0, n, 0);
        let first = entries[0].key;
        let last = entries[n - 1].key;
        let top = |k: u32| u64::from(k) >> (u32::BITS - skip);
        prop_assert_eq!(top(first), top(last));
        if skip < u32::BITS {
            prop_assert_ne!(field_after(first, skip, 1), field_after(last, skip, 1));
        }

        if n >= 2 {
            let p = compute_branch(&entries, 0, n, 0, skip, ff);
            prop_assert!(p.branch >= 1);
            prop_assert!(1usize << p.branch <= n);
            prop_assert_eq!(p.bounds().len(), p.children() - 1);

            let mut expect = 0;
            for j in 0..p.children() {
                let (lo, hi) = p.child(j);
                prop_assert_eq!(lo, expect);
                for e in &entries[lo..hi] {
                    prop_assert_eq!(field_after(e.key, skip, p.branch), j as u32);
                }
                expect = hi;
            }
            prop_assert_eq!(expect, n);
            if ff == 1.0 {
                prop_assert_eq!(p.empty_children(), 0);
            }
        }
    }
}

/// Every ordering of `items` (Heap's algorithm, iterative form).
fn orderings<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let mut current = items.to_vec();
    let mut swaps = vec![0usize; current.len()];
    let mut out = vec![current.clone()];
    let mut level = 1;
    while level < current.len() {
        if swaps[level] < level {
            let other = if level % 2 == 0 { 0 } else { swaps[level] };
            current.swap(other, level);
            out.push(current.clone());
            swaps[level] += 1;
            level = 1;
        } else {
            swaps[level] = 0;
            level += 1;
        }
    }
    out
}

#[test]
fn exhaustive_input_order_small_set() {
    let pairs: Vec<(u32, usize)> = vec![
        (0x00b7_4a03, 1),
        (0x00c0_0300, 3),
        (0xc025_4a00, 2),
        (0xc033_4100, 3),
        (0xc033_4101, 1),
        (0x7fff_ffff, 4),
    ];
    let reference: LcTrie<u32, usize> = LcTrie::build(pairs.clone()).unwrap();

    let all = orderings(&pairs);
    assert_eq!(all.len(), 720);
    for perm in all {
        let t: LcTrie<u32, usize> = LcTrie::build(perm).unwrap();
        validate_trie(&t);
        assert_eq!(t.nodes(), reference.nodes());
        for &(k, v) in &pairs {
            assert_eq!(t.lookup(k), Some(&v));
        }
        assert_eq!(t.lookup(0xc033_4102), None);
    }
}

#[test]
fn exhaustive_u8_subsets_of_sixteen() {
    // Every subset of sixteen spread-out u8 keys, under strict and sparse fill.
    let universe: Vec<u8> = (0..16u8).map(|i| i * 16 + (i % 3)).collect();
    for mask in 1u32..(1 << universe.len()) {
        let keys: Vec<u8> = universe
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &k)| k)
            .collect();
        for fill_factor in [1.0, 0.5] {
            let config = BuildConfig {
                fill_factor,
                ..BuildConfig::default()
            };
            let t: LcTrie<u8, u8> =
                LcTrie::build_with_config(keys.iter().map(|&k| (k, k % 5)), &config).unwrap();
            validate_trie(&t);
            for k in 0u8..=255 {
                let expected = keys.contains(&k).then(|| k % 5);
                assert_eq!(t.lookup(k).copied(), expected, "mask={mask:#x} key={k}");
            }
        }
    }
}
