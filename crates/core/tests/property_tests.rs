use huffroute_core::combinatorics::insertion_orders;
use huffroute_core::encoding::{encode_name, Encoded};
use huffroute_core::heap_store::HeapStore;
use huffroute_core::huffman::{HuffmanTree, MAX_ROTATIONS};
use huffroute_core::order_stats::AreaTree;
use huffroute_core::{Capacity, Entity};
use proptest::prelude::*;

fn distinct_leaves() -> impl Strategy<Value = Vec<(char, u32)>> {
    prop::collection::btree_map(prop::char::range('a', 'z'), 1..50u32, 2..20)
        .prop_map(|m| m.into_iter().collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn test_code_and_area_in_range(name in "[a-zA-Z0-9_]{3,24}", cap in 1..2000u32) {
        let capacity = Capacity::new(cap).unwrap();
        if let Encoded::Accepted(encoding) = encode_name(&name, capacity).unwrap() {
            prop_assert!(encoding.entity.code() <= 1023);
            prop_assert!(encoding.area >= 1 && encoding.area <= cap);
        }
    }

    #[test]
    fn test_encoding_is_pure(name in "[a-zA-Z]{3,16}", cap in 1..50u32) {
        let capacity = Capacity::new(cap).unwrap();
        let a = encode_name(&name, capacity).unwrap();
        let b = encode_name(&name, capacity).unwrap();
        match (a, b) {
            (Encoded::Accepted(a), Encoded::Accepted(b)) => {
                prop_assert_eq!(a.entity, b.entity);
                prop_assert_eq!(a.tree, b.tree);
            }
            (Encoded::Rejected(a), Encoded::Rejected(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "outcomes differ"),
        }
    }

    #[test]
    fn test_weight_conserved_and_codes_prefix_free(leaves in distinct_leaves()) {
        let build = HuffmanTree::build(&leaves).unwrap();
        let total: u32 = leaves.iter().map(|&(_, w)| w).sum();
        prop_assert_eq!(build.tree.weight(), total);
        prop_assert!(!build.degenerate);

        let codes: Vec<String> = build.tree.codes().into_values().collect();
        prop_assert_eq!(codes.len(), leaves.len());
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    prop_assert!(!b.starts_with(a.as_str()));
                }
            }
        }
    }

    #[test]
    fn test_rotation_budget_respected(leaves in distinct_leaves()) {
        let build = HuffmanTree::build(&leaves).unwrap();
        prop_assert_eq!(build.stats.merges(), leaves.len() - 1);
        for &rotations in &build.stats.rotations_per_merge {
            prop_assert!(rotations <= MAX_ROTATIONS);
        }
    }

    #[test]
    fn test_heap_order_holds(ops in prop::collection::vec((1..8u32, 0..4usize, any::<bool>()), 1..80)) {
        let mut store = HeapStore::new();
        let mut next = 0u32;
        for (area, count, add) in ops {
            if add {
                store.add_entity(area, Entity::new("e", next));
                next += 2;
            } else {
                let before = store.bucket(area).map_or(0, |b| b.occupancy());
                let evicted = store.evict_from_area(area, count);
                prop_assert_eq!(evicted.len(), count.min(before));
            }
            prop_assert!(store.is_valid());
        }
    }

    #[test]
    fn test_area_tree_stays_in_step(codes in prop::collection::vec(0..1024u32, 0..40), evict in 0..50usize) {
        let mut area = AreaTree::new();
        for &code in &codes {
            area.insert(code);
        }
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        prop_assert_eq!(area.tree().in_order(), sorted);

        let evicted = area.evict_batch(evict);
        prop_assert_eq!(&evicted[..], &codes[..evict.min(codes.len())]);
        prop_assert_eq!(area.len(), area.tree().len());

        let mut rest = codes[evicted.len()..].to_vec();
        rest.sort_unstable();
        prop_assert_eq!(area.tree().in_order(), rest);
    }

    #[test]
    fn test_sorted_insertion_has_one_order(len in 0..30usize) {
        let seq: Vec<u32> = (0..len as u32).collect();
        prop_assert_eq!(insertion_orders(&seq), 1);
    }
}
