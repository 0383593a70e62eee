//! Priority heap store: one indexed min-heap over every non-empty area.
//!
//! Each slot is an area bucket holding a FIFO queue of entities. Slots are
//! ordered by occupancy, then by recency stamp (older first), so index 0 is
//! always the least crowded, longest-untouched area. A position map from
//! area id to slot index keeps lookups constant-time; every swap updates it.
//!
//! # Invariants
//!
//! - Heap order holds at every index after each public call returns
//! - `positions[slot.area] == index` for every slot
//! - Buckets are never empty; a bucket that drains is removed from the heap

use crate::entity::{AreaId, Entity};
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

/// One area of the heap store.
#[derive(Debug, Clone)]
pub struct AreaBucket {
    area: AreaId,
    recency: u64,
    queue: VecDeque<Entity>,
}

impl AreaBucket {
    pub fn area(&self) -> AreaId {
        self.area
    }

    /// Number of entities held.
    pub fn occupancy(&self) -> usize {
        self.queue.len()
    }

    /// Stamp of the last touch; lower means longer untouched.
    pub fn recency(&self) -> u64 {
        self.recency
    }

    /// Up to `n` entities, most recent arrival first.
    pub fn peek_lifo(&self, n: usize) -> impl Iterator<Item = &Entity> + '_ {
        self.queue.iter().rev().take(n)
    }
}

/// Three-way heap order; `Less` means `a` belongs nearer the top.
pub fn compare_buckets(a: &AreaBucket, b: &AreaBucket) -> Ordering {
    a.occupancy()
        .cmp(&b.occupancy())
        .then_with(|| a.recency.cmp(&b.recency))
}

/// Entity removed from an area of the heap store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapEviction {
    pub area: AreaId,
    pub entity: Entity,
}

#[derive(Debug, Clone, Default)]
pub struct HeapStore {
    slots: Vec<AreaBucket>,
    positions: HashMap<AreaId, usize>,
    clock: u64,
}

impl HeapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-empty areas.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Entities held across every area.
    pub fn entity_count(&self) -> usize {
        self.slots.iter().map(AreaBucket::occupancy).sum()
    }

    pub fn bucket(&self, area: AreaId) -> Option<&AreaBucket> {
        self.positions.get(&area).map(|&i| &self.slots[i])
    }

    /// Slots in heap-array order.
    pub fn slots(&self) -> &[AreaBucket] {
        &self.slots
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    pub fn add_entity(&mut self, area: AreaId, entity: Entity) {
        let recency = self.tick();
        match self.positions.get(&area).copied() {
            Some(index) => {
                let bucket = &mut self.slots[index];
                bucket.recency = recency;
                bucket.queue.push_back(entity);
                self.sift_down(index);
            }
            None => {
                let index = self.slots.len();
                self.slots.push(AreaBucket {
                    area,
                    recency,
                    queue: VecDeque::from([entity]),
                });
                self.positions.insert(area, index);
                self.sift_up(index);
            }
        }
    }

    /// Dequeue up to `count` of the oldest entities of `area`.
    ///
    /// Returns them in removal order; empty if the area holds nothing.
    pub fn evict_from_area(&mut self, area: AreaId, count: usize) -> Vec<HeapEviction> {
        let Some(index) = self.positions.get(&area).copied() else {
            return Vec::new();
        };

        let bucket = &mut self.slots[index];
        let take = count.min(bucket.queue.len());
        let evicted: Vec<HeapEviction> = bucket
            .queue
            .drain(..take)
            .map(|entity| HeapEviction { area, entity })
            .collect();

        if self.slots[index].queue.is_empty() {
            self.remove_slot(index);
        } else if !evicted.is_empty() {
            let recency = self.tick();
            self.slots[index].recency = recency;
            self.repair(index);
        }
        evicted
    }

    /// The `k` lowest-ranked areas, lowest first. Does not touch the heap.
    pub fn top_k_areas(&self, k: usize) -> Vec<AreaId> {
        let mut sorted: Vec<&AreaBucket> = self.slots.iter().collect();
        sorted.sort_by(|a, b| compare_buckets(a, b));
        sorted.into_iter().take(k).map(AreaBucket::area).collect()
    }

    /// Up to `n` entities of `area`, most recent first.
    pub fn peek_area_lifo(&self, area: AreaId, n: usize) -> Vec<&Entity> {
        self.bucket(area)
            .map(|bucket| bucket.peek_lifo(n).collect())
            .unwrap_or_default()
    }

    /// Pre-order walk of the heap array, `n` LIFO entities per area.
    pub fn preorder(&self, n: usize) -> Vec<(AreaId, Vec<&Entity>)> {
        let mut out = Vec::with_capacity(self.slots.len());
        self.walk_preorder(0, n, &mut out);
        out
    }

    fn walk_preorder<'a>(&'a self, index: usize, n: usize, out: &mut Vec<(AreaId, Vec<&'a Entity>)>) {
        let Some(bucket) = self.slots.get(index) else {
            return;
        };
        out.push((bucket.area, bucket.peek_lifo(n).collect()));
        self.walk_preorder(2 * index + 1, n, out);
        self.walk_preorder(2 * index + 2, n, out);
    }

    /// True if every slot is ordered against its children and indexed.
    pub fn is_valid(&self) -> bool {
        let ordered = (1..self.slots.len())
            .all(|i| compare_buckets(&self.slots[(i - 1) / 2], &self.slots[i]) != Ordering::Greater);
        let indexed = self.positions.len() == self.slots.len()
            && self
                .slots
                .iter()
                .enumerate()
                .all(|(i, slot)| self.positions.get(&slot.area) == Some(&i));
        let non_empty = self.slots.iter().all(|slot| !slot.queue.is_empty());
        ordered && indexed && non_empty
    }

    fn remove_slot(&mut self, index: usize) {
        let last = self.slots.len() - 1;
        self.swap(index, last);
        if let Some(removed) = self.slots.pop() {
            self.positions.remove(&removed.area);
        }
        if index < self.slots.len() {
            self.repair(index);
        }
    }

    fn repair(&mut self, index: usize) {
        let index = self.sift_up(index);
        self.sift_down(index);
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.slots.swap(a, b);
        self.positions.insert(self.slots[a].area, a);
        self.positions.insert(self.slots[b].area, b);
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if compare_buckets(&self.slots[index], &self.slots[parent]) == Ordering::Less {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && compare_buckets(&self.slots[left], &self.slots[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < len && compare_buckets(&self.slots[right], &self.slots[smallest]) == Ordering::Less {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(code: u32) -> Entity {
        Entity::new(format!("e{}", code), code)
    }

    fn codes(entities: &[&Entity]) -> Vec<u32> {
        entities.iter().map(|e| e.code()).collect()
    }

    #[test]
    fn test_new_area_has_occupancy_one() {
        let mut store = HeapStore::new();
        store.add_entity(4, entity(2));
        let bucket = store.bucket(4).unwrap();
        assert_eq!(bucket.occupancy(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_lower_occupancy_wins() {
        let mut store = HeapStore::new();
        for code in [2, 4, 6] {
            store.add_entity(7, entity(code));
        }
        store.add_entity(2, entity(8));

        assert_eq!(store.top_k_areas(1), vec![2]);
        assert_eq!(store.slots()[0].area(), 2);
        assert!(store.is_valid());
    }

    #[test]
    fn test_recency_breaks_ties() {
        let mut store = HeapStore::new();
        store.add_entity(1, entity(10));
        store.add_entity(2, entity(20));
        store.add_entity(3, entity(30));
        assert_eq!(store.top_k_areas(3), vec![1, 2, 3]);

        // touching area 1 makes it the most recent of the occupancy-2 group
        store.add_entity(1, entity(12));
        store.add_entity(2, entity(22));
        assert_eq!(store.top_k_areas(3), vec![3, 1, 2]);
        assert!(store.is_valid());
    }

    #[test]
    fn test_top_k_does_not_mutate() {
        let mut store = HeapStore::new();
        for (area, code) in [(5, 2), (6, 4), (5, 6)] {
            store.add_entity(area, entity(code));
        }
        let before: Vec<AreaId> = store.slots().iter().map(AreaBucket::area).collect();
        assert_eq!(store.top_k_areas(10), vec![6, 5]);
        let after: Vec<AreaId> = store.slots().iter().map(AreaBucket::area).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_evict_then_peek() {
        let mut store = HeapStore::new();
        for code in [2, 4, 6, 8] {
            store.add_entity(3, entity(code));
        }

        let evicted = store.evict_from_area(3, 2);
        assert_eq!(
            evicted.iter().map(|e| e.entity.code()).collect::<Vec<_>>(),
            vec![2, 4]
        );
        assert_eq!(codes(&store.peek_area_lifo(3, 10)), vec![8, 6]);
        assert_eq!(store.bucket(3).unwrap().occupancy(), 2);
    }

    #[test]
    fn test_drained_area_leaves_heap() {
        let mut store = HeapStore::new();
        store.add_entity(1, entity(2));
        store.add_entity(2, entity(4));
        store.add_entity(2, entity(6));
        store.add_entity(3, entity(8));

        let evicted = store.evict_from_area(1, 5);
        assert_eq!(evicted.len(), 1);
        assert!(store.bucket(1).is_none());
        assert_eq!(store.len(), 2);
        assert!(store.is_valid());

        // area comes back with a fresh bucket
        store.add_entity(1, entity(10));
        assert_eq!(store.bucket(1).unwrap().occupancy(), 1);
        assert!(store.is_valid());
    }

    #[test]
    fn test_evict_missing_area_is_noop() {
        let mut store = HeapStore::new();
        store.add_entity(1, entity(2));
        assert!(store.evict_from_area(9, 3).is_empty());
        assert!(store.evict_from_area(1, 0).is_empty());
        assert_eq!(store.entity_count(), 1);
    }

    #[test]
    fn test_partial_evict_can_move_up() {
        let mut store = HeapStore::new();
        store.add_entity(1, entity(2));
        store.add_entity(1, entity(4));
        for code in [6, 8, 10, 12] {
            store.add_entity(2, entity(code));
        }
        store.add_entity(3, entity(14));
        store.add_entity(3, entity(16));
        store.add_entity(3, entity(18));

        store.evict_from_area(2, 3);
        assert!(store.is_valid());
        assert_eq!(store.top_k_areas(1), vec![2]);
    }

    #[test]
    fn test_preorder() {
        let mut store = HeapStore::new();
        store.add_entity(1, entity(2));
        store.add_entity(1, entity(4));
        store.add_entity(2, entity(6));
        store.add_entity(3, entity(8));
        store.add_entity(3, entity(10));
        store.add_entity(3, entity(12));

        let walk = store.preorder(2);
        let areas: Vec<AreaId> = walk.iter().map(|(area, _)| *area).collect();
        assert_eq!(areas, vec![2, 1, 3]);
        assert_eq!(codes(&walk[2].1), vec![12, 10]);
    }
}
