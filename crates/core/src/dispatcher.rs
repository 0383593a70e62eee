//! The dispatcher: owns both stores and the retained Huffman tree.
//!
//! Every request runs to completion before the next one starts. Callers
//! that expose the dispatcher behind a service boundary must serialize
//! requests themselves; nothing in here locks.

use crate::cipher::Rejection;
use crate::encoding::{encode_name, Encoded};
use crate::entity::{AreaId, Capacity, Entity, StoreKind};
use crate::error::Result;
use crate::heap_store::{HeapEviction, HeapStore};
use crate::huffman::{HuffmanTree, TreeItem};
use crate::metrics::Metrics;
use crate::order_stats::{AreaEviction, OrderStatisticsStore};

/// Where an accepted entity was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub code: u32,
    pub area: AreaId,
    pub store: StoreKind,
}

/// Result of [`Dispatcher::encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOutcome {
    /// Name refused; nothing changed
    Rejected(Rejection),

    /// Entity routed by the parity of its code
    Routed(Placement),

    /// Build collapsed; entity placed with code 0 in the fallback area
    Degenerate(Placement),
}

impl EncodeOutcome {
    pub fn placement(&self) -> Option<Placement> {
        match self {
            EncodeOutcome::Rejected(_) => None,
            EncodeOutcome::Routed(p) | EncodeOutcome::Degenerate(p) => Some(*p),
        }
    }
}

#[derive(Debug)]
pub struct Dispatcher {
    capacity: Capacity,
    order_stats: OrderStatisticsStore,
    heap: HeapStore,
    retained: Option<HuffmanTree>,
    metrics: Metrics,
}

impl Dispatcher {
    pub fn new(capacity: Capacity) -> Self {
        Self {
            capacity,
            order_stats: OrderStatisticsStore::new(),
            heap: HeapStore::new(),
            retained: None,
            metrics: Metrics::new(),
        }
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Replace the area range used by later encodes.
    ///
    /// # Errors
    /// `Error::InvalidCapacity` when `n` is zero; the old capacity is kept.
    pub fn set_capacity(&mut self, n: u32) -> Result<()> {
        self.capacity = Capacity::new(n)?;
        tracing::info!(capacity = n, "capacity set");
        Ok(())
    }

    /// Encode `name` and route the resulting entity.
    ///
    /// Rejected names leave every piece of state untouched, including the
    /// retained tree.
    pub fn encode(&mut self, name: &str) -> Result<EncodeOutcome> {
        self.metrics.encodes_requested += 1;

        let encoding = match encode_name(name, self.capacity)? {
            Encoded::Rejected(rejection) => {
                self.metrics.encodes_rejected += 1;
                tracing::debug!(name, %rejection, "name rejected");
                return Ok(EncodeOutcome::Rejected(rejection));
            }
            Encoded::Accepted(encoding) => encoding,
        };

        self.metrics.rebalance_rotations += u64::from(encoding.stats.total_rotations());
        self.retained = Some(encoding.tree);

        let placement = Placement {
            code: encoding.entity.code(),
            area: encoding.area,
            store: encoding.store,
        };
        self.place(placement, encoding.entity);

        tracing::debug!(
            name,
            code = placement.code,
            area = placement.area,
            store = ?placement.store,
            degenerate = encoding.degenerate,
            "entity routed"
        );

        if encoding.degenerate {
            self.metrics.encodes_degenerate += 1;
            Ok(EncodeOutcome::Degenerate(placement))
        } else {
            Ok(EncodeOutcome::Routed(placement))
        }
    }

    fn place(&mut self, placement: Placement, entity: Entity) {
        match placement.store {
            StoreKind::OrderStatistics => {
                self.order_stats.insert(placement.area, placement.code);
                self.metrics.routed_order_statistics += 1;
            }
            StoreKind::Heap => {
                self.heap.add_entity(placement.area, entity);
                self.metrics.routed_heap += 1;
            }
        }
    }

    /// Evict a combinatorially sized batch of the oldest codes from every
    /// order-statistics area.
    pub fn compact_order_statistics_store(&mut self) -> Vec<AreaEviction> {
        let report = self.order_stats.compact(self.capacity);
        let evicted: usize = report.iter().map(|e| e.codes.len()).sum();

        self.metrics.order_statistics_compactions += 1;
        self.metrics.evicted_order_statistics += evicted as u64;
        tracing::debug!(areas = report.len(), evicted, "order-statistics store compacted");
        report
    }

    /// Evict up to `k` entities from each of the `k` lowest-ranked heap areas,
    /// lowest first.
    pub fn compact_heap_store(&mut self, k: usize) -> Vec<HeapEviction> {
        let areas = self.heap.top_k_areas(k);
        let mut report = Vec::new();
        for area in areas {
            report.extend(self.heap.evict_from_area(area, k));
        }

        self.metrics.heap_compactions += 1;
        self.metrics.evicted_heap += report.len() as u64;
        tracing::debug!(k, evicted = report.len(), "heap store compacted");
        report
    }

    /// In-order dump of the retained tree; empty if nothing was retained.
    pub fn dump_retained_tree(&self) -> Vec<TreeItem> {
        self.retained
            .as_ref()
            .map(HuffmanTree::in_order)
            .unwrap_or_default()
    }

    /// Codes of one order-statistics area, ascending.
    pub fn dump_area(&self, area: AreaId) -> Vec<u32> {
        self.order_stats.dump_area(area)
    }

    /// Pre-order walk of the heap with up to `k` entities per area, most
    /// recent first.
    pub fn dump_heap_preorder(&self, k: usize) -> Vec<(AreaId, &Entity)> {
        self.heap
            .preorder(k)
            .into_iter()
            .flat_map(|(area, entities)| entities.into_iter().map(move |e| (area, e)))
            .collect()
    }

    pub fn retained_tree(&self) -> Option<&HuffmanTree> {
        self.retained.as_ref()
    }

    pub fn order_statistics(&self) -> &OrderStatisticsStore {
        &self.order_stats
    }

    pub fn heap(&self) -> &HeapStore {
        &self.heap
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Stop the run clock and hand back the final metrics.
    pub fn finish(&mut self) -> &Metrics {
        self.metrics.complete();
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(capacity: u32) -> Dispatcher {
        Dispatcher::new(Capacity::new(capacity).unwrap())
    }

    #[test]
    fn test_rejection_changes_nothing() {
        let mut d = dispatcher(10);
        d.encode("Alice").unwrap();
        let retained = d.retained_tree().cloned();

        let outcome = d.encode("aa").unwrap();
        assert!(matches!(outcome, EncodeOutcome::Rejected(_)));
        assert_eq!(d.retained_tree().cloned(), retained);
        assert_eq!(d.heap().entity_count(), 1);
        assert_eq!(d.metrics().encodes_rejected, 1);
    }

    #[test]
    fn test_alice_routes_to_heap() {
        let mut d = dispatcher(10);
        let outcome = d.encode("Alice").unwrap();
        assert_eq!(
            outcome,
            EncodeOutcome::Routed(Placement {
                code: 946,
                area: 7,
                store: StoreKind::Heap
            })
        );
        let dump = d.dump_heap_preorder(5);
        assert_eq!(dump.len(), 1);
        assert_eq!(dump[0].0, 7);
        assert_eq!(dump[0].1.name(), "Alice");
    }

    #[test]
    fn test_retained_tree_replaced() {
        let mut d = dispatcher(10);
        assert!(d.dump_retained_tree().is_empty());

        d.encode("Alice").unwrap();
        let first = d.dump_retained_tree();
        d.encode("abc").unwrap();
        let second = d.dump_retained_tree();
        assert_ne!(first, second);
        assert_eq!(second.len(), 5);
    }

    #[test]
    fn test_collapsed_name_takes_fallback_route() {
        let mut d = dispatcher(10);
        let name = format!("a{}{}", "b".repeat(26), "c".repeat(25));
        let outcome = d.encode(&name).unwrap();
        assert_eq!(
            outcome,
            EncodeOutcome::Degenerate(Placement {
                code: 0,
                area: 1,
                store: StoreKind::Heap
            })
        );
        assert_eq!(d.dump_retained_tree(), vec![TreeItem::Symbol('b')]);
        assert_eq!(d.metrics().encodes_degenerate, 1);
        assert_eq!(d.metrics().routed_heap, 1);

        let dump = d.dump_heap_preorder(1);
        assert_eq!(dump.len(), 1);
        assert_eq!(dump[0].0, 1);
        assert_eq!(dump[0].1.code(), 0);
    }

    #[test]
    fn test_set_capacity() {
        let mut d = dispatcher(10);
        assert!(d.set_capacity(0).is_err());
        assert_eq!(d.capacity().get(), 10);

        d.set_capacity(1).unwrap();
        let placement = d.encode("Alice").unwrap().placement().unwrap();
        assert_eq!(placement.area, 1);
    }

    #[test]
    fn test_compact_heap_empty() {
        let mut d = dispatcher(3);
        assert!(d.compact_heap_store(4).is_empty());
        assert!(d.compact_order_statistics_store().is_empty());
        assert_eq!(d.metrics().heap_compactions, 1);
    }
}
