//! Order-statistics store: one binary search tree of codes per area.
//!
//! Each area keeps its codes twice: in a BST (a multiset; equal codes go
//! right) and in an arrival queue. The two always hold the same number of
//! entries. Compaction evicts the oldest arrivals, with the batch size
//! derived from the number of insertion orders that rebuild the tree's
//! current shape.

use crate::combinatorics::insertion_orders;
use crate::entity::{AreaId, Capacity};
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug)]
struct BstNode {
    code: u32,
    left: Option<Box<BstNode>>,
    right: Option<Box<BstNode>>,
}

impl BstNode {
    fn new(code: u32) -> Self {
        Self {
            code,
            left: None,
            right: None,
        }
    }
}

/// Unbalanced BST over codes, duplicates allowed.
#[derive(Debug, Default)]
pub struct CodeTree {
    root: Option<Box<BstNode>>,
    len: usize,
}

impl CodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, code: u32) {
        insert_into(&mut self.root, code);
        self.len += 1;
    }

    /// Remove one node holding `code`. Returns false if none exists.
    pub fn remove(&mut self, code: u32) -> bool {
        let removed = remove_from(&mut self.root, code);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Codes in ascending order.
    pub fn in_order(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.len);
        walk_in_order(self.root.as_deref(), &mut out);
        out
    }

    /// Codes level by level, left to right.
    pub fn breadth_first(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.len);
        let mut queue: VecDeque<&BstNode> = self.root.as_deref().into_iter().collect();
        while let Some(node) = queue.pop_front() {
            out.push(node.code);
            if let Some(left) = node.left.as_deref() {
                queue.push_back(left);
            }
            if let Some(right) = node.right.as_deref() {
                queue.push_back(right);
            }
        }
        out
    }

    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<&BstNode> = self.root.as_deref().into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level
                .into_iter()
                .flat_map(|node| [node.left.as_deref(), node.right.as_deref()])
                .flatten()
                .collect();
        }
        height
    }
}

impl Drop for CodeTree {
    fn drop(&mut self) {
        let mut pending: Vec<Box<BstNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

// The tree is unbalanced and repeated codes chain to the right, so depth can
// reach the number of entries. Every walk below loops instead of recursing.

fn insert_into(slot: &mut Option<Box<BstNode>>, code: u32) {
    let mut cursor = slot;
    while let Some(node) = cursor {
        cursor = if code >= node.code {
            &mut node.right
        } else {
            &mut node.left
        };
    }
    *cursor = Some(Box::new(BstNode::new(code)));
}

fn remove_from(slot: &mut Option<Box<BstNode>>, code: u32) -> bool {
    let mut cursor = slot;
    loop {
        let go_right = match cursor.as_deref() {
            None => return false,
            Some(node) if node.code == code => break,
            Some(node) => code > node.code,
        };
        let Some(node) = cursor else {
            return false;
        };
        cursor = if go_right {
            &mut node.right
        } else {
            &mut node.left
        };
    }

    let Some(node) = cursor.as_mut() else {
        return false;
    };
    if node.left.is_some() && node.right.is_some() {
        // Two children: take over the in-order successor's code.
        if let Some(successor) = take_min(&mut node.right) {
            node.code = successor;
        }
    } else {
        let child = node.left.take().or_else(|| node.right.take());
        *cursor = child;
    }
    true
}

/// Unlink the leftmost node under `slot` and return its code.
fn take_min(slot: &mut Option<Box<BstNode>>) -> Option<u32> {
    let mut cursor = slot;
    while cursor.as_deref().is_some_and(|node| node.left.is_some()) {
        let Some(node) = cursor else {
            return None;
        };
        cursor = &mut node.left;
    }
    let BstNode { code, right, .. } = *cursor.take()?;
    *cursor = right;
    Some(code)
}

fn walk_in_order(root: Option<&BstNode>, out: &mut Vec<u32>) {
    let mut stack = Vec::new();
    let mut current = root;
    while current.is_some() || !stack.is_empty() {
        while let Some(node) = current {
            stack.push(node);
            current = node.left.as_deref();
        }
        if let Some(node) = stack.pop() {
            out.push(node.code);
            current = node.right.as_deref();
        }
    }
}

/// One area: its code tree plus arrival order.
#[derive(Debug, Default)]
pub struct AreaTree {
    tree: CodeTree,
    arrivals: VecDeque<u32>,
}

impl AreaTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    pub fn tree(&self) -> &CodeTree {
        &self.tree
    }

    /// Codes in arrival order, oldest first.
    pub fn arrivals(&self) -> impl Iterator<Item = u32> + '_ {
        self.arrivals.iter().copied()
    }

    pub fn insert(&mut self, code: u32) {
        self.tree.insert(code);
        self.arrivals.push_back(code);
    }

    /// Evict up to `count` of the oldest codes, returning them oldest first.
    pub fn evict_batch(&mut self, count: usize) -> Vec<u32> {
        let count = count.min(self.arrivals.len());
        let mut evicted = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(code) = self.arrivals.pop_front() else {
                break;
            };
            self.tree.remove(code);
            evicted.push(code);
        }
        evicted
    }

    /// Batch size for the next compaction.
    ///
    /// Insertion orders of the tree's breadth-first sequence, reduced modulo
    /// the capacity and capped at the tree size. Trees of size 0 or 1 give 0.
    pub fn eviction_size(&self, capacity: Capacity) -> usize {
        if self.tree.len() <= 1 {
            return 0;
        }
        let orders = insertion_orders(&self.tree.breadth_first());
        let reduced = (orders % u64::from(capacity.get())) as usize;
        reduced.min(self.tree.len())
    }
}

/// Codes evicted from one area during compaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaEviction {
    pub area: AreaId,
    pub codes: Vec<u32>,
}

/// All areas of the order-statistics store, created on first insert.
#[derive(Debug, Default)]
pub struct OrderStatisticsStore {
    areas: BTreeMap<AreaId, AreaTree>,
}

impl OrderStatisticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, area: AreaId, code: u32) {
        self.areas.entry(area).or_default().insert(code);
    }

    pub fn area(&self, area: AreaId) -> Option<&AreaTree> {
        self.areas.get(&area)
    }

    /// Number of areas ever created.
    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    /// Codes held across every area.
    pub fn len(&self) -> usize {
        self.areas.values().map(AreaTree::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Codes of `area` ascending; empty when the area does not exist.
    pub fn dump_area(&self, area: AreaId) -> Vec<u32> {
        self.areas
            .get(&area)
            .map(|a| a.tree.in_order())
            .unwrap_or_default()
    }

    /// Size and evict a batch from every area, in ascending area order.
    ///
    /// Areas that evict nothing are left out of the report.
    pub fn compact(&mut self, capacity: Capacity) -> Vec<AreaEviction> {
        let mut report = Vec::new();
        for (&area, tree) in self.areas.iter_mut() {
            let size = tree.eviction_size(capacity);
            if size == 0 {
                continue;
            }
            let codes = tree.evict_batch(size);
            tracing::debug!(area, evicted = codes.len(), remaining = tree.len(), "compacted area");
            report.push(AreaEviction { area, codes });
        }
        report
    }
}
