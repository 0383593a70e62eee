//! Huffman tree construction with a bounded AVL-style rebalance.
//!
//! The tree is a routing artifact: it assigns each cipher symbol a bit path,
//! and those paths are folded into a numeric code. It is never used to emit
//! compressed data.
//!
//! # Construction
//!
//! Candidates are kept in a min-priority queue ordered by [`rank`]:
//!
//! 1. Smaller weight first
//! 2. Two leaves of equal weight: [`symbol_order`] of their symbols
//! 3. Otherwise: smaller sequence number first
//!
//! Leaves get sequence numbers `0..n` in input order; each merged node gets
//! the next number from a counter that starts at `n`. Each merge takes the
//! two best candidates (first popped goes left), then runs a rebalance pass
//! that stops after [`MAX_ROTATIONS`] rotations even if the subtree is still
//! unbalanced.
//!
//! # Degeneracy
//!
//! If a build ends with a leaf at the root the result is flagged degenerate
//! and carries no usable codes. This happens with a single input symbol,
//! which an accepted name reaches when every cipher output merges into one
//! character.

use crate::cipher::symbol_order;
use crate::error::HuffmanError;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;

/// Rotation budget for a single merge step.
pub const MAX_ROTATIONS: u32 = 3;

/// A node of the Huffman tree.
///
/// Internal nodes always have exactly two children; the weight of an
/// internal node is the sum of its children's weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: char,
        weight: u32,
    },
    Internal {
        weight: u32,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn leaf(symbol: char, weight: u32) -> Self {
        Node::Leaf { symbol, weight }
    }

    /// Join two subtrees, computing the parent weight.
    pub fn internal(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u32 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Height counting nodes; a single leaf has height 1.
    pub fn height(&self) -> u32 {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.height().max(right.height()) + 1,
        }
    }

    /// Left height minus right height (0 for leaves).
    fn balance(&self) -> i64 {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => left.height() as i64 - right.height() as i64,
        }
    }

    /// True when no node has children whose heights differ by more than 1.
    pub fn is_balanced(&self) -> bool {
        match self {
            Node::Leaf { .. } => true,
            Node::Internal { left, right, .. } => {
                self.balance().abs() <= 1 && left.is_balanced() && right.is_balanced()
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

fn rotate_right(node: Node) -> Node {
    match node {
        Node::Internal { left, right, .. } => match *left {
            Node::Internal {
                left: pivot_left,
                right: pivot_right,
                ..
            } => Node::internal(*pivot_left, Node::internal(*pivot_right, *right)),
            leaf => Node::internal(leaf, *right),
        },
        leaf => leaf,
    }
}

fn rotate_left(node: Node) -> Node {
    match node {
        Node::Internal { left, right, .. } => match *right {
            Node::Internal {
                left: pivot_left,
                right: pivot_right,
                ..
            } => Node::internal(Node::internal(*left, *pivot_left), *pivot_right),
            leaf => Node::internal(*left, leaf),
        },
        leaf => leaf,
    }
}

// Left-left gets a single right rotation, left-right a double.
fn fix_left_heavy(node: Node) -> Node {
    match node {
        Node::Internal { left, right, .. } => {
            let left = if left.balance() >= 0 {
                *left
            } else {
                rotate_left(*left)
            };
            rotate_right(Node::internal(left, *right))
        }
        leaf => leaf,
    }
}

fn fix_right_heavy(node: Node) -> Node {
    match node {
        Node::Internal { left, right, .. } => {
            let right = if right.balance() <= 0 {
                *right
            } else {
                rotate_right(*right)
            };
            rotate_left(Node::internal(*left, right))
        }
        leaf => leaf,
    }
}

/// One top-down pass: fix this node while budget remains, then descend.
fn rebalance_pass(mut node: Node, rotations: &mut u32) -> Node {
    while node.balance().abs() > 1 && *rotations < MAX_ROTATIONS {
        node = if node.balance() > 0 {
            fix_left_heavy(node)
        } else {
            fix_right_heavy(node)
        };
        *rotations += 1;
    }

    if *rotations >= MAX_ROTATIONS {
        return node;
    }

    match node {
        Node::Internal { left, right, .. } => {
            let left = rebalance_pass(*left, rotations);
            let right = if *rotations < MAX_ROTATIONS {
                rebalance_pass(*right, rotations)
            } else {
                *right
            };
            Node::internal(left, right)
        }
        leaf => leaf,
    }
}

/// Rebalance `node` until balanced or the rotation budget is spent.
///
/// Returns the new subtree and the number of rotations performed (a double
/// rotation counts once).
pub fn bounded_rebalance(mut node: Node) -> (Node, u32) {
    let mut rotations = 0;
    while !node.is_balanced() && rotations < MAX_ROTATIONS {
        let before = rotations;
        node = rebalance_pass(node, &mut rotations);
        if rotations == before {
            break;
        }
    }
    (node, rotations)
}

/// A queued subtree with its creation sequence number.
#[derive(Debug, Clone)]
struct Candidate {
    node: Node,
    seq: u64,
}

/// Total order over candidates; `Less` ranks first (is merged earlier).
fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    a.node
        .weight()
        .cmp(&b.node.weight())
        .then_with(|| match (&a.node, &b.node) {
            (Node::Leaf { symbol: x, .. }, Node::Leaf { symbol: y, .. }) => symbol_order(*x, *y),
            _ => a.seq.cmp(&b.seq),
        })
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        rank(self, other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        rank(self, other)
    }
}

/// Per-build counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Rotations spent by each merge step, in merge order
    pub rotations_per_merge: Vec<u32>,
}

impl BuildStats {
    pub fn merges(&self) -> usize {
        self.rotations_per_merge.len()
    }

    pub fn total_rotations(&self) -> u32 {
        self.rotations_per_merge.iter().sum()
    }
}

/// Result of a build: the tree, whether it is degenerate, and stats.
#[derive(Debug, Clone)]
pub struct Build {
    pub tree: HuffmanTree,
    pub degenerate: bool,
    pub stats: BuildStats,
}

/// One item of an in-order dump: leaves show their symbol, internal nodes
/// their weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeItem {
    Symbol(char),
    Weight(u32),
}

impl fmt::Display for TreeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeItem::Symbol(c) => write!(f, "{}", c),
            TreeItem::Weight(w) => write!(f, "{}", w),
        }
    }
}

/// A finished Huffman tree. Dropping it frees every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Build from `(symbol, weight)` leaves given in leaf order.
    ///
    /// # Errors
    /// `HuffmanError::EmptyLeafSet` if `leaves` is empty.
    pub fn build(leaves: &[(char, u32)]) -> Result<Build, HuffmanError> {
        if leaves.is_empty() {
            return Err(HuffmanError::EmptyLeafSet);
        }

        let mut queue: BinaryHeap<Reverse<Candidate>> = leaves
            .iter()
            .enumerate()
            .map(|(i, &(symbol, weight))| {
                Reverse(Candidate {
                    node: Node::leaf(symbol, weight),
                    seq: i as u64,
                })
            })
            .collect();

        let mut next_seq = leaves.len() as u64;
        let mut stats = BuildStats::default();

        while queue.len() > 1 {
            let (Some(Reverse(first)), Some(Reverse(second))) = (queue.pop(), queue.pop()) else {
                break;
            };

            let merged = Node::internal(first.node, second.node);
            let (node, rotations) = bounded_rebalance(merged);
            stats.rotations_per_merge.push(rotations);
            tracing::trace!(merge = stats.merges(), rotations, weight = node.weight(), "merged");

            if node.is_leaf() {
                return Ok(Build {
                    tree: HuffmanTree { root: node },
                    degenerate: true,
                    stats,
                });
            }

            queue.push(Reverse(Candidate { node, seq: next_seq }));
            next_seq += 1;
        }

        let root = match queue.pop() {
            Some(Reverse(candidate)) => candidate.node,
            None => return Err(HuffmanError::EmptyLeafSet),
        };
        let degenerate = root.is_leaf();

        Ok(Build {
            tree: HuffmanTree { root },
            degenerate,
            stats,
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Total weight (equals the sum of the input weights).
    pub fn weight(&self) -> u32 {
        self.root.weight()
    }

    pub fn height(&self) -> u32 {
        self.root.height()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Root-to-leaf bit paths (`'0'` left, `'1'` right) for every symbol.
    ///
    /// A lone leaf root gets the empty code.
    pub fn codes(&self) -> BTreeMap<char, String> {
        let mut codes = BTreeMap::new();
        assign_codes(&self.root, String::new(), &mut codes);
        codes
    }

    /// In-order traversal of the tree.
    pub fn in_order(&self) -> Vec<TreeItem> {
        let mut items = Vec::with_capacity(self.root.leaf_count() * 2);
        walk_in_order(&self.root, &mut items);
        items
    }
}

fn assign_codes(node: &Node, prefix: String, codes: &mut BTreeMap<char, String>) {
    match node {
        Node::Leaf { symbol, .. } => {
            codes.insert(*symbol, prefix);
        }
        Node::Internal { left, right, .. } => {
            let mut left_prefix = prefix.clone();
            left_prefix.push('0');
            assign_codes(left, left_prefix, codes);

            let mut right_prefix = prefix;
            right_prefix.push('1');
            assign_codes(right, right_prefix, codes);
        }
    }
}

fn walk_in_order(node: &Node, items: &mut Vec<TreeItem>) {
    match node {
        Node::Leaf { symbol, .. } => items.push(TreeItem::Symbol(*symbol)),
        Node::Internal { weight, left, right } => {
            walk_in_order(left, items);
            items.push(TreeItem::Weight(*weight));
            walk_in_order(right, items);
        }
    }
}
