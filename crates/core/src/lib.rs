//! huffroute-core: cipher-driven Huffman routing into two area-keyed stores
//!
//! Every accepted name is turned into a numeric code by a count-keyed shift
//! cipher and a Huffman tree built with a bounded rebalance. The code's
//! parity then picks one of two stores:
//! - odd codes land in per-area binary search trees, compacted in batches
//!   sized by counting the tree's insertion orders
//! - even codes land in a single min-heap of area buckets, ordered by
//!   occupancy and then by how long each area has gone untouched
//!
//! # Architecture
//!
//! - `cipher`: frequency analysis, shift cipher, leaf ordering
//! - `huffman`: tree construction with a capped AVL-style rebalance
//! - `encoding`: name to code pipeline and parity routing
//! - `combinatorics`: modular binomials and insertion-order counting
//! - `order_stats`: per-area BST store
//! - `heap_store`: indexed occupancy/recency min-heap store
//! - `dispatcher`: owns both stores and the retained tree
//! - `metrics`: observable run counters
//!
//! # Design Principles
//!
//! - **No panics**: invalid input is an error or an outcome, never a crash
//! - **Deterministic**: the code of a name depends only on the name and the
//!   capacity
//! - **Single-threaded**: every operation runs to completion

pub mod cipher;
pub mod combinatorics;
pub mod dispatcher;
pub mod encoding;
pub mod entity;
pub mod error;
pub mod heap_store;
pub mod huffman;
pub mod metrics;
pub mod order_stats;

// Re-export commonly used types
pub use dispatcher::{Dispatcher, EncodeOutcome, Placement};
pub use entity::{AreaId, Capacity, Entity, StoreKind};
pub use error::{Error, Result};
