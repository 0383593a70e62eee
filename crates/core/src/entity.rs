//! Entities, area identifiers and the capacity that bounds them.

use crate::error::{Error, Result};
use std::num::NonZeroU32;

/// Area identifier, always in `[1, capacity]`.
pub type AreaId = u32;

/// Size of the area-identifier range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capacity(NonZeroU32);

impl Capacity {
    /// # Errors
    /// `Error::InvalidCapacity` when `n` is zero.
    pub fn new(n: u32) -> Result<Self> {
        NonZeroU32::new(n).map(Capacity).ok_or(Error::InvalidCapacity(n))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Area a code maps to: `code mod capacity + 1`.
    pub fn area_for(self, code: u32) -> AreaId {
        code % self.get() + 1
    }
}

/// Which store an entity is routed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// Odd codes: per-area binary search trees
    OrderStatistics,

    /// Even codes: the occupancy/recency min-heap
    Heap,
}

impl StoreKind {
    pub fn for_code(code: u32) -> Self {
        if code & 1 == 1 {
            StoreKind::OrderStatistics
        } else {
            StoreKind::Heap
        }
    }
}

/// A named request carrying its derived code. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    name: String,
    code: u32,
}

impl Entity {
    pub fn new(name: impl Into<String>, code: u32) -> Self {
        Self {
            name: name.into(),
            code,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> u32 {
        self.code
    }
}
