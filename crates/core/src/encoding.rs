//! Name to code pipeline.
//!
//! ```text
//! name -> counts -> shift cipher -> merge -> sort -> Huffman build
//!      -> per-character bit paths -> last 10 bits reversed -> code
//! ```
//!
//! The code is `sum(digit_k * 2^k)` over the reversed tail read as a
//! binary literal, so it always lies in `[0, 1023]`. Odd codes go to the
//! order-statistics store and even codes to the heap store, in area
//! `code mod capacity + 1`. A degenerate build forces code 0 into
//! [`FALLBACK_AREA`] of the heap store.

use crate::cipher::{FrequencyTable, Rejection};
use crate::entity::{AreaId, Capacity, Entity, StoreKind};
use crate::error::Result;
use crate::huffman::{BuildStats, HuffmanTree};

/// Number of trailing bits folded into the code.
pub const CODE_TAIL_BITS: usize = 10;

/// Area used for degenerate builds.
pub const FALLBACK_AREA: AreaId = 1;

/// An accepted name: where it goes and the tree that produced it.
#[derive(Debug, Clone)]
pub struct Encoding {
    pub entity: Entity,
    pub area: AreaId,
    pub store: StoreKind,
    pub degenerate: bool,
    pub tree: HuffmanTree,
    pub stats: BuildStats,
}

/// Outcome of running the pipeline on one name.
#[derive(Debug, Clone)]
pub enum Encoded {
    Rejected(Rejection),
    Accepted(Encoding),
}

/// Fold the reversed tail of `bits` into an integer.
///
/// Takes up to the last [`CODE_TAIL_BITS`] characters of `bits` from the
/// end backwards; the first character taken is the most significant bit.
pub fn code_from_bits(bits: &str) -> u32 {
    bits.bytes()
        .rev()
        .take(CODE_TAIL_BITS)
        .fold(0, |acc, b| (acc << 1) | u32::from(b == b'1'))
}

/// Run the full pipeline for `name` under `capacity`.
///
/// # Errors
/// Only fails if the Huffman engine does, which an accepted name cannot
/// trigger.
pub fn encode_name(name: &str, capacity: Capacity) -> Result<Encoded> {
    let table = match FrequencyTable::validate(name) {
        Ok(table) => table,
        Err(rejection) => return Ok(Encoded::Rejected(rejection)),
    };

    let build = HuffmanTree::build(&table.weighted_symbols())?;

    if build.degenerate {
        return Ok(Encoded::Accepted(Encoding {
            entity: Entity::new(name, 0),
            area: FALLBACK_AREA,
            store: StoreKind::Heap,
            degenerate: true,
            tree: build.tree,
            stats: build.stats,
        }));
    }

    let codes = build.tree.codes();
    let bits: String = name
        .chars()
        .filter_map(|c| codes.get(&table.cipher(c)))
        .map(String::as_str)
        .collect();

    let code = code_from_bits(&bits);

    Ok(Encoded::Accepted(Encoding {
        entity: Entity::new(name, code),
        area: capacity.area_for(code),
        store: StoreKind::for_code(code),
        degenerate: false,
        tree: build.tree,
        stats: build.stats,
    }))
}
