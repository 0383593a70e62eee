//! Frequency analysis and the count-keyed shift cipher.
//!
//! Every distinct character of a name is shifted forward by its own
//! occurrence count (modulo 26, case preserved). Non-alphabetic characters
//! are their own cipher output. Characters that land on the same output
//! have their counts merged, and the merged table is sorted into the leaf
//! order fed to the Huffman engine.
//!
//! # Symbol Order
//!
//! Equal weights are ordered by [`symbol_order`]. Lowercase letters rank
//! before uppercase ones; any other pair compares by code point. The six
//! punctuation characters between `'Z'` and `'a'` are placed after the
//! letters so the order stays total:
//!
//! ```text
//! below 'A'  <  a..z  <  A..Z  <  '['..'`' and above 'z'
//! ```
//!
//! The same order breaks ties between Huffman leaves.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Names shorter than this many characters are rejected.
pub const MIN_NAME_CHARS: usize = 3;

/// Names with fewer distinct characters than this are rejected.
pub const MIN_DISTINCT_CHARS: usize = 3;

/// Why a name was refused by the entry check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Fewer than [`MIN_NAME_CHARS`] characters
    TooShort { chars: usize },

    /// Fewer than [`MIN_DISTINCT_CHARS`] distinct characters
    TooFewDistinct { distinct: usize },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::TooShort { chars } => {
                write!(f, "name has {} chars, need {}", chars, MIN_NAME_CHARS)
            }
            Rejection::TooFewDistinct { distinct } => write!(
                f,
                "name has {} distinct chars, need {}",
                distinct, MIN_DISTINCT_CHARS
            ),
        }
    }
}

/// Shift an alphabetic character forward by `count` within its case.
pub fn shift(c: char, count: u32) -> char {
    let base = if c.is_ascii_lowercase() {
        b'a'
    } else if c.is_ascii_uppercase() {
        b'A'
    } else {
        return c;
    };
    let offset = (c as u8 - base) as u32;
    let shifted = (offset + count % 26) % 26;
    (base + shifted as u8) as char
}

fn symbol_class(c: char) -> u8 {
    if c < 'A' {
        0
    } else if c.is_ascii_lowercase() {
        1
    } else if c.is_ascii_uppercase() {
        2
    } else {
        3
    }
}

/// Three-way tie-break between two symbols of equal weight.
///
/// `Less` means `a` ranks first.
pub fn symbol_order(a: char, b: char) -> Ordering {
    symbol_class(a)
        .cmp(&symbol_class(b))
        .then_with(|| a.cmp(&b))
}

/// Per-character occurrence counts of one name (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<char, u32>,
}

impl FrequencyTable {
    /// Count every character of `name`.
    pub fn from_name(name: &str) -> Self {
        let mut counts = BTreeMap::new();
        for c in name.chars() {
            *counts.entry(c).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Run the entry check and return the table for accepted names.
    pub fn validate(name: &str) -> Result<Self, Rejection> {
        let chars = name.chars().count();
        if chars < MIN_NAME_CHARS {
            return Err(Rejection::TooShort { chars });
        }

        let table = Self::from_name(name);
        if table.distinct() < MIN_DISTINCT_CHARS {
            return Err(Rejection::TooFewDistinct {
                distinct: table.distinct(),
            });
        }
        Ok(table)
    }

    /// Occurrences of `c` (0 if absent).
    pub fn count(&self, c: char) -> u32 {
        self.counts.get(&c).copied().unwrap_or(0)
    }

    /// Number of distinct characters.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Cipher output for `c`, shifted by its own count in this table.
    pub fn cipher(&self, c: char) -> char {
        shift(c, self.count(c))
    }

    /// Cipher every character of `name`, keeping positions.
    pub fn cipher_text(&self, name: &str) -> String {
        name.chars().map(|c| self.cipher(c)).collect()
    }

    /// Merged `(cipher symbol, weight)` pairs in leaf order.
    ///
    /// Sorted ascending by weight, ties broken by [`symbol_order`].
    pub fn weighted_symbols(&self) -> Vec<(char, u32)> {
        let mut merged: BTreeMap<char, u32> = BTreeMap::new();
        for (&c, &count) in &self.counts {
            *merged.entry(shift(c, count)).or_insert(0) += count;
        }

        let mut symbols: Vec<(char, u32)> = merged.into_iter().collect();
        symbols.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| symbol_order(a.0, b.0)));
        symbols
    }
}
