//! Metrics collection and reporting for a simulation run.
//!
//! Counts what happened to every request: how many names were encoded or
//! rejected, where accepted entities were routed, and how many were later
//! evicted by compaction.
//!
//! # Thread Safety
//!
//! The `Metrics` struct is NOT thread-safe. It is owned by the dispatcher
//! and updated in place as each operation completes.

use std::time::{Duration, Instant};

/// Counters for one run of the dispatcher.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Encoding ===
    /// Names submitted for encoding
    pub encodes_requested: u64,

    /// Names refused by the entry check
    pub encodes_rejected: u64,

    /// Builds that collapsed to a single leaf
    pub encodes_degenerate: u64,

    /// Rotations spent by the bounded rebalance across all builds
    pub rebalance_rotations: u64,

    // === Routing ===
    /// Entities placed in the order-statistics store
    pub routed_order_statistics: u64,

    /// Entities placed in the heap store
    pub routed_heap: u64,

    // === Compaction ===
    /// Order-statistics compaction passes
    pub order_statistics_compactions: u64,

    /// Heap compaction passes
    pub heap_compactions: u64,

    /// Codes evicted from the order-statistics store
    pub evicted_order_statistics: u64,

    /// Entities evicted from the heap store
    pub evicted_heap: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            encodes_requested: 0,
            encodes_rejected: 0,
            encodes_degenerate: 0,
            rebalance_rotations: 0,
            routed_order_statistics: 0,
            routed_heap: 0,
            order_statistics_compactions: 0,
            heap_compactions: 0,
            evicted_order_statistics: 0,
            evicted_heap: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Entities accepted and placed in either store.
    pub fn routed(&self) -> u64 {
        self.routed_order_statistics + self.routed_heap
    }

    /// Entities evicted from either store.
    pub fn evicted(&self) -> u64 {
        self.evicted_order_statistics + self.evicted_heap
    }

    /// Fraction of requests refused by the entry check.
    pub fn rejection_rate(&self) -> f64 {
        if self.encodes_requested == 0 {
            0.0
        } else {
            self.encodes_rejected as f64 / self.encodes_requested as f64
        }
    }

    /// Share of routed entities that went to the order-statistics store.
    pub fn odd_share(&self) -> f64 {
        if self.routed() == 0 {
            0.0
        } else {
            self.routed_order_statistics as f64 / self.routed() as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Run Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Encoding ===");
        println!("Requested: {}", self.encodes_requested);
        println!(
            "Rejected: {} ({:.1}%)",
            self.encodes_rejected,
            self.rejection_rate() * 100.0
        );
        println!("Degenerate: {}", self.encodes_degenerate);
        println!("Rebalance rotations: {}", self.rebalance_rotations);
        println!();

        println!("=== Routing ===");
        println!(
            "Order-statistics store: {} ({:.1}%)",
            self.routed_order_statistics,
            self.odd_share() * 100.0
        );
        println!("Heap store: {}", self.routed_heap);
        println!();

        println!("=== Compaction ===");
        println!(
            "Order-statistics passes: {} (evicted {})",
            self.order_statistics_compactions, self.evicted_order_statistics
        );
        println!(
            "Heap passes: {} (evicted {})",
            self.heap_compactions, self.evicted_heap
        );
        println!("Still held: {}", self.routed().saturating_sub(self.evicted()));
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             encodes_requested={}\n\
             encodes_rejected={}\n\
             encodes_degenerate={}\n\
             rejection_rate={:.4}\n\
             rebalance_rotations={}\n\
             routed_order_statistics={}\n\
             routed_heap={}\n\
             order_statistics_compactions={}\n\
             heap_compactions={}\n\
             evicted_order_statistics={}\n\
             evicted_heap={}\n",
            self.duration().as_millis(),
            self.encodes_requested,
            self.encodes_rejected,
            self.encodes_degenerate,
            self.rejection_rate(),
            self.rebalance_rotations,
            self.routed_order_statistics,
            self.routed_heap,
            self.order_statistics_compactions,
            self.heap_compactions,
            self.evicted_order_statistics,
            self.evicted_heap,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
