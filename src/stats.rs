//! Decode statistics for a transaction result
//!
//! Lightweight, thread-safe counters describing how much work the
//! projection engine did and how often it had to fall back to the
//! Unknown sentinel.
//!
//! # Example
//!
//! ```no_run
//! use relview::stats::DecodeStats;
//!
//! let stats = DecodeStats::new();
//! stats.record_partition(3);
//! let snapshot = stats.snapshot();
//! println!("columns decoded: {}", snapshot.columns_decoded);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Thread-safe decode counters.
///
/// One instance is owned by a transaction result and shared (in an `Arc`)
/// with every partition and relation it builds, so counts from parallel
/// column decode land in the same place.
#[derive(Debug, Default)]
pub struct DecodeStats {
    partitions_decoded: AtomicU64,
    columns_decoded: AtomicU64,
    unknown_fallbacks: AtomicU64,
    relations_built: AtomicU64,
    unions_built: AtomicU64,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A partition derived its physical columns.
    pub fn record_partition(&self, columns: usize) {
        self.partitions_decoded.fetch_add(1, Ordering::Relaxed);
        self.columns_decoded.fetch_add(columns as u64, Ordering::Relaxed);
    }

    /// A decoder did not recognize its input and produced the Unknown sentinel.
    pub fn record_unknown(&self) {
        self.unknown_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// A base relation materialized its column list.
    pub fn record_relation(&self) {
        self.relations_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_union(&self) {
        self.unions_built.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            partitions_decoded: self.partitions_decoded.load(Ordering::Relaxed),
            columns_decoded: self.columns_decoded.load(Ordering::Relaxed),
            unknown_fallbacks: self.unknown_fallbacks.load(Ordering::Relaxed),
            relations_built: self.relations_built.load(Ordering::Relaxed),
            unions_built: self.unions_built.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`DecodeStats`] for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub partitions_decoded: u64,
    pub columns_decoded: u64,
    pub unknown_fallbacks: u64,
    pub relations_built: u64,
    pub unions_built: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_stats_start_at_zero() {
        let stats = DecodeStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_stats_record() {
        let stats = DecodeStats::new();
        stats.record_partition(4);
        stats.record_partition(2);
        stats.record_unknown();
        stats.record_relation();
        stats.record_union();

        let snap = stats.snapshot();
        assert_eq!(snap.partitions_decoded, 2);
        assert_eq!(snap.columns_decoded, 6);
        assert_eq!(snap.unknown_fallbacks, 1);
        assert_eq!(snap.relations_built, 1);
        assert_eq!(snap.unions_built, 1);
    }

    #[test]
    fn test_stats_concurrent_increments() {
        let stats = Arc::new(DecodeStats::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.record_unknown();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(stats.snapshot().unknown_fallbacks, 400);
    }

    #[test]
    fn test_snapshot_serde_roundtrip() {
        let snap = StatsSnapshot {
            partitions_decoded: 1,
            columns_decoded: 5,
            unknown_fallbacks: 0,
            relations_built: 2,
            unions_built: 1,
        };
        let json = serde_json::to_string(&snap).unwrap();
        let back: StatsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, back);
    }
}
