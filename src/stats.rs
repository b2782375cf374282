//! Decode statistics
//!
//! Lock-free counters shared by every caller of a decoder run.

use crate::error::DecodeError;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one run (decoded, failed by kind, payload bytes)
#[derive(Debug, Default)]
pub struct Stats {
    decoded: AtomicU64,
    empty: AtomicU64,
    unknown_format: AtomicU64,
    truncated: AtomicU64,
    invalid_input: AtomicU64,
    bytes: AtomicU64,
}

/// Point-in-time copy of `Stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub decoded: u64,
    pub empty: u64,
    pub unknown_format: u64,
    pub truncated: u64,
    pub invalid_input: u64,
    pub bytes: u64,
}

impl Snapshot {
    pub fn failed(&self) -> u64 {
        self.empty + self.unknown_format + self.truncated + self.invalid_input
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_decoded(&self, payload_len: usize) {
        self.decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(payload_len as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failed(&self, error: &DecodeError) {
        let counter = match error {
            DecodeError::EmptyBuffer => &self.empty,
            DecodeError::UnknownFormat { .. } => &self.unknown_format,
            DecodeError::TruncatedBuffer { .. } => &self.truncated,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Line that never reached the decoder
    #[inline]
    pub fn record_invalid_input(&self) {
        self.invalid_input.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            decoded: self.decoded.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            unknown_format: self.unknown_format.load(Ordering::Relaxed),
            truncated: self.truncated.load(Ordering::Relaxed),
            invalid_input: self.invalid_input.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counts_by_kind() {
        let stats = Stats::new();
        stats.record_decoded(4);
        stats.record_decoded(17);
        stats.record_failed(&DecodeError::UnknownFormat {
            port: None,
            code: 0x99,
        });
        stats.record_failed(&DecodeError::TruncatedBuffer {
            field: "p",
            offset: 6,
            needed: 2,
            available: 0,
        });
        stats.record_invalid_input();

        let snap = stats.snapshot();
        assert_eq!(snap.decoded, 2);
        assert_eq!(snap.bytes, 21);
        assert_eq!(snap.unknown_format, 1);
        assert_eq!(snap.truncated, 1);
        assert_eq!(snap.invalid_input, 1);
        assert_eq!(snap.empty, 0);
        assert_eq!(snap.failed(), 3);
    }

    #[test]
    fn test_empty_payload_is_not_truncation() {
        let stats = Stats::new();
        stats.record_failed(&DecodeError::EmptyBuffer);

        let snap = stats.snapshot();
        assert_eq!(snap.empty, 1);
        assert_eq!(snap.truncated, 0);
        assert_eq!(snap.failed(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        let stats = Arc::new(Stats::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.record_decoded(2);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(stats.snapshot().decoded, 400);
        assert_eq!(stats.snapshot().bytes, 800);
    }
}
