//! Pipeline counters
//!
//! Lightweight atomic counters surfaced alongside logs so operational
//! conditions (legacy envelopes still in the wild, rows that no longer
//! decrypt, a slow-starting enclave) are visible without a metrics
//! stack.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter metric
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Counters for the confidential bet pipeline.
#[derive(Debug, Default)]
pub struct ClientMetrics {
    /// Decrypted payloads that used the pre-compaction legacy format.
    pub legacy_payloads: Counter,
    /// Stored rows that failed to decrypt during batch retrieval.
    pub decrypt_failures: Counter,
    /// Enclave key fetch attempts that had to be retried.
    pub enclave_retries: Counter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_increments() {
        let counter = Counter::new();
        assert_eq!(counter.get(), 0);
        counter.inc();
        counter.inc();
        assert_eq!(counter.get(), 2);
    }
}
