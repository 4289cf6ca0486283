//! Per-slot lifecycle counters.
//!
//! Every slot carries a [`SlotMetrics`] that the controller updates on each
//! operation. Counters are plain atomics, so reading them never contends with
//! the lifecycle locks.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lifecycle counters for one managed type
#[derive(Debug, Default)]
pub struct SlotMetrics {
    created: AtomicU64,
    destroyed: AtomicU64,
    retrieved: AtomicU64,
    rejected_creates: AtomicU64,
    rejected_destroys: AtomicU64,
    rejected_gets: AtomicU64,
}

/// Point-in-time copy of [`SlotMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MetricsSnapshot {
    /// Successful creates (either entry point)
    pub created: u64,
    /// Successful destroys, including resets that released an instance
    pub destroyed: u64,
    /// Successful `get` calls
    pub retrieved: u64,
    /// Creates refused with `AlreadyCreated`
    pub rejected_creates: u64,
    /// Destroys refused with `AlreadyDestroyed`
    pub rejected_destroys: u64,
    /// Gets refused with `NotCreated` or `AccessNotEnabled`
    pub rejected_gets: u64,
}

impl MetricsSnapshot {
    /// Total refused operations.
    pub fn rejections(&self) -> u64 {
        self.rejected_creates + self.rejected_destroys + self.rejected_gets
    }

    /// Number of create/destroy cycles completed.
    pub fn completed_cycles(&self) -> u64 {
        self.destroyed.min(self.created)
    }
}

impl SlotMetrics {
    /// Create a zeroed set of counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_created(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_destroyed(&self) {
        self.destroyed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_retrieved(&self) {
        self.retrieved.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_create(&self) {
        self.rejected_creates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_destroy(&self) {
        self.rejected_destroys.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_get(&self) {
        self.rejected_gets.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters.
    ///
    /// Counters are read individually, so a snapshot taken while other
    /// threads operate on the type may mix values from adjacent operations.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            created: self.created.load(Ordering::Relaxed),
            destroyed: self.destroyed.load(Ordering::Relaxed),
            retrieved: self.retrieved.load(Ordering::Relaxed),
            rejected_creates: self.rejected_creates.load(Ordering::Relaxed),
            rejected_destroys: self.rejected_destroys.load(Ordering::Relaxed),
            rejected_gets: self.rejected_gets.load(Ordering::Relaxed),
        }
    }
}
