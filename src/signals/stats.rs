/*!
 * Lock-Free Queue Statistics
 * Relaxed atomic counters, safe to bump from a signal handler
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Point-in-time copy of [`QueueStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatsSnapshot {
    /// `sigsend` calls that newly queued a signal
    pub accepted: usize,
    /// `sigsend` calls folded into an already pending occurrence
    pub coalesced: usize,
    /// `sigsend` calls filtered out (uninitialized, out of range, unsubscribed)
    pub rejected: usize,
    /// Wakes issued to a parked consumer
    pub wakes: usize,
    /// Times the consumer parked on its block handle
    pub parks: usize,
    /// Signal numbers handed to the consumer
    pub delivered: usize,
}

/// Atomic queue statistics for lock-free updates
///
/// # Performance
/// - Cache-line aligned to prevent false sharing with the pending set
/// - `AtomicUsize` only: lock-free on every target, so producers may update
///   counters inside a signal handler
#[repr(C, align(64))]
pub struct QueueStats {
    accepted: AtomicUsize,
    coalesced: AtomicUsize,
    rejected: AtomicUsize,
    wakes: AtomicUsize,
    parks: AtomicUsize,
    delivered: AtomicUsize,
}

impl QueueStats {
    /// Create zeroed stats
    pub const fn new() -> Self {
        Self {
            accepted: AtomicUsize::new(0),
            coalesced: AtomicUsize::new(0),
            rejected: AtomicUsize::new(0),
            wakes: AtomicUsize::new(0),
            parks: AtomicUsize::new(0),
            delivered: AtomicUsize::new(0),
        }
    }

    #[inline(always)]
    pub(crate) fn inc_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_wakes(&self) {
        self.wakes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_parks(&self) {
        self.parks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of current stats (no locks required)
    ///
    /// # Note
    /// Values may not be perfectly consistent with each other due to
    /// concurrent updates, but each individual value is accurate.
    pub fn snapshot(&self) -> QueueStatsSnapshot {
        QueueStatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            wakes: self.wakes.load(Ordering::Relaxed),
            parks: self.parks.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
        }
    }
}

impl Default for QueueStats {
    fn default() -> Self {
        Self::new()
    }
}
