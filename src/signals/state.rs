/*!
 * Consumer Synchronization State
 * Tri-state word coordinating producers with the parked consumer
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// Handoff state between producers and the consumer
///
/// The zero value is `Idle`, so a zero-initialized word starts idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum SyncState {
    /// No known pending signal and the consumer is not parked
    Idle = 0,
    /// The consumer is parked and the pending set is believed empty
    Waiter = 1,
    /// The pending set may be non-empty; the consumer must not park
    HasSignal = 2,
}

impl SyncState {
    #[inline(always)]
    const fn from_raw(raw: u32) -> Self {
        // Only the three discriminants are ever stored.
        match raw {
            0 => SyncState::Idle,
            1 => SyncState::Waiter,
            _ => SyncState::HasSignal,
        }
    }
}

/// Atomic cell holding a [`SyncState`]
///
/// All transitions go through [`AtomicSyncState::transition`], a single
/// compare-and-swap, so the cell is usable from a signal handler.
#[repr(C, align(64))]
pub(crate) struct AtomicSyncState {
    raw: AtomicU32,
}

impl AtomicSyncState {
    pub(crate) const fn new() -> Self {
        Self {
            raw: AtomicU32::new(SyncState::Idle as u32),
        }
    }

    #[inline(always)]
    pub(crate) fn load(&self) -> SyncState {
        SyncState::from_raw(self.raw.load(Ordering::Acquire))
    }

    /// Attempt `from -> to`; `false` means another party moved first
    #[inline(always)]
    pub(crate) fn transition(&self, from: SyncState, to: SyncState) -> bool {
        self.raw
            .compare_exchange(from as u32, to as u32, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
