/*!
 * Parking-Based Note
 *
 * Uses parking_lot_core for portable park/unpark keyed on the note address.
 *
 * The wake side takes a parking-lot bucket lock, so this strategy is only
 * sound when producers run on ordinary threads rather than inside signal
 * handlers.
 */

use super::traits::{double_wake, OneShot, NOTE_CLEAR, NOTE_SIGNALED};
use parking_lot_core::{park, unpark_one, DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};
use std::sync::atomic::{AtomicU32, Ordering};

/// One-shot note parked through parking_lot_core
#[repr(C, align(64))]
pub struct ParkNote {
    key: AtomicU32,
}

impl ParkNote {
    /// Create a cleared note
    pub const fn new() -> Self {
        Self {
            key: AtomicU32::new(NOTE_CLEAR),
        }
    }

    /// Stable parking address (same in sleep and wake)
    #[inline]
    fn addr(&self) -> usize {
        &self.key as *const AtomicU32 as usize
    }
}

impl Default for ParkNote {
    fn default() -> Self {
        Self::new()
    }
}

impl OneShot for ParkNote {
    fn clear(&self) {
        self.key.store(NOTE_CLEAR, Ordering::Release);
    }

    fn sleep(&self) {
        while self.key.load(Ordering::Acquire) == NOTE_CLEAR {
            // The validate callback runs under the bucket lock, so a wake
            // that lands between our load and the park is never missed.
            unsafe {
                park(
                    self.addr(),
                    || self.key.load(Ordering::Acquire) == NOTE_CLEAR,
                    || {},
                    |_, _| {},
                    DEFAULT_PARK_TOKEN,
                    None,
                );
            }
        }
    }

    fn wake(&self) {
        if self.key.swap(NOTE_SIGNALED, Ordering::AcqRel) != NOTE_CLEAR {
            double_wake();
        }
        unsafe {
            unpark_one(self.addr(), |_| DEFAULT_UNPARK_TOKEN);
        }
    }

    fn is_signaled(&self) -> bool {
        self.key.load(Ordering::Acquire) != NOTE_CLEAR
    }

    fn is_signal_safe(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "park"
    }
}
