/*!
 * Spin-Wait Note
 *
 * Portable signal-safe note for platforms without futexes.
 * Spins for a while before falling back to yield-and-sleep polling.
 */

use super::traits::{double_wake, OneShot, NOTE_CLEAR, NOTE_SIGNALED};
use std::hint;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

/// Spin-then-sleep note
///
/// # Performance
///
/// - Ultra-low latency for short waits
/// - Higher CPU usage while idle (polls every `backoff`)
/// - Wake is a single atomic swap, so it is signal-safe everywhere
#[repr(C, align(64))]
pub struct SpinNote {
    key: AtomicU32,
    max_spins: u32,
    backoff: Duration,
}

impl SpinNote {
    /// Create a cleared note
    pub const fn new(max_spins: u32, backoff: Duration) -> Self {
        Self {
            key: AtomicU32::new(NOTE_CLEAR),
            max_spins,
            backoff,
        }
    }

    /// Create with default parameters
    pub const fn with_defaults() -> Self {
        Self::new(100, Duration::from_micros(50))
    }
}

impl Default for SpinNote {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl OneShot for SpinNote {
    fn clear(&self) {
        self.key.store(NOTE_CLEAR, Ordering::Release);
    }

    fn sleep(&self) {
        let mut spin_count = 0u32;

        while self.key.load(Ordering::Acquire) == NOTE_CLEAR {
            if spin_count < self.max_spins {
                hint::spin_loop();
                spin_count += 1;
            } else {
                thread::yield_now();
                thread::sleep(self.backoff);
            }
        }
    }

    fn wake(&self) {
        if self.key.swap(NOTE_SIGNALED, Ordering::AcqRel) != NOTE_CLEAR {
            double_wake();
        }
    }

    fn is_signaled(&self) -> bool {
        self.key.load(Ordering::Acquire) != NOTE_CLEAR
    }

    fn is_signal_safe(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "spin"
    }
}
