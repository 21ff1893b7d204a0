/*!
 * Futex-Based Note
 *
 * Uses raw futex syscalls on a single 32-bit key.
 *
 * # Design
 *
 * Follows the classic futex note: the key is 0 while cleared and 1 once
 * signaled. The waker stores 1 and issues FUTEX_WAKE; the sleeper loops on
 * FUTEX_WAIT while the key still reads 0, so spurious returns are harmless.
 * Both syscalls are async-signal-safe, which makes `wake` usable from a
 * signal handler.
 */

use super::traits::{double_wake, OneShot, NOTE_CLEAR, NOTE_SIGNALED};
use nix::libc;
use std::ptr;
use std::sync::atomic::{AtomicU32, Ordering};

/// One-shot note backed by a process-private futex
///
/// # Performance
///
/// - No allocation, `const` constructible
/// - One atomic swap plus one syscall on wake
/// - Cache-line aligned to keep the key away from neighbouring hot state
#[repr(C, align(64))]
pub struct FutexNote {
    key: AtomicU32,
}

impl FutexNote {
    /// Create a cleared note
    pub const fn new() -> Self {
        Self {
            key: AtomicU32::new(NOTE_CLEAR),
        }
    }

    #[inline]
    fn futex_wait(&self, expected: u32) {
        // EINTR and EAGAIN both send us back to re-check the key.
        unsafe {
            libc::syscall(
                libc::SYS_futex,
                self.key.as_ptr(),
                libc::FUTEX_WAIT | libc::FUTEX_PRIVATE_FLAG,
                expected,
                ptr::null::<libc::timespec>(),
            );
        }
    }

    #[inline]
    fn futex_wake(&self) {
        unsafe {
            libc::syscall(
                libc::SYS_futex,
                self.key.as_ptr(),
                libc::FUTEX_WAKE | libc::FUTEX_PRIVATE_FLAG,
                1,
            );
        }
    }
}

impl Default for FutexNote {
    fn default() -> Self {
        Self::new()
    }
}

impl OneShot for FutexNote {
    fn clear(&self) {
        self.key.store(NOTE_CLEAR, Ordering::Release);
    }

    fn sleep(&self) {
        while self.key.load(Ordering::Acquire) == NOTE_CLEAR {
            self.futex_wait(NOTE_CLEAR);
        }
    }

    fn wake(&self) {
        if self.key.swap(NOTE_SIGNALED, Ordering::AcqRel) != NOTE_CLEAR {
            double_wake();
        }
        self.futex_wake();
    }

    fn is_signaled(&self) -> bool {
        self.key.load(Ordering::Acquire) != NOTE_CLEAR
    }

    fn is_signal_safe(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "futex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_futex_wake_releases_sleeper() {
        let note = Arc::new(FutexNote::new());
        let note_clone = note.clone();

        let handle = thread::spawn(move || note_clone.sleep());

        // Give thread time to park
        thread::sleep(Duration::from_millis(50));
        let start = Instant::now();
        note.wake();

        handle.join().unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(note.is_signaled());
    }

    #[test]
    fn test_futex_wake_before_sleep_does_not_block() {
        let note = FutexNote::new();
        note.wake();
        note.sleep();
        note.clear();
        assert!(!note.is_signaled());
    }
}
