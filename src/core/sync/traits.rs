/*!
 * Synchronization Traits
 *
 * Core abstraction for one-shot sleep/wake notes.
 *
 * # Design: Trait-Based Abstraction for Implementations
 *
 * `BlockHandle` uses enum dispatch so it can be built in a `static`; this
 * trait describes the contract every strategy shares and lets tests drive
 * each strategy directly.
 */

/// A binary, edge-triggered wait/wake slot
///
/// The protocol is strict:
/// - `clear` must run before every `sleep`
/// - exactly one `wake` is allowed per cleared note
/// - `sleep` returns only after `wake` has been called
///
/// Implementations must be:
/// - **Lock-free on the wake side**: `wake` may run inside a signal handler
///   for strategies that advertise `is_signal_safe`
/// - **Single sleeper**: at most one thread sleeps on a note at a time
pub trait OneShot: Send + Sync {
    /// Reset the note to the unsignaled state
    fn clear(&self);

    /// Block the calling thread until the note is signaled
    fn sleep(&self);

    /// Signal the note, releasing the sleeper if there is one
    ///
    /// A second wake without an intervening `clear` aborts the process.
    fn wake(&self);

    /// Check whether the note has been signaled since the last `clear`
    fn is_signaled(&self) -> bool;

    /// Whether `wake` only uses async-signal-safe operations
    fn is_signal_safe(&self) -> bool;

    /// Get strategy name for debugging
    fn name(&self) -> &'static str;
}

/// Note key values shared by all strategies
pub(crate) const NOTE_CLEAR: u32 = 0;
pub(crate) const NOTE_SIGNALED: u32 = 1;

/// Abort on a second wake of the same note
///
/// Runs in the waker's context, which may be a signal handler, so nothing
/// here may allocate or log.
#[cold]
#[inline(never)]
pub(crate) fn double_wake() -> ! {
    std::process::abort()
}
