/*!
 * Process-Wide Signal Queue
 *
 * The static queue that [`OsHooks`] delivers into, plus free functions for
 * the control path, the producer and the consumer.
 */

use super::os::OsHooks;
use super::queue::SignalQueue;
use super::receiver::Receiver;
use crate::core::sync::SyncConfig;
use parking_lot::{const_mutex, Mutex};
use tracing::error;

static QUEUE: SignalQueue<OsHooks> = SignalQueue::new(OsHooks, SyncConfig::new());

/// Consumer slot used by [`receive`] and [`try_receive`]
///
/// Callers of the free functions are serialized here; the lock is never
/// touched by producers.
static CONSUMER: Mutex<Option<Receiver<'static, OsHooks>>> = const_mutex(None);

/// The process-wide queue
pub fn queue() -> &'static SignalQueue<OsHooks> {
    &QUEUE
}

/// Bootstrap the process-wide queue
pub fn initialize() {
    QUEUE.initialize();
}

/// Subscribe to `signal` and install the OS handler
///
/// The first control-path call on an uninitialized queue only bootstraps.
pub fn enable(signal: u32) {
    QUEUE.enable(signal);
}

/// Unsubscribe from `signal` and restore the default OS disposition
pub fn disable(signal: u32) {
    QUEUE.disable(signal);
}

/// Async-signal-safe producer entry point
pub fn sigsend(signal: u32) -> bool {
    QUEUE.sigsend(signal)
}

/// Block until a signal arrives and return its number
pub fn receive() -> u32 {
    CONSUMER.lock().get_or_insert_with(claim).recv()
}

/// Return a pending signal without blocking
///
/// Returns `None` when nothing is pending, and also when another caller
/// holds the consumer slot (for example a [`receive`] parked on another
/// thread); in that case the parked caller gets the next signal.
pub fn try_receive() -> Option<u32> {
    CONSUMER.try_lock()?.get_or_insert_with(claim).try_recv()
}

fn claim() -> Receiver<'static, OsHooks> {
    match QUEUE.receiver() {
        Ok(receiver) => receiver,
        Err(err) => {
            error!(error = %err, "process-wide signal queue is drained elsewhere; receive is a protocol violation");
            std::process::abort()
        }
    }
}
