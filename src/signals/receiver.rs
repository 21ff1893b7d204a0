/*!
 * Signal Receiver
 * Ownership token for the single consumer of a signal queue
 */

use super::hooks::SignalHooks;
use super::queue::SignalQueue;
use super::sigset::LocalSigSet;

/// The one consumer of a [`SignalQueue`]
///
/// Holding a `Receiver` is the only way to drain an instance queue, and
/// `recv` takes `&mut self`, so the single-consumer contract is enforced by
/// ownership. Signals still buffered when the receiver is dropped go back
/// into the shared pending set.
pub struct Receiver<'q, H: SignalHooks> {
    queue: &'q SignalQueue<H>,
    local: LocalSigSet,
}

impl<'q, H: SignalHooks> Receiver<'q, H> {
    pub(crate) fn new(queue: &'q SignalQueue<H>) -> Self {
        Self {
            queue,
            local: LocalSigSet::new(),
        }
    }

    /// Block until a signal is available and return its number
    ///
    /// Signals collected in the same refill come out in ascending order.
    pub fn recv(&mut self) -> u32 {
        self.queue.receive_into(&mut self.local)
    }

    /// Return a pending signal without blocking, if there is one
    pub fn try_recv(&mut self) -> Option<u32> {
        self.queue.try_receive_into(&mut self.local)
    }

    /// Number of signals already moved into the private buffer
    pub fn buffered(&self) -> usize {
        self.local.len()
    }

    /// Queue this receiver drains
    pub fn queue(&self) -> &'q SignalQueue<H> {
        self.queue
    }
}

impl<H: SignalHooks> Drop for Receiver<'_, H> {
    fn drop(&mut self) {
        while let Some(signal) = self.local.pop_lowest() {
            self.queue.requeue(signal);
        }
        self.queue.release_consumer();
    }
}

impl<H: SignalHooks> std::fmt::Debug for Receiver<'_, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Receiver")
            .field("buffered", &self.local)
            .finish()
    }
}
