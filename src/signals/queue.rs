/*!
 * Signal Queue
 * Lock-free handoff from signal-handler producers to a single consumer
 *
 * # Protocol
 *
 * Producers (`sigsend`) only touch atomics: they set a bit in the pending
 * set and, on the transition that newly set it, advance the sync word.
 * A producer that finds the consumer parked (`Waiter`) moves the word to
 * `Idle` and issues the one wake for that wait.
 *
 * The consumer drains its private buffer first. When the buffer is empty it
 * either consumes a `HasSignal` notice or arms a wait by moving `Idle` to
 * `Waiter` and parking. Either way it then refills by atomically taking each
 * pending word.
 */

use super::hooks::SignalHooks;
use super::receiver::Receiver;
use super::sigset::{in_range, AtomicSigSet, LocalSigSet};
use super::state::{AtomicSyncState, SyncState};
use super::stats::{QueueStats, QueueStatsSnapshot};
use crate::core::sync::{BlockHandle, OneShot, SyncConfig};
use crate::core::errors::{QueueError, QueueResult};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, trace};

/// Signal handoff queue
///
/// Every field is fixed-size and `const` constructible, so a queue can be a
/// `static` with no teardown. Instance queues are equally valid and are what
/// tests use.
///
/// # Examples
///
/// ```
/// use sigrelay::core::sync::SyncConfig;
/// use sigrelay::signals::{NoopHooks, SignalQueue};
///
/// static QUEUE: SignalQueue<NoopHooks> = SignalQueue::new(NoopHooks, SyncConfig::new());
///
/// QUEUE.initialize();
/// QUEUE.enable(10);
/// assert!(QUEUE.sigsend(10));
///
/// let mut rx = QUEUE.receiver().unwrap();
/// assert_eq!(rx.recv(), 10);
/// ```
pub struct SignalQueue<H: SignalHooks> {
    initialized: AtomicBool,
    subscribed: AtomicSigSet,
    pending: AtomicSigSet,
    state: AtomicSyncState,
    note: BlockHandle,
    consumer_claimed: AtomicBool,
    stats: QueueStats,
    hooks: H,
}

impl<H: SignalHooks> SignalQueue<H> {
    /// Create an uninitialized queue
    pub const fn new(hooks: H, config: SyncConfig) -> Self {
        Self {
            initialized: AtomicBool::new(false),
            subscribed: AtomicSigSet::new(),
            pending: AtomicSigSet::new(),
            state: AtomicSyncState::new(),
            note: BlockHandle::new(config),
            consumer_claimed: AtomicBool::new(false),
            stats: QueueStats::new(),
            hooks,
        }
    }

    // =========================================================================
    // Control path
    // =========================================================================

    /// Bootstrap the queue
    ///
    /// Resets the block handle and latches the initialized flag. Later calls
    /// are no-ops, so a parked consumer is never disturbed.
    pub fn initialize(&self) {
        if self.initialized.load(Ordering::Acquire) {
            return;
        }
        self.note.clear();
        self.initialized.store(true, Ordering::Release);
        debug!(strategy = self.note.name(), "signal queue initialized");
    }

    /// Subscribe to `signal` and invoke the OS enable hook
    ///
    /// On an uninitialized queue this call only bootstraps (see
    /// [`initialize`](Self::initialize)) and subscribes nothing. Numbers
    /// `>= NSIG` are ignored.
    ///
    /// Control-path calls must not run concurrently with each other.
    pub fn enable(&self, signal: u32) {
        if !self.initialized.load(Ordering::Acquire) {
            self.initialize();
            return;
        }
        if !in_range(signal) {
            trace!(signal, "ignoring enable for out-of-range signal");
            return;
        }

        self.subscribed.insert(signal);
        self.hooks.os_enable(signal);
        debug!(signal, "signal enabled");
    }

    /// Unsubscribe from `signal` and invoke the OS disable hook
    ///
    /// Occurrences already pending are still delivered.
    pub fn disable(&self, signal: u32) {
        if !in_range(signal) {
            trace!(signal, "ignoring disable for out-of-range signal");
            return;
        }

        self.subscribed.remove(signal);
        self.hooks.os_disable(signal);
        debug!(signal, "signal disabled");
    }

    // =========================================================================
    // Producer
    // =========================================================================

    /// Queue `signal` for the consumer
    ///
    /// Async-signal-safe: atomics only, no allocation, no blocking, no
    /// logging. Returns `false` when the queue is uninitialized, the number
    /// is out of range, or it is not subscribed. A signal that is already
    /// pending is coalesced and still reports `true`.
    pub fn sigsend(&self, signal: u32) -> bool {
        if !self.initialized.load(Ordering::Acquire)
            || !in_range(signal)
            || !self.subscribed.contains(signal)
        {
            self.stats.inc_rejected();
            return false;
        }

        if !self.pending.insert(signal) {
            self.stats.inc_coalesced();
            return true;
        }

        self.stats.inc_accepted();
        self.notify_consumer();
        true
    }

    /// Advance the sync word after a pending bit went from clear to set
    #[inline]
    fn notify_consumer(&self) {
        loop {
            match self.state.load() {
                SyncState::HasSignal => return,
                SyncState::Waiter => {
                    if self.state.transition(SyncState::Waiter, SyncState::Idle) {
                        self.stats.inc_wakes();
                        self.note.wake();
                        return;
                    }
                }
                SyncState::Idle => {
                    if self.state.transition(SyncState::Idle, SyncState::HasSignal) {
                        return;
                    }
                }
            }
        }
    }

    /// Put an already-accepted signal back into the pending set
    ///
    /// Used when a consumer gives up its buffer. Subscription is not
    /// re-checked: the occurrence was accepted while subscribed.
    pub(crate) fn requeue(&self, signal: u32) {
        if self.pending.insert(signal) {
            self.notify_consumer();
        }
    }

    // =========================================================================
    // Consumer
    // =========================================================================

    /// Claim the single consumer slot
    ///
    /// Fails with [`QueueError::ConsumerClaimed`] while another
    /// [`Receiver`] is alive.
    pub fn receiver(&self) -> QueueResult<Receiver<'_, H>> {
        self.consumer_claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| QueueError::ConsumerClaimed)?;
        Ok(Receiver::new(self))
    }

    pub(crate) fn release_consumer(&self) {
        self.consumer_claimed.store(false, Ordering::Release);
    }

    /// Blocking receive into the caller's private buffer
    pub(crate) fn receive_into(&self, local: &mut LocalSigSet) -> u32 {
        loop {
            if let Some(signal) = local.pop_lowest() {
                self.stats.inc_delivered();
                return signal;
            }
            self.await_pending();
            self.refill(local);
        }
    }

    /// Non-blocking receive into the caller's private buffer
    pub(crate) fn try_receive_into(&self, local: &mut LocalSigSet) -> Option<u32> {
        if local.is_empty() {
            loop {
                match self.state.load() {
                    SyncState::Idle => return None,
                    SyncState::HasSignal => {
                        if self.state.transition(SyncState::HasSignal, SyncState::Idle) {
                            break;
                        }
                    }
                    SyncState::Waiter => concurrent_consumer(),
                }
            }
            self.refill(local);
        }

        let signal = local.pop_lowest()?;
        self.stats.inc_delivered();
        Some(signal)
    }

    /// Wait until a producer has reported a pending signal
    ///
    /// Returns after consuming a `HasSignal` notice or after being woken
    /// from `Waiter`. The caller refills either way.
    fn await_pending(&self) {
        loop {
            match self.state.load() {
                SyncState::HasSignal => {
                    if self.state.transition(SyncState::HasSignal, SyncState::Idle) {
                        return;
                    }
                }
                SyncState::Idle => {
                    if self.state.transition(SyncState::Idle, SyncState::Waiter) {
                        self.stats.inc_parks();
                        trace!(strategy = self.note.name(), "consumer parking");
                        self.note.sleep();
                        self.note.clear();
                        trace!("consumer woken");
                        return;
                    }
                }
                SyncState::Waiter => concurrent_consumer(),
            }
        }
    }

    #[inline]
    fn refill(&self, local: &mut LocalSigSet) {
        self.pending.drain_into(local);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Check whether `signal` is currently subscribed
    pub fn is_enabled(&self, signal: u32) -> bool {
        in_range(signal) && self.subscribed.contains(signal)
    }

    /// Check whether any signal is pending in the shared set
    ///
    /// Signals already moved into a receiver's buffer are not counted.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Current sync word, for diagnostics
    pub fn sync_state(&self) -> SyncState {
        self.state.load()
    }

    /// Snapshot of queue counters
    pub fn stats(&self) -> QueueStatsSnapshot {
        self.stats.snapshot()
    }
}

impl<H: SignalHooks> std::fmt::Debug for SignalQueue<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalQueue")
            .field("initialized", &self.is_initialized())
            .field("subscribed", &self.subscribed)
            .field("pending", &self.pending)
            .field("state", &self.sync_state())
            .field("note", &self.note)
            .finish()
    }
}

/// A second consumer found the wait already armed
///
/// Continuing could park two threads on a one-shot handle or drop a wakeup,
/// so the process stops here.
#[cold]
#[inline(never)]
fn concurrent_consumer() -> ! {
    error!("signal queue consumer found a waiter already parked; concurrent receive is a protocol violation");
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync::StrategyType;
    use crate::core::testing::{assert_aborts_in_child, in_abort_child};
    use crate::signals::hooks::{MockSignalHooks, NoopHooks};
    use crate::signals::sigset::NSIG;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn ready_queue() -> SignalQueue<NoopHooks> {
        let queue = SignalQueue::new(NoopHooks, SyncConfig::new());
        queue.initialize();
        queue
    }

    #[test]
    fn test_first_enable_only_bootstraps() {
        let mut hooks = MockSignalHooks::new();
        hooks.expect_os_enable().with(eq(7)).times(1).return_const(());

        let queue = SignalQueue::new(hooks, SyncConfig::new());
        assert!(!queue.is_initialized());

        queue.enable(7);
        assert!(queue.is_initialized());
        assert!(!queue.is_enabled(7));
        assert!(!queue.sigsend(7));

        queue.enable(7);
        assert!(queue.is_enabled(7));
        assert!(queue.sigsend(7));
    }

    #[test]
    fn test_enable_disable_invoke_hooks() {
        let mut hooks = MockSignalHooks::new();
        hooks.expect_os_enable().with(eq(3)).times(1).return_const(());
        hooks.expect_os_disable().with(eq(3)).times(1).return_const(());

        let queue = SignalQueue::new(hooks, SyncConfig::new());
        queue.initialize();
        queue.enable(3);
        queue.disable(3);
        assert!(!queue.is_enabled(3));
    }

    #[test]
    fn test_out_of_range_skips_hooks() {
        let mut hooks = MockSignalHooks::new();
        hooks.expect_os_enable().never();
        hooks.expect_os_disable().never();

        let queue = SignalQueue::new(hooks, SyncConfig::new());
        queue.initialize();
        queue.enable(NSIG);
        queue.disable(NSIG + 10);
        assert!(!queue.is_enabled(NSIG));
    }

    fn park_two_consumers() {
        let queue = ready_queue();
        std::thread::scope(|scope| {
            scope.spawn(|| {
                let mut first = LocalSigSet::new();
                queue.receive_into(&mut first);
            });
            while queue.sync_state() != SyncState::Waiter {
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            let mut second = LocalSigSet::new();
            queue.receive_into(&mut second);
        });
    }

    #[test]
    fn test_second_parked_consumer_aborts() {
        if in_abort_child() {
            return park_two_consumers();
        }
        assert_aborts_in_child("signals::queue::tests::test_second_parked_consumer_aborts");
    }

    #[test]
    fn test_try_receive_against_parked_consumer_aborts() {
        if in_abort_child() {
            let queue = ready_queue();
            return std::thread::scope(|scope| {
                scope.spawn(|| {
                    let mut first = LocalSigSet::new();
                    queue.receive_into(&mut first);
                });
                while queue.sync_state() != SyncState::Waiter {
                    std::thread::sleep(std::time::Duration::from_millis(1));
                }
                let mut second = LocalSigSet::new();
                queue.try_receive_into(&mut second);
            });
        }
        assert_aborts_in_child(
            "signals::queue::tests::test_try_receive_against_parked_consumer_aborts",
        );
    }

    #[test]
    fn test_rejects_before_initialize() {
        let queue = SignalQueue::new(NoopHooks, SyncConfig::new());
        assert!(!queue.sigsend(2));
        assert_eq!(queue.stats().rejected, 1);
    }

    #[test]
    fn test_rejects_unsubscribed_and_out_of_range() {
        let queue = ready_queue();
        assert!(!queue.sigsend(2));
        assert!(!queue.sigsend(NSIG));
        assert!(!queue.sigsend(u32::MAX));
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_coalesces_repeated_sends() {
        let queue = ready_queue();
        queue.enable(5);
        assert!(queue.sigsend(5));
        assert!(queue.sigsend(5));

        let stats = queue.stats();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.coalesced, 1);

        let mut rx = queue.receiver().unwrap();
        assert_eq!(rx.try_recv(), Some(5));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_first_send_sets_has_signal_without_wake() {
        let queue = ready_queue();
        queue.enable(9);
        assert!(queue.sigsend(9));
        assert_eq!(queue.sync_state(), SyncState::HasSignal);
        assert_eq!(queue.stats().wakes, 0);
    }

    #[test]
    fn test_disable_keeps_already_pending() {
        let queue = ready_queue();
        queue.enable(4);
        assert!(queue.sigsend(4));

        queue.disable(4);
        assert!(!queue.sigsend(4));

        let mut rx = queue.receiver().unwrap();
        assert_eq!(rx.recv(), 4);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let queue = ready_queue();
        queue.enable(1);
        queue.sigsend(1);
        queue.initialize();
        assert!(queue.has_pending());
        assert_eq!(queue.sync_state(), SyncState::HasSignal);
    }

    #[test]
    fn test_single_receiver_claim() {
        let queue = ready_queue();
        let rx = queue.receiver().unwrap();
        assert!(matches!(queue.receiver(), Err(QueueError::ConsumerClaimed)));
        drop(rx);
        assert!(queue.receiver().is_ok());
    }

    #[test]
    fn test_dropped_receiver_requeues_buffer() {
        let queue = ready_queue();
        queue.enable(2);
        queue.enable(6);
        queue.sigsend(2);
        queue.sigsend(6);

        {
            let mut rx = queue.receiver().unwrap();
            assert_eq!(rx.recv(), 2);
            assert_eq!(rx.buffered(), 1);
        }

        assert!(queue.has_pending());
        let mut rx = queue.receiver().unwrap();
        assert_eq!(rx.recv(), 6);
    }

    #[test]
    fn test_park_strategy_round_trip() {
        let queue = SignalQueue::new(NoopHooks, SyncConfig::with_strategy(StrategyType::Park));
        queue.initialize();
        queue.enable(12);

        std::thread::scope(|scope| {
            let consumer = scope.spawn(|| queue.receiver().unwrap().recv());
            std::thread::sleep(std::time::Duration::from_millis(50));
            assert!(queue.sigsend(12));
            assert_eq!(consumer.join().unwrap(), 12);
        });
    }

    proptest! {
        #[test]
        fn prop_drain_yields_sorted_subscribed(
            subscribed in proptest::collection::btree_set(0..NSIG, 0..10),
            sends in proptest::collection::vec(0..NSIG + 5, 0..50),
        ) {
            let queue = ready_queue();
            for &sig in &subscribed {
                queue.enable(sig);
            }
            for &sig in &sends {
                prop_assert_eq!(queue.sigsend(sig), subscribed.contains(&sig));
            }

            let mut rx = queue.receiver().unwrap();
            let mut received = Vec::new();
            while let Some(sig) = rx.try_recv() {
                received.push(sig);
            }

            let mut expected: Vec<u32> = sends.iter().copied().filter(|s| subscribed.contains(s)).collect();
            expected.sort_unstable();
            expected.dedup();
            prop_assert_eq!(received, expected);
        }
    }
}
