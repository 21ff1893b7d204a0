/*!
 * OS Hooks
 * Outbound calls the control path makes when a subscription changes
 */

use std::sync::Arc;

/// Hooks invoked by `enable`/`disable` after the subscription bit changes
///
/// Calls are synchronous and must be idempotent. Nothing is returned to the
/// queue; implementations report failures through their own logging.
#[cfg_attr(test, mockall::automock)]
pub trait SignalHooks: Send + Sync {
    /// Start routing `signal` to the queue's producer entry point
    fn os_enable(&self, signal: u32);

    /// Stop routing `signal` to the queue
    fn os_disable(&self, signal: u32);
}

/// Hooks that do nothing
///
/// Useful when the embedder delivers signals to `sigsend` by other means,
/// or in tests that call `sigsend` directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl SignalHooks for NoopHooks {
    #[inline]
    fn os_enable(&self, _signal: u32) {}

    #[inline]
    fn os_disable(&self, _signal: u32) {}
}

impl<T: SignalHooks + ?Sized> SignalHooks for Arc<T> {
    fn os_enable(&self, signal: u32) {
        (**self).os_enable(signal)
    }

    fn os_disable(&self, signal: u32) {
        (**self).os_disable(signal)
    }
}

impl<T: SignalHooks + ?Sized> SignalHooks for &T {
    fn os_enable(&self, signal: u32) {
        (**self).os_enable(signal)
    }

    fn os_disable(&self, signal: u32) {
        (**self).os_disable(signal)
    }
}
