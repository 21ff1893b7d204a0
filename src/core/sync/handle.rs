/*!
 * Block Handle
 *
 * Enum-dispatched one-shot note. Strategy is chosen at construction time
 * through a `const fn`, so the handle can live inside a `static`.
 */

use super::config::{StrategyType, SyncConfig};
#[cfg(target_os = "linux")]
use super::futex::FutexNote;
use super::parking::ParkNote;
use super::spinwait::SpinNote;
use super::traits::OneShot;

/// Block/wake handle used by the signal consumer
///
/// # Examples
///
/// ```
/// use sigrelay::core::sync::{BlockHandle, OneShot, SyncConfig};
///
/// let handle = BlockHandle::new(SyncConfig::new());
/// handle.clear();
/// handle.wake();
/// handle.sleep(); // returns immediately, the note is already signaled
/// ```
pub enum BlockHandle {
    #[cfg(target_os = "linux")]
    Futex(FutexNote),
    Park(ParkNote),
    Spin(SpinNote),
}

impl BlockHandle {
    /// Create a handle with the strategy selected by `config`
    pub const fn new(config: SyncConfig) -> Self {
        match config.select_strategy() {
            #[cfg(target_os = "linux")]
            StrategyType::Futex => BlockHandle::Futex(FutexNote::new()),
            StrategyType::Park => BlockHandle::Park(ParkNote::new()),
            _ => BlockHandle::Spin(SpinNote::new(config.max_spins, config.spin_backoff)),
        }
    }

    #[inline]
    fn inner(&self) -> &dyn OneShot {
        match self {
            #[cfg(target_os = "linux")]
            BlockHandle::Futex(note) => note,
            BlockHandle::Park(note) => note,
            BlockHandle::Spin(note) => note,
        }
    }
}

impl OneShot for BlockHandle {
    #[inline]
    fn clear(&self) {
        self.inner().clear()
    }

    #[inline]
    fn sleep(&self) {
        self.inner().sleep()
    }

    #[inline]
    fn wake(&self) {
        self.inner().wake()
    }

    #[inline]
    fn is_signaled(&self) -> bool {
        self.inner().is_signaled()
    }

    #[inline]
    fn is_signal_safe(&self) -> bool {
        self.inner().is_signal_safe()
    }

    #[inline]
    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

impl std::fmt::Debug for BlockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockHandle")
            .field("strategy", &self.name())
            .field("signaled", &self.is_signaled())
            .finish()
    }
}
