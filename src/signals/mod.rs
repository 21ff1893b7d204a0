/*!
 * Signals Module
 * Lock-free handoff of OS signal notifications to a single consumer
 */

pub mod global;
mod hooks;
mod os;
mod queue;
mod receiver;
mod sigset;
mod state;
mod stats;
mod stream;
pub mod types;

// Re-export public API
pub use hooks::{NoopHooks, SignalHooks};
pub use os::{trampoline, OsHooks};
pub use queue::SignalQueue;
pub use receiver::Receiver;
pub use sigset::{in_range, AtomicSigSet, LocalSigSet, NSIG};
pub use state::SyncState;
pub use stats::{QueueStats, QueueStatsSnapshot};
pub use stream::SignalStream;
pub use types::Signal;
