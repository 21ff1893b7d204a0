/*!
 * sigrelay
 * Lock-free handoff of OS signal notifications to a single consumer,
 * exposed as a library
 */

pub mod config;
pub mod core;
pub mod logging;
pub mod signals;

// Re-exports
pub use crate::core::errors::{ConfigError, HookError, QueueError, QueueResult};
pub use crate::core::sync::{BlockHandle, StrategyType, SyncConfig};
pub use config::RelayConfig;
pub use logging::init_tracing;
pub use signals::{
    NoopHooks, OsHooks, QueueStatsSnapshot, Receiver, Signal, SignalHooks, SignalQueue,
    SignalStream, SyncState, NSIG,
};
