/*!
 * Synchronization Primitives
 *
 * One-shot block/wake notes for handing control from an async-signal-safe
 * producer to a single sleeping consumer:
 * - Futex-based (Linux) for minimal overhead
 * - Parking-based (cross-platform) when producers are ordinary threads
 * - Spin-based (cross-platform, signal-safe) as a portable fallback
 *
 * # Architecture
 *
 * `BlockHandle` wraps one strategy behind enum dispatch. Every strategy is
 * `const` constructible and allocation free, so the handle can sit in the
 * process-wide signal queue's static storage.
 */

mod config;
#[cfg(target_os = "linux")]
mod futex;
mod handle;
mod parking;
mod spinwait;
mod traits;

pub use config::{StrategyType, SyncConfig};
pub use handle::BlockHandle;
pub use traits::OneShot;

// Re-export specific strategies for advanced users
#[cfg(target_os = "linux")]
pub use futex::FutexNote;
pub use parking::ParkNote;
pub use spinwait::SpinNote;
