/*!
 * Synchronization Configuration
 *
 * Strategy selection for the consumer's block/wake handle
 */

use std::time::Duration;

/// Strategy type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyType {
    /// Raw futex syscalls (Linux only, signal-safe wake)
    Futex,
    /// parking_lot_core park/unpark (portable, wake takes a bucket lock)
    Park,
    /// Spin then yield/sleep (portable, signal-safe wake, burns CPU while idle)
    Spin,
    /// Auto-select based on platform
    Auto,
}

/// Synchronization configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Preferred strategy
    pub strategy: StrategyType,
    /// Busy-spin iterations before the spin strategy starts backing off
    pub max_spins: u32,
    /// Sleep between checks once the spin strategy has backed off
    pub spin_backoff: Duration,
}

impl SyncConfig {
    /// Default configuration, usable in `static` initializers
    pub const fn new() -> Self {
        Self {
            strategy: StrategyType::Auto,
            max_spins: 100,
            spin_backoff: Duration::from_micros(50),
        }
    }

    /// Configuration with an explicit strategy
    pub const fn with_strategy(strategy: StrategyType) -> Self {
        Self {
            strategy,
            max_spins: 100,
            spin_backoff: Duration::from_micros(50),
        }
    }

    /// Configuration optimized for low-latency wakeups
    pub const fn low_latency() -> Self {
        Self {
            strategy: StrategyType::Spin,
            max_spins: 10_000,
            spin_backoff: Duration::from_micros(10),
        }
    }

    /// Select best strategy for current platform
    ///
    /// Only signal-safe strategies are picked automatically: futex on Linux,
    /// spin elsewhere. `Futex` requested off Linux degrades to `Spin`.
    pub const fn select_strategy(&self) -> StrategyType {
        match self.strategy {
            StrategyType::Auto | StrategyType::Futex => {
                #[cfg(target_os = "linux")]
                {
                    StrategyType::Futex
                }
                #[cfg(not(target_os = "linux"))]
                {
                    StrategyType::Spin
                }
            }
            other => other,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}
