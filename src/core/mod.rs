/*!
 * Core Module
 * Synchronization primitives and error handling
 */

pub mod errors;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

// Re-export for convenience
pub use errors::*;
