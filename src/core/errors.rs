/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 *
 * The producer path never returns errors: rejection is a plain `false`.
 * These types cover configuration, OS hook registration and consumer setup.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for queue setup operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Configuration errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Unknown signal: {0}")]
    #[diagnostic(
        code(config::unknown_signal),
        help("Use a signal name such as SIGHUP or HUP, or a number below 65.")
    )]
    UnknownSignal(String),

    #[error("Invalid value for {var}: {value}")]
    #[diagnostic(code(config::invalid_value))]
    InvalidValue { var: String, value: String },
}

/// OS hook errors
///
/// Hooks report these through logging; they never reach the queue.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum HookError {
    #[error("Signal {0} has no OS counterpart on this platform")]
    #[diagnostic(
        code(hook::unsupported_signal),
        help("The queue accepts it, but no OS handler can be installed for it.")
    )]
    Unsupported(u32),

    #[error("Failed to change disposition of signal {signal}: {source}")]
    #[diagnostic(
        code(hook::sigaction_failed),
        help("SIGKILL and SIGSTOP cannot be caught; other failures come from sigaction(2).")
    )]
    Sigaction {
        signal: u32,
        #[source]
        source: nix::errno::Errno,
    },
}

/// Consumer setup errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum QueueError {
    #[error("Signal queue already has a consumer")]
    #[diagnostic(
        code(queue::consumer_claimed),
        help("Only one receiver may drain a queue. Drop the existing receiver first.")
    )]
    ConsumerClaimed,

    #[error("Failed to spawn consumer thread: {0}")]
    #[diagnostic(code(queue::spawn_failed))]
    SpawnFailed(String),
}

impl From<std::io::Error> for QueueError {
    fn from(err: std::io::Error) -> Self {
        QueueError::SpawnFailed(err.to_string())
    }
}
