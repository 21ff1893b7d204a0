/*!
 * OS Signal Hooks
 * sigaction-based delivery into the process-wide queue
 */

use super::global;
use super::hooks::SignalHooks;
use crate::core::errors::HookError;
use nix::errno::Errno;
use nix::libc;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal as OsSignal};
use tracing::{debug, warn};

/// Hooks that route OS signals into [`global::sigsend`]
///
/// Enabling installs [`trampoline`] as the handler; disabling restores the
/// default disposition. Both are idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsHooks;

impl SignalHooks for OsHooks {
    fn os_enable(&self, signal: u32) {
        match set_handler(signal, SigHandler::Handler(trampoline)) {
            Ok(()) => debug!(signal, "installed OS signal handler"),
            Err(err) => warn!(signal, error = %err, "failed to enable OS signal delivery"),
        }
    }

    fn os_disable(&self, signal: u32) {
        match set_handler(signal, SigHandler::SigDfl) {
            Ok(()) => debug!(signal, "restored default OS disposition"),
            Err(err) => warn!(signal, error = %err, "failed to disable OS signal delivery"),
        }
    }
}

fn set_handler(signal: u32, handler: SigHandler) -> Result<(), HookError> {
    let os_signal = i32::try_from(signal)
        .ok()
        .and_then(|raw| OsSignal::try_from(raw).ok())
        .ok_or(HookError::Unsupported(signal))?;

    let action = SigAction::new(
        handler,
        SaFlags::SA_RESTART | SaFlags::SA_ONSTACK,
        SigSet::empty(),
    );

    // SAFETY: the installed handler is `trampoline`, which only performs
    // async-signal-safe work, or the default disposition.
    unsafe { sigaction(os_signal, &action) }
        .map_err(|source| HookError::Sigaction { signal, source })?;
    Ok(())
}

/// Signal handler entry point
///
/// Runs in signal context: it forwards the number to the lock-free producer
/// and preserves `errno` for the interrupted code.
pub extern "C" fn trampoline(signo: libc::c_int) {
    let saved = Errno::last_raw();
    if let Ok(signal) = u32::try_from(signo) {
        global::sigsend(signal);
    }
    Errno::set_raw(saved);
}
