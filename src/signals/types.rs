/*!
 * Signal Types
 * Signal numbering and the named signal catalogue
 */

use nix::libc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// UNIX-style signal numbers
///
/// Discriminants are the host libc's numbers, so `SIGUSR1` is 10 on Linux
/// and 30 on the BSDs. The queue itself works on raw numbers; this catalogue
/// names them for configuration and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Signal {
    /// Hangup detected on controlling terminal or death of controlling process
    SIGHUP = libc::SIGHUP as u32,
    /// Interrupt from keyboard (Ctrl+C)
    SIGINT = libc::SIGINT as u32,
    /// Quit from keyboard (Ctrl+\)
    SIGQUIT = libc::SIGQUIT as u32,
    /// Illegal instruction
    SIGILL = libc::SIGILL as u32,
    /// Trace/breakpoint trap
    SIGTRAP = libc::SIGTRAP as u32,
    /// Abort signal
    SIGABRT = libc::SIGABRT as u32,
    /// Bus error (bad memory access)
    SIGBUS = libc::SIGBUS as u32,
    /// Floating-point exception
    SIGFPE = libc::SIGFPE as u32,
    /// Kill signal (cannot be caught or ignored)
    SIGKILL = libc::SIGKILL as u32,
    /// User-defined signal 1
    SIGUSR1 = libc::SIGUSR1 as u32,
    /// Invalid memory reference
    SIGSEGV = libc::SIGSEGV as u32,
    /// User-defined signal 2
    SIGUSR2 = libc::SIGUSR2 as u32,
    /// Broken pipe
    SIGPIPE = libc::SIGPIPE as u32,
    /// Timer signal
    SIGALRM = libc::SIGALRM as u32,
    /// Termination signal
    SIGTERM = libc::SIGTERM as u32,
    /// Child process stopped or terminated
    SIGCHLD = libc::SIGCHLD as u32,
    /// Continue if stopped
    SIGCONT = libc::SIGCONT as u32,
    /// Stop process (cannot be caught or ignored)
    SIGSTOP = libc::SIGSTOP as u32,
    /// Stop typed at terminal (Ctrl+Z)
    SIGTSTP = libc::SIGTSTP as u32,
    /// Terminal input for background process
    SIGTTIN = libc::SIGTTIN as u32,
    /// Terminal output for background process
    SIGTTOU = libc::SIGTTOU as u32,
    /// Urgent condition on socket
    SIGURG = libc::SIGURG as u32,
    /// CPU time limit exceeded
    SIGXCPU = libc::SIGXCPU as u32,
    /// File size limit exceeded
    SIGXFSZ = libc::SIGXFSZ as u32,
    /// Virtual alarm clock
    SIGVTALRM = libc::SIGVTALRM as u32,
    /// Profiling timer expired
    SIGPROF = libc::SIGPROF as u32,
    /// Window resize signal
    SIGWINCH = libc::SIGWINCH as u32,
    /// I/O now possible
    SIGIO = libc::SIGIO as u32,
    /// Power failure
    #[cfg(any(target_os = "linux", target_os = "android"))]
    SIGPWR = libc::SIGPWR as u32,
    /// Bad system call
    SIGSYS = libc::SIGSYS as u32,
}

impl Signal {
    /// Every named signal available on this platform
    pub const ALL: &'static [Signal] = &[
        Signal::SIGHUP,
        Signal::SIGINT,
        Signal::SIGQUIT,
        Signal::SIGILL,
        Signal::SIGTRAP,
        Signal::SIGABRT,
        Signal::SIGBUS,
        Signal::SIGFPE,
        Signal::SIGKILL,
        Signal::SIGUSR1,
        Signal::SIGSEGV,
        Signal::SIGUSR2,
        Signal::SIGPIPE,
        Signal::SIGALRM,
        Signal::SIGTERM,
        Signal::SIGCHLD,
        Signal::SIGCONT,
        Signal::SIGSTOP,
        Signal::SIGTSTP,
        Signal::SIGTTIN,
        Signal::SIGTTOU,
        Signal::SIGURG,
        Signal::SIGXCPU,
        Signal::SIGXFSZ,
        Signal::SIGVTALRM,
        Signal::SIGPROF,
        Signal::SIGWINCH,
        Signal::SIGIO,
        #[cfg(any(target_os = "linux", target_os = "android"))]
        Signal::SIGPWR,
        Signal::SIGSYS,
    ];

    /// Look up a named signal by number
    pub fn from_number(n: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|sig| sig.number() == n)
    }

    /// Look up a named signal by name
    ///
    /// Case-insensitive, with or without the `SIG` prefix: `SIGHUP`, `hup`.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("SIG").unwrap_or(&upper);
        Self::ALL.iter().copied().find(|sig| &sig.name()[3..] == bare)
    }

    /// Get signal number
    pub const fn number(&self) -> u32 {
        *self as u32
    }

    /// Canonical name, e.g. `SIGTERM`
    pub fn name(&self) -> &'static str {
        match self {
            Signal::SIGHUP => "SIGHUP",
            Signal::SIGINT => "SIGINT",
            Signal::SIGQUIT => "SIGQUIT",
            Signal::SIGILL => "SIGILL",
            Signal::SIGTRAP => "SIGTRAP",
            Signal::SIGABRT => "SIGABRT",
            Signal::SIGBUS => "SIGBUS",
            Signal::SIGFPE => "SIGFPE",
            Signal::SIGKILL => "SIGKILL",
            Signal::SIGUSR1 => "SIGUSR1",
            Signal::SIGSEGV => "SIGSEGV",
            Signal::SIGUSR2 => "SIGUSR2",
            Signal::SIGPIPE => "SIGPIPE",
            Signal::SIGALRM => "SIGALRM",
            Signal::SIGTERM => "SIGTERM",
            Signal::SIGCHLD => "SIGCHLD",
            Signal::SIGCONT => "SIGCONT",
            Signal::SIGSTOP => "SIGSTOP",
            Signal::SIGTSTP => "SIGTSTP",
            Signal::SIGTTIN => "SIGTTIN",
            Signal::SIGTTOU => "SIGTTOU",
            Signal::SIGURG => "SIGURG",
            Signal::SIGXCPU => "SIGXCPU",
            Signal::SIGXFSZ => "SIGXFSZ",
            Signal::SIGVTALRM => "SIGVTALRM",
            Signal::SIGPROF => "SIGPROF",
            Signal::SIGWINCH => "SIGWINCH",
            Signal::SIGIO => "SIGIO",
            #[cfg(any(target_os = "linux", target_os = "android"))]
            Signal::SIGPWR => "SIGPWR",
            Signal::SIGSYS => "SIGSYS",
        }
    }

    /// Check if the OS lets a handler be installed for this signal
    pub fn can_catch(&self) -> bool {
        !matches!(self, Signal::SIGKILL | Signal::SIGSTOP)
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Signal::SIGHUP => "Hangup",
            Signal::SIGINT => "Interrupt",
            Signal::SIGQUIT => "Quit",
            Signal::SIGILL => "Illegal instruction",
            Signal::SIGTRAP => "Trace/breakpoint trap",
            Signal::SIGABRT => "Aborted",
            Signal::SIGBUS => "Bus error",
            Signal::SIGFPE => "Floating point exception",
            Signal::SIGKILL => "Killed",
            Signal::SIGUSR1 => "User defined signal 1",
            Signal::SIGSEGV => "Segmentation fault",
            Signal::SIGUSR2 => "User defined signal 2",
            Signal::SIGPIPE => "Broken pipe",
            Signal::SIGALRM => "Alarm clock",
            Signal::SIGTERM => "Terminated",
            Signal::SIGCHLD => "Child status changed",
            Signal::SIGCONT => "Continued",
            Signal::SIGSTOP => "Stopped (signal)",
            Signal::SIGTSTP => "Stopped",
            Signal::SIGTTIN => "Stopped (tty input)",
            Signal::SIGTTOU => "Stopped (tty output)",
            Signal::SIGURG => "Urgent I/O condition",
            Signal::SIGXCPU => "CPU time limit exceeded",
            Signal::SIGXFSZ => "File size limit exceeded",
            Signal::SIGVTALRM => "Virtual timer expired",
            Signal::SIGPROF => "Profiling timer expired",
            Signal::SIGWINCH => "Window size changed",
            Signal::SIGIO => "I/O possible",
            #[cfg(any(target_os = "linux", target_os = "android"))]
            Signal::SIGPWR => "Power failure",
            Signal::SIGSYS => "Bad system call",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.number())
    }
}

impl From<Signal> for u32 {
    fn from(signal: Signal) -> Self {
        signal.number()
    }
}
