/*!
 * Test Support
 * Runs a single unit test in a child process and checks that it aborted
 */

use std::os::unix::process::ExitStatusExt;
use std::process::{Command, Stdio};

const ABORT_CHILD_ENV: &str = "SIGRELAY_ABORT_CHILD";

/// True inside the child started by [`assert_aborts_in_child`]
pub(crate) fn in_abort_child() -> bool {
    std::env::var_os(ABORT_CHILD_ENV).is_some()
}

/// Re-run the test binary filtered to `test_path` and expect SIGABRT
///
/// `test_path` is the full harness name, e.g. `signals::queue::tests::name`.
pub(crate) fn assert_aborts_in_child(test_path: &str) {
    let exe = std::env::current_exe().expect("test binary path");
    let status = Command::new(exe)
        .args(["--exact", test_path, "--nocapture", "--test-threads=1"])
        .env(ABORT_CHILD_ENV, "1")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("spawn child test process");

    assert!(!status.success(), "{test_path} exited normally");
    assert_eq!(
        status.signal(),
        Some(nix::libc::SIGABRT),
        "{test_path} did not abort: {status}"
    );
}
