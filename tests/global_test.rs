/*!
 * Process-Wide Queue Tests
 * End-to-end delivery of real OS signals through the installed trampoline
 */

use nix::sys::signal::{raise, Signal as OsSignal};
use serial_test::serial;
use sigrelay::signals::{global, Signal, SyncState};
use sigrelay::NSIG;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn setup() {
    global::initialize();
    assert!(global::queue().is_initialized());
}

#[test]
#[serial]
fn test_raised_signal_reaches_receive() {
    setup();
    global::enable(Signal::SIGUSR1.number());

    raise(OsSignal::SIGUSR1).unwrap();

    assert_eq!(global::receive(), Signal::SIGUSR1.number());
    assert_eq!(global::try_receive(), None);
}

#[test]
#[serial]
fn test_repeated_raises_coalesce() {
    setup();
    global::enable(Signal::SIGUSR2.number());

    raise(OsSignal::SIGUSR2).unwrap();
    raise(OsSignal::SIGUSR2).unwrap();

    assert_eq!(global::receive(), Signal::SIGUSR2.number());
    assert_eq!(global::try_receive(), None);
}

#[test]
#[serial]
fn test_direct_sigsend_filters() {
    setup();
    assert!(!global::sigsend(NSIG));
    assert!(!global::sigsend(Signal::SIGURG.number()));

    global::enable(Signal::SIGWINCH.number());
    assert!(global::sigsend(Signal::SIGWINCH.number()));
    assert_eq!(global::receive(), Signal::SIGWINCH.number());

    global::disable(Signal::SIGWINCH.number());
    assert!(!global::queue().is_enabled(Signal::SIGWINCH.number()));
    assert!(!global::sigsend(Signal::SIGWINCH.number()));
}

#[test]
#[serial]
fn test_try_receive_does_not_wait_behind_parked_receive() {
    setup();
    let winch = Signal::SIGWINCH.number();
    global::enable(winch);

    let parked = thread::spawn(global::receive);
    while global::queue().sync_state() != SyncState::Waiter {
        thread::sleep(Duration::from_millis(1));
    }

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || tx.send(global::try_receive()));
    assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok(None));

    assert!(global::sigsend(winch));
    assert_eq!(parked.join().unwrap(), winch);
    global::disable(winch);
}
