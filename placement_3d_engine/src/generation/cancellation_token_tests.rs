/// Tests for CancellationToken

use super::*;
use std::thread;
use std::time::Instant;

#[test]
fn test_new_token_is_not_cancelled() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
}

#[test]
fn test_cancel_is_visible_through_clones() {
    let token = CancellationToken::new();
    let clone = token.clone();
    clone.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn test_wait_timeout_elapses() {
    let token = CancellationToken::new();
    assert!(!token.wait_timeout(Duration::from_millis(10)));
}

#[test]
fn test_wait_returns_immediately_when_already_cancelled() {
    let token = CancellationToken::new();
    token.cancel();
    let start = Instant::now();
    assert!(token.wait_timeout(Duration::from_secs(30)));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_cancel_wakes_waiter() {
    let token = CancellationToken::new();
    let waiter = {
        let token = token.clone();
        thread::spawn(move || token.wait_timeout(Duration::from_secs(30)))
    };

    thread::sleep(Duration::from_millis(20));
    let start = Instant::now();
    token.cancel();

    assert!(waiter.join().unwrap());
    assert!(start.elapsed() < Duration::from_secs(5));
}
