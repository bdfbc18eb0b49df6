//! Straight-key state machine tests
//!
//! All timestamps are synthesized from a single base Instant, so nothing
//! here sleeps or depends on wall-clock speed.

use cw_key_trainer::keying::{KeyKind, KeyState, StraightKey};
use cw_key_trainer::morse::KeyTiming;
use cw_key_trainer::output::{OutputSink, Transcript};
use std::time::{Duration, Instant};

fn at(base: Instant, ms: u64) -> Instant {
    base + Duration::from_millis(ms)
}

fn machine() -> StraightKey {
    StraightKey::new(KeyTiming::standard())
}

#[test]
fn test_short_hold_pushes_dot() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    assert!(key.press(t0, &mut out));
    key.release(KeyKind::Morse, at(t0, 50), &mut out);

    assert_eq!(key.current_code(), ".");
}

#[test]
fn test_long_hold_pushes_dash() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    key.press(t0, &mut out);
    key.release(KeyKind::Morse, at(t0, 150), &mut out);

    assert_eq!(key.current_code(), "-");
}

#[test]
fn test_hold_exactly_at_threshold_is_dash() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    key.press(t0, &mut out);
    key.release(KeyKind::Morse, at(t0, 80), &mut out);
    assert_eq!(key.current_code(), "-");

    key.press(at(t0, 100), &mut out);
    key.release(KeyKind::Morse, at(t0, 179), &mut out);
    assert_eq!(key.current_code(), "-.");
}

#[test]
fn test_state_transitions() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    assert_eq!(key.state(), KeyState::Idle);
    key.press(t0, &mut out);
    assert_eq!(key.state(), KeyState::KeyDown);
    key.release(KeyKind::Morse, at(t0, 50), &mut out);
    assert_eq!(key.state(), KeyState::GapWait);
    key.tick(at(t0, 300), &mut out);
    assert_eq!(key.state(), KeyState::Idle);
}

#[test]
fn test_double_press_ignored() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    assert!(key.press(t0, &mut out));
    // Terminal auto-repeat / double press while held
    assert!(!key.press(at(t0, 30), &mut out));

    // Hold still measured from the first press
    key.release(KeyKind::Morse, at(t0, 100), &mut out);
    assert_eq!(key.current_code(), "-");
}

#[test]
fn test_release_without_press_degrades_to_dot() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    // No press ever recorded — hold degrades to zero, still an element
    key.release(KeyKind::Morse, t0, &mut out);
    assert_eq!(key.current_code(), ".");
}

#[test]
fn test_flush_on_press_after_letter_gap_decodes_i() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    // Two 50ms dits, 50ms apart
    key.press(t0, &mut out);
    key.release(KeyKind::Morse, at(t0, 50), &mut out);
    key.press(at(t0, 100), &mut out);
    key.release(KeyKind::Morse, at(t0, 150), &mut out);
    assert_eq!(key.current_code(), "..");

    // Next press more than the letter gap later — ".." resolves first
    assert!(key.press(at(t0, 400), &mut out));
    assert_eq!(out.text(), "I");
    assert_eq!(key.current_code(), "");
}

#[test]
fn test_deferred_flush_decodes_t() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    key.press(t0, &mut out);
    key.release(KeyKind::Morse, at(t0, 150), &mut out);

    // Within the gap nothing happens
    key.tick(at(t0, 300), &mut out);
    assert_eq!(out.text(), "");

    // 201ms after the release the armed flush fires
    key.tick(at(t0, 351), &mut out);
    assert_eq!(out.text(), "T");
    assert_eq!(key.current_code(), "");
}

#[test]
fn test_gap_exactly_at_letter_gap_stays_in_letter() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    key.press(t0, &mut out);
    key.release(KeyKind::Morse, at(t0, 50), &mut out);

    // Exactly 200ms later: deferred flush must not fire…
    key.tick(at(t0, 250), &mut out);
    assert_eq!(out.text(), "");

    // …and a press at exactly 200ms continues the same letter
    key.press(at(t0, 250), &mut out);
    assert_eq!(out.text(), "");
    key.release(KeyKind::Morse, at(t0, 300), &mut out);
    assert_eq!(key.current_code(), "..");
}

#[test]
fn test_press_cancels_pending_flush() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    key.press(t0, &mut out);
    key.release(KeyKind::Morse, at(t0, 50), &mut out); // arms flush at 50
    key.press(at(t0, 150), &mut out);                  // cancels it

    // Way past the first-armed deadline while the key is held: no flush
    key.tick(at(t0, 400), &mut out);
    assert_eq!(out.text(), "");
    assert_eq!(key.current_code(), ".");
}

#[test]
fn test_only_last_armed_flush_fires() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    key.press(t0, &mut out);
    key.release(KeyKind::Morse, at(t0, 50), &mut out);  // first arm
    key.press(at(t0, 100), &mut out);                   // supersedes
    key.release(KeyKind::Morse, at(t0, 150), &mut out); // second arm

    // 201ms after the FIRST release but only 101ms after the second
    key.tick(at(t0, 251), &mut out);
    assert_eq!(out.text(), "");

    // 201ms after the second release the letter resolves
    key.tick(at(t0, 351), &mut out);
    assert_eq!(out.text(), "I");
}

#[test]
fn test_erase_removes_one_char() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    out.append_char('A');
    out.append_char('B');

    key.release(KeyKind::Erase, t0, &mut out);
    assert_eq!(out.text(), "A");
}

#[test]
fn test_erase_on_empty_output_is_noop() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    key.release(KeyKind::Erase, t0, &mut out);
    assert_eq!(out.text(), "");
}

#[test]
fn test_space_appends_space_and_arms_flush_like_a_release() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    // One dit pending, then the space bar is released 100ms later
    key.press(t0, &mut out);
    key.release(KeyKind::Morse, at(t0, 50), &mut out);
    key.release(KeyKind::Space, at(t0, 150), &mut out);
    assert_eq!(out.text(), " ");
    assert_eq!(key.current_code(), ".");

    // The space re-armed the flush: it fires 200ms after the SPACE
    key.tick(at(t0, 300), &mut out);
    assert_eq!(out.text(), " ");
    key.tick(at(t0, 351), &mut out);
    assert_eq!(out.text(), " E");
}

#[test]
fn test_erase_does_not_clear_pending_sequence() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    out.append_char('X');
    key.press(t0, &mut out);
    key.release(KeyKind::Morse, at(t0, 150), &mut out);
    key.release(KeyKind::Erase, at(t0, 200), &mut out);

    // The erase removed 'X' but the pending dash survives to decode
    assert_eq!(out.text(), "");
    key.tick(at(t0, 401), &mut out);
    assert_eq!(out.text(), "T");
}

#[test]
fn test_unrecognized_letter_flushes_to_nothing() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();

    // Seven quick dits — no such letter
    for i in 0..7u64 {
        key.press(at(t0, i * 100), &mut out);
        key.release(KeyKind::Morse, at(t0, i * 100 + 40), &mut out);
    }
    key.tick(at(t0, 1000), &mut out);

    assert_eq!(out.text(), "");
    assert_eq!(key.current_code(), "");
    assert_eq!(key.state(), KeyState::Idle);
}

#[test]
fn test_full_word_scenario() {
    let t0 = Instant::now();
    let mut key = machine();
    let mut out = Transcript::new();
    let mut t = 0u64;

    // Keys one letter as a series of holds, then waits out the letter gap
    let mut send = |key: &mut StraightKey, out: &mut Transcript, holds: &[u64], t: &mut u64| {
        for &h in holds {
            key.press(at(t0, *t), &mut *out);
            *t += h;
            key.release(KeyKind::Morse, at(t0, *t), &mut *out);
            *t += 50; // intra-letter gap
        }
        *t += 250; // letter gap
        key.tick(at(t0, *t), &mut *out);
    };

    send(&mut key, &mut out, &[50, 150], &mut t);          // .-   A
    send(&mut key, &mut out, &[150, 50, 50, 50], &mut t);  // -... B
    assert_eq!(out.text(), "AB");
}
