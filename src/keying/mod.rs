// src/keying/mod.rs  —  Straight-key press/release state machine
use crate::morse::{KeyTiming, SymbolAccumulator};
use crate::output::OutputSink;
use std::time::{Duration, Instant};

/// What a release event means. The press handler only ever sees the
/// Morse key; erase and space are routed on release alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Morse,
    Erase,
    Space,
}

/// Explicit key state. `GapWait` is the suspense after a release:
/// either a new press continues the letter or the deferred flush ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Idle,
    KeyDown,
    GapWait,
}

/// One straight-key session: timestamps, the armed flush deadline and the
/// element accumulator all live here — no globals.
///
/// Every method takes `now` from the caller (the event receipt time), so
/// the machine never reads the clock itself.
pub struct StraightKey {
    state:         KeyState,
    timing:        KeyTiming,
    last_press:    Option<Instant>,
    last_release:  Option<Instant>,
    /// Release instant the deferred flush was armed at.
    /// Zero or one armed at any time; a press disarms, re-arming replaces.
    pending_flush: Option<Instant>,
    accumulator:   SymbolAccumulator,
}

impl StraightKey {
    pub fn new(timing: KeyTiming) -> Self {
        Self {
            state:         KeyState::Idle,
            timing,
            last_press:    None,
            last_release:  None,
            pending_flush: None,
            accumulator:   SymbolAccumulator::new(),
        }
    }

    /// Morse-key press edge. Returns true when the press is accepted —
    /// the caller starts the sidetone and the pressed visual on true.
    ///
    /// A press while already down (terminal auto-repeat, double press)
    /// is ignored. A gap since the previous release longer than the
    /// letter gap means the accumulated elements were a finished letter:
    /// flush them before this press starts the next one. The very first
    /// press of a session has no release to compare against — no flush.
    pub fn press(&mut self, now: Instant, sink: &mut dyn OutputSink) -> bool {
        if self.state == KeyState::KeyDown {
            return false;
        }
        self.pending_flush = None;
        if let Some(rel) = self.last_release {
            if self.timing.letter_ended(now.saturating_duration_since(rel)) {
                log::debug!("[keying] press after letter gap → flush");
                self.accumulator.flush(sink);
            }
        }
        self.last_press = Some(now);
        self.state = KeyState::KeyDown;
        true
    }

    /// Release edge for any routed key. The caller stops the sidetone and
    /// clears the pressed visual for every release it forwards here.
    ///
    /// The Morse key classifies its hold and pushes the element; erase
    /// and space act on the sink instead. All three record the release
    /// time and arm the deferred flush — a stray erase or space does to
    /// the timer exactly what a normal release does.
    pub fn release(&mut self, kind: KeyKind, now: Instant, sink: &mut dyn OutputSink) {
        match kind {
            KeyKind::Morse => {
                // Release without a recorded press: treat the hold as
                // zero rather than fail — still pushes an element.
                let hold = self
                    .last_press
                    .map(|p| now.saturating_duration_since(p))
                    .unwrap_or(Duration::ZERO);
                let sym = self.timing.classify(hold);
                log::debug!("[keying] hold {:?} → {:?}", hold, sym);
                self.accumulator.push(sym);
            }
            KeyKind::Erase => sink.remove_last_char(),
            KeyKind::Space => sink.append_space(),
        }
        self.last_release = Some(now);
        self.pending_flush = Some(now);
        self.state = KeyState::GapWait;
    }

    /// Loop tick. Fires the armed flush once the letter gap has passed
    /// with no intervening press. The deadline is the single-shot timer:
    /// at most one is live, and only the last-armed one can fire.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn OutputSink) {
        if let Some(armed) = self.pending_flush {
            if self.timing.letter_ended(now.saturating_duration_since(armed)) {
                self.pending_flush = None;
                log::debug!("[keying] letter gap elapsed → flush");
                self.accumulator.flush(sink);
                if self.state == KeyState::GapWait {
                    self.state = KeyState::Idle;
                }
            }
        }
    }

    pub fn state(&self) -> KeyState {
        self.state
    }

    /// Rendered in-progress element sequence, for the live display
    pub fn current_code(&self) -> String {
        self.accumulator.code()
    }
}
