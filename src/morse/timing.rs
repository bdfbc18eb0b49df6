// src/morse/timing.rs  —  Hold / gap classification thresholds
use super::code::Symbol;
use std::time::Duration;

/// Fixed straight-key timing. Not user-configurable.
#[derive(Debug, Clone, Copy)]
pub struct KeyTiming {
    /// Holds shorter than this are dots; everything else is a dash
    pub symbol_threshold: Duration,
    /// Pause after a release beyond which the letter is considered done
    pub letter_gap: Duration,
}

impl KeyTiming {
    pub const fn standard() -> Self {
        Self {
            symbol_threshold: Duration::from_millis(80),
            letter_gap:       Duration::from_millis(200),
        }
    }

    /// A hold of exactly `symbol_threshold` is a dash — the boundary
    /// belongs to the longer element.
    pub fn classify(&self, hold: Duration) -> Symbol {
        if hold < self.symbol_threshold { Symbol::Dot } else { Symbol::Dash }
    }

    /// Strictly greater: a gap of exactly `letter_gap` is still the same
    /// letter. Both the flush-on-press check and the deferred-flush check
    /// go through here so the two paths can never disagree.
    pub fn letter_ended(&self, gap: Duration) -> bool {
        gap > self.letter_gap
    }
}

impl Default for KeyTiming {
    fn default() -> Self { Self::standard() }
}
