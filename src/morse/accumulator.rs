// src/morse/accumulator.rs  —  Per-letter element sequence → character
use super::code::{decode, Symbol};
use crate::output::OutputSink;

/// Owns the elements keyed so far for the current letter.
/// Non-empty only between the first push of a letter and its flush.
#[derive(Debug, Default)]
pub struct SymbolAccumulator {
    seq: Vec<Symbol>,
}

impl SymbolAccumulator {
    pub fn new() -> Self {
        Self { seq: Vec::new() }
    }

    /// Append one classified element. Always succeeds.
    pub fn push(&mut self, sym: Symbol) {
        self.seq.push(sym);
        log::debug!("[accumulator] push {:?} → '{}'", sym, self.code());
    }

    /// Resolve the sequence: emit the decoded letter to `sink` if the
    /// table knows it, drop it silently if not. Clears the sequence in
    /// both cases — this is the only place it is cleared.
    /// No-op on an empty sequence.
    pub fn flush(&mut self, sink: &mut dyn OutputSink) {
        if self.seq.is_empty() {
            return;
        }
        let code: String = self.seq.drain(..).map(Symbol::glyph).collect();
        match decode(&code) {
            Some(ch) => {
                log::debug!("[accumulator] flush '{}' → '{}'", code, ch);
                sink.append_char(ch);
            }
            None => log::debug!("[accumulator] flush '{}' → no match, dropped", code),
        }
    }

    /// Rendered in-progress sequence, for the live-code display
    pub fn code(&self) -> String {
        self.seq.iter().map(|s| s.glyph()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}
