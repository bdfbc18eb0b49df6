// src/audio/mod.rs  —  ToneOutput trait + cpal backend
use anyhow::Result;

/// Platform-agnostic sidetone interface.
/// `play`/`stop` are idempotent — calling either in its own state is fine.
pub trait ToneOutput: Send {
    /// Start the continuous tone
    fn play(&mut self) -> Result<()>;
    /// Stop the continuous tone
    fn stop(&mut self) -> Result<()>;
    fn set_frequency(&mut self, hz: f32);
    fn set_volume(&mut self, vol: f32);
}

// ── cpal backend ─────────────────────────────────────────────────────────────
#[cfg(feature = "audio-cpal")]
mod cpal_backend;
#[cfg(feature = "audio-cpal")]
pub use cpal_backend::CpalTone;

/// Null backend (no sound — useful for testing / no-audio builds)
pub struct NullTone;
impl ToneOutput for NullTone {
    fn play(&mut self) -> Result<()> { Ok(()) }
    fn stop(&mut self) -> Result<()> { Ok(()) }
    fn set_frequency(&mut self, _hz: f32)  {}
    fn set_volume(&mut self,    _vol: f32) {}
}

/// Factory: returns the best available backend
pub fn create_tone(hz: f32, volume: f32) -> Box<dyn ToneOutput> {
    #[cfg(feature = "audio-cpal")]
    {
        match CpalTone::new(hz, volume) {
            Ok(a)  => return Box::new(a),
            Err(e) => log::warn!("cpal init failed: {e}  →  using NullTone"),
        }
    }
    Box::new(NullTone)
}
