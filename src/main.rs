// src/main.rs  —  cw-key-trainer  entry point
use anyhow::Result;
use clap::Parser;
use cw_key_trainer::audio;
use cw_key_trainer::config::{self, AppConfig, Cli};
use cw_key_trainer::keying::{KeyKind, StraightKey};
use cw_key_trainer::morse::KeyTiming;
use cw_key_trainer::output::Transcript;
use cw_key_trainer::tui::Tui;
use cw_key_trainer::AppState;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // ── --print-config  ───────────────────────────────────────────────────────
    if cli.print_config {
        print!("{}", config::DEFAULT_CONFIG_TOML);
        return Ok(());
    }

    // ── --write-config  ───────────────────────────────────────────────────────
    if cli.write_config {
        let path = AppConfig::write_default_config(&cli)?;
        println!("Config written to: {}", path.display());
        println!("Edit it to set sidetone frequency and volume.");
        return Ok(());
    }

    // ── Load config ───────────────────────────────────────────────────────────
    let cfg = AppConfig::load(&cli)?;

    // ── Audio ─────────────────────────────────────────────────────────────────
    let audio = Arc::new(Mutex::new(
        audio::create_tone(cfg.tone_hz as f32, cfg.volume)
    ));

    // ── Sidetone thread ───────────────────────────────────────────────────────
    // Sends (true=on, false=off).  Keyed through try_lock so the event loop
    // can never stall behind the audio device.
    let (tx_sidetone, rx_sidetone) = std::sync::mpsc::channel::<bool>();
    let audio_st = Arc::clone(&audio);
    thread::spawn(move || {
        while let Ok(on) = rx_sidetone.recv() {
            if let Ok(mut a) = audio_st.try_lock() {
                if on { let _ = a.play(); }
                else  { let _ = a.stop(); }
            }
        }
    });

    // ── Keying state + decoded output ─────────────────────────────────────────
    let mut key        = StraightKey::new(KeyTiming::standard());
    let mut transcript = Transcript::new();

    // ── TUI ───────────────────────────────────────────────────────────────────
    let mut tui = Tui::new()?;

    let mut state = AppState {
        tone_hz: cfg.tone_hz,
        status:  if tui.reports_releases() {
            "Ready — hold M to key".into()
        } else {
            "Terminal lacks key-release reporting — try kitty/foot/wezterm".into()
        },
        ..Default::default()
    };

    // ── Main loop ─────────────────────────────────────────────────────────────
    // Single-threaded event dispatch: all key events are read here, stamped
    // on receipt, and fed straight into the state machine. The 10ms tick
    // doubles as the deferred-flush timer check.
    let tick = Duration::from_millis(10);

    'main: loop {
        // ── Single crossterm event reader ─────────────────────────────────────
        #[cfg(feature = "tui")]
        {
            use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
            while event::poll(Duration::from_millis(0))? {
                if let Event::Key(k) = event::read()? {
                    let now = Instant::now();
                    match k.kind {
                        KeyEventKind::Press => {
                            // Escape or Ctrl+C always quit
                            if k.code == KeyCode::Esc
                                || (k.code == KeyCode::Char('c')
                                    && k.modifiers.contains(KeyModifiers::CONTROL))
                            {
                                break 'main;
                            }
                            // Only the Morse key is monitored on press
                            if let KeyCode::Char('m') | KeyCode::Char('M') = k.code {
                                if key.press(now, &mut transcript) {
                                    if cfg.sidetone {
                                        let _ = tx_sidetone.send(true);
                                    }
                                    state.key_pressed = true;
                                }
                            }
                        }
                        KeyEventKind::Release => {
                            let kind = match k.code {
                                KeyCode::Char('m') | KeyCode::Char('M') => Some(KeyKind::Morse),
                                KeyCode::Backspace                      => Some(KeyKind::Erase),
                                KeyCode::Char(' ')                      => Some(KeyKind::Space),
                                _                                       => None,
                            };
                            if let Some(kind) = kind {
                                let _ = tx_sidetone.send(false);
                                state.key_pressed = false;
                                key.release(kind, now, &mut transcript);
                            }
                        }
                        // Auto-repeat carries no timing information
                        KeyEventKind::Repeat => {}
                    }
                }
            }
        }

        // Deferred letter flush
        key.tick(Instant::now(), &mut transcript);

        // ── Draw ──────────────────────────────────────────────────────────────
        state.decoded      = transcript.text().to_string();
        state.current_code = key.current_code();
        tui.draw(&state)?;

        thread::sleep(tick);
    }

    // ── Cleanup ───────────────────────────────────────────────────────────────
    tui.cleanup();

    println!("\n73 de cw-key-trainer!\n");
    Ok(())
}
