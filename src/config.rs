// src/config.rs  —  Runtime configuration (CLI + TOML)
use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The example config is embedded directly in the binary at compile time.
/// Users can write it out with:  cw-key-trainer --write-config
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config.toml.example");

// ── CLI ───────────────────────────────────────────────────────────────────────
#[derive(Parser, Debug)]
#[command(
    name        = "cw-key-trainer",
    about       = "Straight-key Morse trainer  |  hold M to key, Backspace erases, Space spaces",
    version,
)]
pub struct Cli {
    /// Config file path (default: ~/.config/cw-key-trainer/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sidetone frequency Hz
    #[arg(long)]
    pub tone: Option<u32>,

    /// Sidetone volume 0.0–1.0
    #[arg(long)]
    pub volume: Option<f32>,

    /// Disable the sidetone entirely
    #[arg(long, action)]
    pub no_sidetone: bool,

    /// Write the built-in default config.toml to the config path and exit.
    /// Use --config <PATH> to write to a custom location.
    #[arg(long, action)]
    pub write_config: bool,

    /// Print the built-in default config.toml to stdout and exit
    #[arg(long, action)]
    pub print_config: bool,
}

// ── TOML file structure ───────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    pub audio: Option<AudioCfg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioCfg {
    pub tone_hz:  Option<u32>,
    pub volume:   Option<f32>,
    pub sidetone: Option<bool>,
}

// ── Resolved / merged config ──────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tone_hz:  u32,
    pub volume:   f32,
    pub sidetone: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tone_hz:  440,
            volume:   0.7,
            sidetone: true,
        }
    }
}

// ── Config loader ─────────────────────────────────────────────────────────────
impl AppConfig {
    /// Write the embedded default config to disk.
    /// Returns the path it was written to.
    pub fn write_default_config(cli: &Cli) -> Result<PathBuf> {
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating config directory {:?}", parent))?;
        }
        std::fs::write(&path, DEFAULT_CONFIG_TOML)
            .with_context(|| format!("Writing config to {:?}", path))?;
        Ok(path)
    }

    pub fn load(cli: &Cli) -> Result<Self> {
        let mut cfg = Self::default();

        // 1. Load TOML file (missing file is fine — defaults apply)
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Reading config {:?}", path))?;
            let fc: FileConfig = toml::from_str(&raw)
                .with_context(|| format!("Parsing config {:?}", path))?;
            cfg.apply_file(&fc);
        }

        // 2. Apply CLI overrides
        cfg.apply_cli(cli);
        Ok(cfg)
    }

    fn apply_file(&mut self, fc: &FileConfig) {
        if let Some(a) = &fc.audio {
            if let Some(v) = a.tone_hz  { self.tone_hz  = v; }
            if let Some(v) = a.volume   { self.volume   = v; }
            if let Some(v) = a.sidetone { self.sidetone = v; }
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = cli.tone   { self.tone_hz = v; }
        if let Some(v) = cli.volume { self.volume  = v; }
        if cli.no_sidetone          { self.sidetone = false; }
    }
}

fn default_config_path() -> PathBuf {
    dirs_next().join("cw-key-trainer").join("config.toml")
}

fn dirs_next() -> PathBuf {
    if let Ok(v) = std::env::var("XDG_CONFIG_HOME") { return PathBuf::from(v); }
    if let Ok(v) = std::env::var("APPDATA")          { return PathBuf::from(v); }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_default();
    PathBuf::from(home).join(".config")
}
