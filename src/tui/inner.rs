// src/tui/inner.rs  —  ratatui layout
use anyhow::Result;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use crate::AppState;
use std::io::stdout;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    enhanced: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen)?;

        // Key *release* events only arrive under the kitty keyboard
        // protocol — push REPORT_EVENT_TYPES where the terminal has it.
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            log::warn!(
                "terminal does not report key release events — \
                 hold timing will not work here (try kitty, foot or wezterm)"
            );
        }

        let backend  = CrosstermBackend::new(out);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal, enhanced })
    }

    /// Whether this terminal delivers the release events keying needs
    pub fn reports_releases(&self) -> bool {
        self.enhanced
    }

    pub fn cleanup(&mut self) {
        if self.enhanced {
            let _ = execute!(self.terminal.backend_mut(), PopKeyboardEnhancementFlags);
        }
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }

    pub fn draw(&mut self, s: &AppState) -> Result<()> {
        self.terminal.draw(|f| {
            let area = f.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),  // header / status bar
                    Constraint::Min(6),     // decoded transcript
                    Constraint::Length(5),  // live code + key indicator
                    Constraint::Length(3),  // footer hints
                ])
                .split(area);

            // ── Header ────────────────────────────────────────────────────
            let header = Paragraph::new(format!(
                " CW Key Trainer  |  sidetone {}Hz  |  short hold = dit  long hold = dah",
                s.tone_hz
            ))
            .style(Style::default().fg(Color::Black).bg(Color::Cyan)
                   .add_modifier(Modifier::BOLD));
            f.render_widget(header, chunks[0]);

            // ── Decoded transcript ────────────────────────────────────────
            let decoded = Paragraph::new(Span::styled(
                    s.decoded.clone(),
                    Style::default().fg(Color::White),
                ))
                .block(Block::default()
                    .title(" DECODED ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green)))
                .wrap(Wrap { trim: false });
            f.render_widget(decoded, chunks[1]);

            // ── Live code + key indicator ─────────────────────────────────
            let key_style = if s.key_pressed {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let key_lines: Vec<Line> = vec![
                Line::from(vec![
                    Span::styled("CURRENT: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(s.current_code.clone(), Style::default().fg(Color::Cyan)),
                ]),
                Line::from(vec![
                    Span::styled("KEY:     ", Style::default().fg(Color::DarkGray)),
                    Span::styled(if s.key_pressed { "⬤ down" } else { "◯ up" }, key_style),
                ]),
                Line::from(vec![
                    Span::styled("STATUS:  ", Style::default().fg(Color::DarkGray)),
                    Span::styled(s.status.clone(), Style::default().fg(Color::Magenta)),
                ]),
            ];
            let key_block = Paragraph::new(key_lines)
                .block(Block::default()
                    .title(" YOUR KEYING ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)));
            f.render_widget(key_block, chunks[2]);

            // ── Footer ────────────────────────────────────────────────────
            let footer = Paragraph::new(
                " Hold M = key   Backspace = erase   Space = word space   Esc = quit",
            )
            .style(Style::default().fg(Color::DarkGray).bg(Color::Black));
            f.render_widget(footer, chunks[3]);
        })?;
        Ok(())
    }
}
