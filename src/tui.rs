//! Flipdeck - Terminal session
//!
//! Owns the screen while the deck is open: draws frames, turns terminal input
//! into [`Action`]s, and puts the terminal back on exit or panic.

use std::io::{stdout, Stdout};
use std::panic;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use crate::app::{Action, App};
use crate::ui;

/// Card viewer screen; restored on drop
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Frame size at the last draw, used to hit-test clicks
    area: Rect,
    restored: bool,
}

impl Tui {
    /// Take over the terminal: raw mode, alternate screen, mouse reporting
    pub fn new() -> Result<Self> {
        let previous_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = leave_screen(&mut stdout());
            previous_hook(info);
        }));

        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter the alternate screen")?;

        let terminal = Terminal::new(CrosstermBackend::new(out))?;
        Ok(Self {
            terminal,
            area: Rect::default(),
            restored: false,
        })
    }

    /// Draw one frame of the app
    pub fn draw(&mut self, app: &App) -> Result<()> {
        let completed = self.terminal.draw(|frame| ui::render(frame, app))?;
        self.area = completed.area;
        Ok(())
    }

    /// Wait up to `timeout` for input and map it to an action.
    ///
    /// Clicks only count on the card, and not while the help popup covers it.
    /// Resizes are picked up by the next draw.
    pub fn next_action(&self, app: &App, timeout: Duration) -> Result<Option<Action>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Action::from_key(key),
            Event::Mouse(mouse) if !app.show_help => {
                Action::from_mouse(mouse, ui::card_rect(self.area))
            }
            _ => None,
        };
        Ok(action)
    }

    /// Give the terminal back; safe to call more than once
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        leave_screen(self.terminal.backend_mut())?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn leave_screen(out: &mut impl std::io::Write) -> Result<()> {
    disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}
