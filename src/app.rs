//! Flipdeck - Application state management

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position as Cell, Rect};
use tracing::{debug, error, info};

use crate::error::LoadError;
use crate::events::AppEvent;
use crate::session::{CardView, Direction, Position, Session};

/// User actions forwarded to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Next,
    Prev,
    Flip,
    ToggleMark,
    ToggleHelp,
    Quit,
}

impl Action {
    /// Map a key press to an action
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(Action::Quit),
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) | (KeyCode::Char('n'), _) => {
                Some(Action::Next)
            }
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) | (KeyCode::Char('p'), _) => {
                Some(Action::Prev)
            }
            (KeyCode::Char(' '), _) | (KeyCode::Enter, _) => Some(Action::Flip),
            (KeyCode::Char('m'), _) | (KeyCode::Char('s'), _) => Some(Action::ToggleMark),
            (KeyCode::Char('?'), _) => Some(Action::ToggleHelp),
            _ => None,
        }
    }

    /// A left click on the card turns it over
    pub fn from_mouse(mouse: MouseEvent, card: Rect) -> Option<Self> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left)
                if card.contains(Cell::new(mouse.column, mouse.row)) =>
            {
                Some(Action::Flip)
            }
            _ => None,
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Length of the slide that follows a navigation
    pub transition: Duration,
    /// When false, navigation completes at once
    pub animate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(300),
            animate: true,
        }
    }
}

/// Where the app is in its lifecycle
#[derive(Debug)]
pub enum Phase {
    /// Waiting for the deck to arrive
    Loading,
    /// Cards are available
    Ready(Session),
    /// Loading failed; nothing to navigate
    Failed(LoadError),
}

/// Card content as currently drawn on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardText {
    pub question: String,
    pub answer: String,
    pub marked: bool,
    pub position: Position,
}

impl From<CardView<'_>> for CardText {
    fn from(view: CardView<'_>) -> Self {
        Self {
            question: view.question.to_string(),
            answer: view.answer.to_string(),
            marked: view.marked,
            position: view.position,
        }
    }
}

/// A running slide animation
#[derive(Debug, Clone, Copy)]
struct Slide {
    direction: Direction,
    started: Instant,
}

/// Main application state
pub struct App {
    /// Name of the deck source for display
    pub source_name: String,
    /// Loading / ready / failed
    pub phase: Phase,
    /// Animation settings
    pub settings: Settings,
    /// Content on screen; lags the session by half a slide after navigation
    pub shown: Option<CardText>,
    /// New card content waiting for the mid-slide swap
    pending: Option<CardText>,
    slide: Option<Slide>,
    /// Whether to show the help popup
    pub show_help: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Frames drawn so far, drives the loading spinner
    pub ticks: u64,
    /// Time of the latest tick
    pub now: Instant,
}

impl App {
    /// Create a new app waiting for its deck
    pub fn new(source_name: impl Into<String>, settings: Settings) -> Self {
        Self {
            source_name: source_name.into(),
            phase: Phase::Loading,
            settings,
            shown: None,
            pending: None,
            slide: None,
            show_help: false,
            should_quit: false,
            ticks: 0,
            now: Instant::now(),
        }
    }

    /// React to a background event
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Loaded(Ok(session)) => {
                info!("Loaded {} cards from {}", session.len(), self.source_name);
                // First card is shown without a slide
                self.shown = Some(CardText::from(session.current()));
                self.phase = Phase::Ready(session);
            }
            AppEvent::Loaded(Err(err)) => {
                error!("Failed to load deck from {}: {}", self.source_name, err);
                self.phase = Phase::Failed(err);
            }
        }
    }

    /// Apply a user action at time `now`
    pub fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Next => self.navigate(Direction::Next, now),
            Action::Prev => self.navigate(Direction::Prev, now),
            Action::Flip => {
                if let Phase::Ready(session) = &mut self.phase {
                    let view = session.flip();
                    debug!("Flipped card {} to {:?}", view.position.index, view.face);
                }
            }
            Action::ToggleMark => {
                if let Phase::Ready(session) = &mut self.phase {
                    let view = session.toggle_mark();
                    debug!("Card {} marked: {}", view.position.index, view.marked);
                    // Before the swap the screen still holds the previous card
                    if let Some(text) = self.pending.as_mut().or(self.shown.as_mut()) {
                        text.marked = view.marked;
                    }
                }
            }
        }
    }

    fn navigate(&mut self, direction: Direction, now: Instant) {
        let Phase::Ready(session) = &mut self.phase else {
            return;
        };

        let Some(view) = session.navigate(direction) else {
            debug!("Ignoring {:?}: transition in flight", direction);
            return;
        };
        let text = CardText::from(view);

        if self.settings.animate && !self.settings.transition.is_zero() {
            self.pending = Some(text);
            self.slide = Some(Slide {
                direction,
                started: now,
            });
        } else {
            self.shown = Some(text);
            session.finish_transition();
        }
    }

    /// Advance animations to `now`.
    ///
    /// New content replaces the old at half the slide; the session is released
    /// when the slide ends.
    pub fn tick(&mut self, now: Instant) {
        self.ticks = self.ticks.wrapping_add(1);
        self.now = now;

        let Some(slide) = self.slide else {
            return;
        };
        let elapsed = now.saturating_duration_since(slide.started);

        if elapsed >= self.settings.transition / 2 {
            if let Some(text) = self.pending.take() {
                self.shown = Some(text);
            }
        }

        if elapsed >= self.settings.transition {
            self.slide = None;
            if let Phase::Ready(session) = &mut self.phase {
                session.finish_transition();
            }
        }
    }

    /// Direction and completion (0.0..=1.0) of the running slide
    pub fn slide_progress(&self) -> Option<(Direction, f32)> {
        let slide = self.slide?;
        let total = self.settings.transition.as_secs_f32();
        if total <= 0.0 {
            return None;
        }
        let elapsed = self.now.saturating_duration_since(slide.started).as_secs_f32();
        Some((slide.direction, (elapsed / total).clamp(0.0, 1.0)))
    }

    /// The live session, once loaded
    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            Phase::Ready(session) => Some(session),
            _ => None,
        }
    }
}
