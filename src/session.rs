//! Flipdeck - Card session state machine
//!
//! A [`Session`] owns the parsed deck and tracks which card is showing, which
//! face is up, and which cards are marked. Navigation wraps around the deck.
//!
//! A navigation opens a transition that the presenter closes with
//! [`Session::finish_transition`] once its animation is done. While one is
//! open, further `next`/`prev` calls are ignored. Flipping and marking are
//! never blocked.

use std::future::Future;

use serde::Serialize;

use crate::error::{FetchError, LoadError, SessionError};
use crate::tabular::{self, Record, RecordSet};

/// Which side of the card is up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    pub fn toggle(&mut self) {
        *self = match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        };
    }

    pub fn label(&self) -> &'static str {
        match self {
            Face::Front => "QUESTION",
            Face::Back => "ANSWER",
        }
    }
}

/// Direction of a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Position label data: zero-based index and deck size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub index: usize,
    pub total: usize,
}

impl Position {
    /// "Card i of N", one-based
    pub fn label(&self) -> String {
        format!("Card {} of {}", self.index + 1, self.total)
    }
}

/// Columns holding the question and answer text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardColumns {
    pub question: String,
    pub answer: String,
}

impl Default for CardColumns {
    fn default() -> Self {
        Self {
            question: "question".to_string(),
            answer: "answer".to_string(),
        }
    }
}

/// Everything the presenter needs to draw the current card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardView<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub marked: bool,
    pub face: Face,
    pub position: Position,
}

/// Navigation, flip and mark state over a non-empty deck
#[derive(Debug, Clone)]
pub struct Session {
    records: RecordSet,
    columns: CardColumns,
    marks: Vec<bool>,
    index: usize,
    face: Face,
    in_flight: bool,
}

impl Session {
    /// Start a session on the first card using the default columns
    pub fn new(records: RecordSet) -> Result<Self, SessionError> {
        Self::with_columns(records, CardColumns::default())
    }

    /// Start a session reading question/answer from the given columns
    pub fn with_columns(records: RecordSet, columns: CardColumns) -> Result<Self, SessionError> {
        if records.is_empty() {
            return Err(SessionError::EmptyDataset);
        }

        Ok(Self {
            marks: vec![false; records.len()],
            records,
            columns,
            index: 0,
            face: Face::Front,
            in_flight: false,
        })
    }

    /// Advance to the following card, wrapping to the first.
    ///
    /// Returns `None` and changes nothing while a transition is in flight.
    pub fn next(&mut self) -> Option<CardView<'_>> {
        self.navigate(Direction::Next)
    }

    /// Go back to the preceding card, wrapping to the last.
    ///
    /// Returns `None` and changes nothing while a transition is in flight.
    pub fn prev(&mut self) -> Option<CardView<'_>> {
        self.navigate(Direction::Prev)
    }

    /// Move in `direction` unless a transition is already running
    pub fn navigate(&mut self, direction: Direction) -> Option<CardView<'_>> {
        if self.in_flight {
            return None;
        }

        let len = self.records.len();
        self.index = match direction {
            Direction::Next => (self.index + 1) % len,
            Direction::Prev => (self.index + len - 1) % len,
        };
        self.face = Face::Front;
        self.in_flight = true;

        Some(self.current())
    }

    /// Signal that the presenter has finished showing the last navigation
    pub fn finish_transition(&mut self) {
        self.in_flight = false;
    }

    /// Whether a navigation is waiting for [`Self::finish_transition`]
    pub fn is_transitioning(&self) -> bool {
        self.in_flight
    }

    /// Turn the current card over
    pub fn flip(&mut self) -> CardView<'_> {
        self.face.toggle();
        self.current()
    }

    /// Flip the mark on the current card
    pub fn toggle_mark(&mut self) -> CardView<'_> {
        self.marks[self.index] = !self.marks[self.index];
        self.current()
    }

    /// View of the card at the current position
    pub fn current(&self) -> CardView<'_> {
        let record = &self.records.records()[self.index];
        CardView {
            question: field(record, &self.columns.question),
            answer: field(record, &self.columns.answer),
            marked: self.marks[self.index],
            face: self.face,
            position: self.position(),
        }
    }

    pub fn position(&self) -> Position {
        Position {
            index: self.index,
            total: self.records.len(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false: an empty deck cannot start a session
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marks.get(index).copied().unwrap_or(false)
    }

    pub fn marked_count(&self) -> usize {
        self.marks.iter().filter(|&&m| m).count()
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn columns(&self) -> &CardColumns {
        &self.columns
    }
}

/// Missing columns read as empty text
fn field<'a>(record: &'a Record, column: &str) -> &'a str {
    record.get(column).unwrap_or_default()
}

/// Await the deck text, parse it, and start a session.
///
/// A failed fetch never reaches the parser.
pub async fn create_session<F>(fetch_text: F, columns: CardColumns) -> Result<Session, LoadError>
where
    F: Future<Output = Result<String, FetchError>>,
{
    let text = fetch_text.await?;
    let records = tabular::parse(&text);
    Ok(Session::with_columns(records, columns)?)
}
