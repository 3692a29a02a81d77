//! Flipdeck — Terminal flashcards from published CSV.
//!
//! Loads a question/answer deck from a URL, a file, or stdin, then lets you
//! page through the cards, flip them, and mark the ones worth revisiting.
//!
//! The core is two pieces: [`tabular::parse`] turns the raw text into a
//! [`tabular::RecordSet`], and [`session::Session`] drives navigation, flips
//! and marks over it. Everything else is presentation around them.

pub mod app;
pub mod error;
pub mod events;
pub mod logging;
pub mod session;
pub mod source;
pub mod tabular;
pub mod tui;
pub mod ui;

pub use error::{FetchError, LoadError, SessionError};
pub use session::{create_session, CardColumns, CardView, Face, Position, Session};
pub use source::{FetchOptions, Source};
pub use tabular::{parse, Record, RecordSet};
