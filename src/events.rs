//! Flipdeck - Background event channel
//!
//! The deck is fetched on a tokio task while the UI keeps drawing its loading
//! screen. The task reports back through an mpsc channel which the event loop
//! drains once per frame.

use tokio::sync::mpsc;

use crate::error::LoadError;
use crate::session::Session;

/// Events delivered to the UI loop from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// The deck finished loading (or failed to)
    Loaded(Result<Session, LoadError>),
}

/// Type alias for the event sender (used by the loader task)
pub type AppEventSender = mpsc::UnboundedSender<AppEvent>;

/// Type alias for the event receiver (used by the UI loop)
pub type AppEventReceiver = mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel pair
pub fn event_channel() -> (AppEventSender, AppEventReceiver) {
    mpsc::unbounded_channel()
}
