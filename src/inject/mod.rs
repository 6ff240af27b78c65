//! Synthetic keyboard event injection
//!
//! A [`KeyInjector`] builds opaque key events once and posts them to the OS
//! input stream as often as needed. The event type is owned by whoever built
//! it; dropping it releases the native resource.
//!
//! Backends:
//!
//! - [`quartz`] - `CGEvent` keyboard events posted to the annotated session (macOS)
//! - [`dry_run`] - logs every posted event instead of injecting it

pub mod dry_run;
#[cfg(target_os = "macos")]
pub mod quartz;
#[cfg(test)]
pub mod recording;

use std::fmt;
use thiserror::Error;

/// Platform virtual key code
pub type KeyCode = u16;

/// Whether an event presses or releases its key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyDirection {
    Down,
    Up,
}

impl fmt::Display for KeyDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDirection::Down => write!(f, "down"),
            KeyDirection::Up => write!(f, "up"),
        }
    }
}

/// Errors raised while building native key events
#[derive(Debug, Error)]
pub enum InjectError {
    /// The configured key code does not fit the platform key code type
    #[error("Key code {0} is outside the platform range 0..={max}", max = KeyCode::MAX)]
    KeyCodeOutOfRange(i64),

    /// The platform refused to build the event
    #[error("Unable to create key {direction} event for key {key_code:#04x}")]
    EventCreation {
        key_code: KeyCode,
        direction: KeyDirection,
    },

    /// The platform event source could not be opened
    #[error("Event source error: {0}")]
    SourceError(String),
}

/// Checks a configured key code against the platform key code range
pub fn key_code(raw: i64) -> Result<KeyCode, InjectError> {
    KeyCode::try_from(raw).map_err(|_| InjectError::KeyCodeOutOfRange(raw))
}

/// Builds and posts synthetic key events
pub trait KeyInjector {
    /// Pre-built native event; dropping it releases the native resource
    type Event;

    /// Builds the event for one key and direction
    fn create_event(
        &self,
        key_code: KeyCode,
        direction: KeyDirection,
    ) -> Result<Self::Event, InjectError>;

    /// Posts a previously built event. Fire-and-forget.
    fn post(&mut self, event: &Self::Event);
}
