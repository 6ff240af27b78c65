//! Controller input subsystem
//!
//! Turns raw gamepad activity into discrete [`ControlSample`]s:
//!
//! 1. [`gamepad`] - gilrs-backed source for the first connected controller
//! 2. [`layout`] - standard controller numbering and value scaling
//!
//! # Architecture
//!
//! ```text
//! Gamepad ──► GamepadSource ──► ControlSample ──► EventLoop
//!             (gilrs events)    (kind, id, value)
//! ```
//!
//! Anything that yields samples implements [`InputSource`], so the event loop
//! can be driven by scripted sources in tests.

pub mod gamepad;
pub mod layout;

use std::fmt;

/// Integer identifier of a control within its kind (see [`layout`])
pub type ControlId = u32;

/// The three families of controls a mapping can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Axis,
    Button,
    Trigger,
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlKind::Axis => write!(f, "Axis"),
            ControlKind::Button => write!(f, "Button"),
            ControlKind::Trigger => write!(f, "Trigger"),
        }
    }
}

/// One discrete reading from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSample {
    /// Signed stick position, -32768..=32767
    Axis { id: ControlId, value: i32 },
    /// Button edge as reported by the device
    Button { id: ControlId, pressed: bool },
    /// Unsigned trigger travel, 0..=32767
    Trigger { id: ControlId, value: i32 },
}

impl ControlSample {
    pub fn kind(&self) -> ControlKind {
        match self {
            ControlSample::Axis { .. } => ControlKind::Axis,
            ControlSample::Button { .. } => ControlKind::Button,
            ControlSample::Trigger { .. } => ControlKind::Trigger,
        }
    }

    pub fn id(&self) -> ControlId {
        match *self {
            ControlSample::Axis { id, .. }
            | ControlSample::Button { id, .. }
            | ControlSample::Trigger { id, .. } => id,
        }
    }
}

// Input source errors
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to initialize input source: {0}")]
    InitializationError(String),

    #[error("No gamepad connected")]
    NoGamepadError,

    #[error("Gamepad disconnected: {0}")]
    DisconnectedError(String),
}

/// A producer of controller samples
pub trait InputSource {
    /// Returns the next pending sample, or `None` once nothing is queued.
    ///
    /// An `Err` describes one unusable event; the caller may keep polling.
    fn next_sample(&mut self) -> Result<Option<ControlSample>, SourceError>;
}
