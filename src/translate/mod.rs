//! Translation of controller samples into edge-triggered key events
//!
//! Each configured control gets its own translator holding pre-built key
//! events:
//!
//! - [`axis`] - two independent latches, one per stick direction
//! - [`trigger`] - a single latch over the trigger travel
//! - [`button`] - no latch; the device already reports edges
//!
//! The [`registry`] owns all translators for one mapping and routes samples
//! to them. Native events are built when the registry is built and released
//! when it is dropped; nothing is allocated per sample.

pub mod axis;
pub mod button;
pub mod registry;
pub mod trigger;

pub use axis::AxisTranslator;
pub use button::ButtonTranslator;
pub use registry::{BuildError, Dispatch, TranslatorRegistry};
pub use trigger::TriggerTranslator;

use crate::inject::{self, InjectError, KeyCode, KeyDirection, KeyInjector};
use tracing::debug;

/// Pre-built press and release events for one key
#[derive(Debug)]
pub struct KeyPair<E> {
    key_code: KeyCode,
    down: E,
    up: E,
}

impl<E> KeyPair<E> {
    pub fn build<I>(injector: &I, raw_key: i64) -> Result<Self, InjectError>
    where
        I: KeyInjector<Event = E>,
    {
        let key_code = inject::key_code(raw_key)?;
        let up = injector.create_event(key_code, KeyDirection::Up)?;
        let down = injector.create_event(key_code, KeyDirection::Down)?;
        Ok(Self { key_code, down, up })
    }

    pub fn press<I>(&self, injector: &mut I)
    where
        I: KeyInjector<Event = E>,
    {
        debug!("Key {:#04x} down", self.key_code);
        injector.post(&self.down);
    }

    pub fn release<I>(&self, injector: &mut I)
    where
        I: KeyInjector<Event = E>,
    {
        debug!("Key {:#04x} up", self.key_code);
        injector.post(&self.up);
    }
}
