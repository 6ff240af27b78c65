//! Quartz event services backend
//!
//! Keyboard events are created once per key and direction from a HID system
//! event source and posted to the annotated session tap. `CGEvent` releases
//! its Core Foundation reference when dropped.

use super::{InjectError, KeyCode, KeyDirection, KeyInjector};
use core_graphics::event::{CGEvent, CGEventTapLocation};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use tracing::{debug, info};

pub struct QuartzInjector {
    source: CGEventSource,
}

impl QuartzInjector {
    pub fn new() -> Result<Self, InjectError> {
        let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState).map_err(|_| {
            InjectError::SourceError("unable to open the HID system event source".to_string())
        })?;
        info!("Opened Quartz HID system event source");
        Ok(Self { source })
    }
}

impl KeyInjector for QuartzInjector {
    type Event = CGEvent;

    fn create_event(
        &self,
        key_code: KeyCode,
        direction: KeyDirection,
    ) -> Result<CGEvent, InjectError> {
        CGEvent::new_keyboard_event(
            self.source.clone(),
            key_code,
            direction == KeyDirection::Down,
        )
        .map_err(|_| InjectError::EventCreation {
            key_code,
            direction,
        })
    }

    fn post(&mut self, event: &CGEvent) {
        debug!("Posting keyboard event to annotated session");
        event.post(CGEventTapLocation::AnnotatedSession);
    }
}
