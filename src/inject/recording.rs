//! Test double that records posted events and tracks handle lifetimes

use super::{InjectError, KeyCode, KeyDirection, KeyInjector};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Ledger {
    created: Cell<usize>,
    released: Cell<usize>,
}

/// Handle built by [`RecordingInjector`]; counts its own release
#[derive(Debug)]
pub struct RecordedKey {
    pub key_code: KeyCode,
    pub direction: KeyDirection,
    ledger: Rc<Ledger>,
}

impl Drop for RecordedKey {
    fn drop(&mut self) {
        self.ledger.released.set(self.ledger.released.get() + 1);
    }
}

#[derive(Debug, Default)]
pub struct RecordingInjector {
    ledger: Rc<Ledger>,
    posted: Vec<(KeyCode, KeyDirection)>,
    fail_on: Option<(KeyCode, KeyDirection)>,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses to build the `direction` event for `key_code`
    pub fn failing_on(key_code: KeyCode, direction: KeyDirection) -> Self {
        Self {
            fail_on: Some((key_code, direction)),
            ..Self::default()
        }
    }

    pub fn posted(&self) -> &[(KeyCode, KeyDirection)] {
        &self.posted
    }

    pub fn take_posted(&mut self) -> Vec<(KeyCode, KeyDirection)> {
        std::mem::take(&mut self.posted)
    }

    pub fn created(&self) -> usize {
        self.ledger.created.get()
    }

    pub fn released(&self) -> usize {
        self.ledger.released.get()
    }
}

impl KeyInjector for RecordingInjector {
    type Event = RecordedKey;

    fn create_event(
        &self,
        key_code: KeyCode,
        direction: KeyDirection,
    ) -> Result<RecordedKey, InjectError> {
        if self.fail_on == Some((key_code, direction)) {
            return Err(InjectError::EventCreation {
                key_code,
                direction,
            });
        }
        self.ledger.created.set(self.ledger.created.get() + 1);
        Ok(RecordedKey {
            key_code,
            direction,
            ledger: Rc::clone(&self.ledger),
        })
    }

    fn post(&mut self, event: &RecordedKey) {
        self.posted.push((event.key_code, event.direction));
    }
}
