use super::{InjectError, KeyCode, KeyDirection, KeyInjector};
use tracing::info;

/// Event built by [`LogInjector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggedKey {
    pub key_code: KeyCode,
    pub direction: KeyDirection,
}

/// Injector that only reports what would have been posted
///
/// Used on platforms without a native backend so the translation engine can
/// still be exercised against a real controller.
#[derive(Debug, Default)]
pub struct LogInjector {
    posted: u64,
}

impl LogInjector {
    #[cfg(test)]
    pub fn posted(&self) -> u64 {
        self.posted
    }
}

impl KeyInjector for LogInjector {
    type Event = LoggedKey;

    fn create_event(
        &self,
        key_code: KeyCode,
        direction: KeyDirection,
    ) -> Result<LoggedKey, InjectError> {
        Ok(LoggedKey {
            key_code,
            direction,
        })
    }

    fn post(&mut self, event: &LoggedKey) {
        self.posted += 1;
        info!(
            "Key {:#04x} {} (#{})",
            event.key_code, event.direction, self.posted
        );
    }
}
