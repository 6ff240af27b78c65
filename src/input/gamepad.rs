use super::layout;
use super::{ControlSample, InputSource, SourceError};
use gilrs::{Event, EventType, Gamepad, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, error, info, warn};

// Define source states using statum's state macro
#[state]
#[derive(Debug, Clone)]
pub enum SourceState {
    Opening,
    Polling,
}

#[machine]
#[derive(Debug)]
pub struct GamepadSource<S: SourceState> {
    // Gilrs context
    gilrs: Gilrs,

    // The single controller whose events are translated
    gamepad: GamepadId,
}

// Implementation for Opening state
impl GamepadSource<Opening> {
    /// Initializes gilrs and selects the first connected gamepad
    pub fn create() -> Result<Self, SourceError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(SourceError::InitializationError(e.to_string()));
            }
        };

        let gamepad = Self::select_gamepad(&gilrs)?;
        Ok(Self::new(gilrs, gamepad))
    }

    fn select_gamepad(gilrs: &Gilrs) -> Result<GamepadId, SourceError> {
        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = gilrs.gamepads().collect();

        let Some((id, gamepad)) = gamepads.first() else {
            error!("No gamepad connected");
            return Err(SourceError::NoGamepadError);
        };

        info!("Found {} gamepads:", gamepads.len());
        for (idx, (id, gamepad)) in gamepads.iter().enumerate() {
            info!(
                "  [{}] ID: {}, Name: {}, UUID: {:?}",
                idx,
                id,
                gamepad.name(),
                gamepad.uuid()
            );
        }

        info!("Selected gamepad: {} ({})", gamepad.name(), id);
        Ok(*id)
    }

    // Discard events queued during startup and transition to Polling state
    pub fn open(mut self) -> Result<GamepadSource<Polling>, SourceError> {
        let mut skipped = 0;
        while self.gilrs.next_event().is_some() {
            skipped += 1;
        }
        debug!("Discarded {} events queued before polling", skipped);

        if !self.gilrs.gamepad(self.gamepad).is_connected() {
            error!("Selected gamepad {} disconnected during startup", self.gamepad);
            return Err(SourceError::NoGamepadError);
        }

        info!("Polling gamepad {}", self.gamepad);
        Ok(self.transition())
    }
}

impl GamepadSource<Polling> {
    fn convert_gilrs_event(&self, event: EventType) -> Result<Option<ControlSample>, SourceError> {
        let sample = match event {
            EventType::AxisChanged(axis, value, _) => {
                if let Some((id, inverted)) = layout::stick_axis(axis) {
                    Some(ControlSample::Axis {
                        id,
                        value: layout::scale_stick(value, inverted),
                    })
                } else if let Some(id) = layout::trigger_axis(axis) {
                    Some(ControlSample::Trigger {
                        id,
                        value: layout::scale_trigger(value),
                    })
                } else {
                    debug!("Ignoring unsupported axis: {:?}", axis);
                    None
                }
            }
            EventType::ButtonChanged(button, value, _) => {
                layout::trigger_button(button).map(|id| ControlSample::Trigger {
                    id,
                    value: layout::scale_trigger(value),
                })
            }
            EventType::ButtonPressed(button, _) => {
                layout::button_id(button).map(|id| ControlSample::Button { id, pressed: true })
            }
            EventType::ButtonReleased(button, _) => {
                layout::button_id(button).map(|id| ControlSample::Button { id, pressed: false })
            }
            EventType::Connected => {
                info!("Controller connected event detected");
                None
            }
            EventType::Disconnected => {
                warn!("Controller disconnected event detected");
                return Err(SourceError::DisconnectedError(
                    "waiting for the controller to reconnect".to_string(),
                ));
            }
            _ => {
                debug!("Unhandled event type: {:?}", event);
                None
            }
        };

        Ok(sample)
    }
}

impl InputSource for GamepadSource<Polling> {
    fn next_sample(&mut self) -> Result<Option<ControlSample>, SourceError> {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            if id != self.gamepad {
                debug!("Skipping event from non-active gamepad: {:?}", id);
                continue;
            }

            if let Some(sample) = self.convert_gilrs_event(event)? {
                debug!("Captured sample: {:?}", sample);
                return Ok(Some(sample));
            }
        }

        Ok(None)
    }
}
