//! Standard controller numbering
//!
//! Ids follow the common game controller layout so existing mapping files keep
//! working: sticks are axes 0-3, the analog triggers share that numbering as
//! 4 and 5, and buttons run 0-14. Vertical sticks report positive for down.

use super::ControlId;
use gilrs::{Axis, Button};

pub const AXIS_LEFT_X: ControlId = 0;
pub const AXIS_LEFT_Y: ControlId = 1;
pub const AXIS_RIGHT_X: ControlId = 2;
pub const AXIS_RIGHT_Y: ControlId = 3;

pub const TRIGGER_LEFT: ControlId = 4;
pub const TRIGGER_RIGHT: ControlId = 5;

pub const BUTTON_A: ControlId = 0;
pub const BUTTON_B: ControlId = 1;
pub const BUTTON_X: ControlId = 2;
pub const BUTTON_Y: ControlId = 3;
pub const BUTTON_BACK: ControlId = 4;
pub const BUTTON_GUIDE: ControlId = 5;
pub const BUTTON_START: ControlId = 6;
pub const BUTTON_LEFT_STICK: ControlId = 7;
pub const BUTTON_RIGHT_STICK: ControlId = 8;
pub const BUTTON_LEFT_SHOULDER: ControlId = 9;
pub const BUTTON_RIGHT_SHOULDER: ControlId = 10;
pub const BUTTON_DPAD_UP: ControlId = 11;
pub const BUTTON_DPAD_DOWN: ControlId = 12;
pub const BUTTON_DPAD_LEFT: ControlId = 13;
pub const BUTTON_DPAD_RIGHT: ControlId = 14;

/// Largest magnitude of a scaled sample
pub const SAMPLE_MAX: i32 = 32767;
pub const SAMPLE_MIN: i32 = -32768;

/// Stick axis id and whether gilrs reports it with the opposite sign
pub fn stick_axis(axis: Axis) -> Option<(ControlId, bool)> {
    match axis {
        Axis::LeftStickX => Some((AXIS_LEFT_X, false)),
        Axis::LeftStickY => Some((AXIS_LEFT_Y, true)),
        Axis::RightStickX => Some((AXIS_RIGHT_X, false)),
        Axis::RightStickY => Some((AXIS_RIGHT_Y, true)),
        _ => None,
    }
}

/// Trigger id for controllers that expose triggers as Z axes
pub fn trigger_axis(axis: Axis) -> Option<ControlId> {
    match axis {
        Axis::LeftZ => Some(TRIGGER_LEFT),
        Axis::RightZ => Some(TRIGGER_RIGHT),
        _ => None,
    }
}

/// Trigger id for controllers that expose triggers as analog buttons
pub fn trigger_button(button: Button) -> Option<ControlId> {
    match button {
        Button::LeftTrigger2 => Some(TRIGGER_LEFT),
        Button::RightTrigger2 => Some(TRIGGER_RIGHT),
        _ => None,
    }
}

// Helper function to map gilrs Button to a button id
pub fn button_id(button: Button) -> Option<ControlId> {
    match button {
        Button::South => Some(BUTTON_A),
        Button::East => Some(BUTTON_B),
        Button::West => Some(BUTTON_X),
        Button::North => Some(BUTTON_Y),
        Button::Select => Some(BUTTON_BACK),
        Button::Mode => Some(BUTTON_GUIDE),
        Button::Start => Some(BUTTON_START),
        Button::LeftThumb => Some(BUTTON_LEFT_STICK),
        Button::RightThumb => Some(BUTTON_RIGHT_STICK),
        Button::LeftTrigger => Some(BUTTON_LEFT_SHOULDER),
        Button::RightTrigger => Some(BUTTON_RIGHT_SHOULDER),
        Button::DPadUp => Some(BUTTON_DPAD_UP),
        Button::DPadDown => Some(BUTTON_DPAD_DOWN),
        Button::DPadLeft => Some(BUTTON_DPAD_LEFT),
        Button::DPadRight => Some(BUTTON_DPAD_RIGHT),
        _ => None,
    }
}

/// Scales a gilrs stick value (-1.0..=1.0) to the signed 16-bit range
pub fn scale_stick(value: f32, inverted: bool) -> i32 {
    let value = if inverted { -value } else { value };
    let scaled = (value.clamp(-1.0, 1.0) * SAMPLE_MAX as f32).round() as i32;
    scaled.clamp(SAMPLE_MIN, SAMPLE_MAX)
}

/// Scales a gilrs trigger value (0.0..=1.0) to 0..=32767
pub fn scale_trigger(value: f32) -> i32 {
    (value.clamp(0.0, 1.0) * SAMPLE_MAX as f32).round() as i32
}
