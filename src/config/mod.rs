//! # Key Mapping Configuration
//!
//! Describes which synthetic key every controller input produces. The mapping
//! is stored on disk as a flat JSON file ([`MappingFile`]) and validated into a
//! [`ControlMapping`] before anything else starts.
//!
//! ## File Format
//! ```json
//! {
//!     "axes": { "0": [16384, 123, 124] },
//!     "buttons": { "11": 126 },
//!     "triggers": { "4": [16384, 14] }
//! }
//! ```
//! Axis entries are `[threshold, negative key, positive key]`, trigger entries
//! `[threshold, key]`. Ids follow [`crate::input::layout`]; key codes are
//! macOS virtual key codes.
//!
//! ## Error Handling Strategy
//! Every problem here is fatal at startup. Key codes are carried unchecked as
//! written in the file; their platform range is enforced when the native key
//! events are built.

pub mod loader;

pub use loader::{load_or_create, CONFIG_FILE};

use crate::input::layout::*;
use crate::input::{ControlId, ControlKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Threshold used by every analog entry of the default mapping
pub const DEFAULT_THRESHOLD: i32 = 0x4000;

/// Bidirectional stick binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBinding {
    pub threshold: i32,
    pub negative_key: i64,
    pub positive_key: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonBinding {
    pub key: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerBinding {
    pub threshold: i32,
    pub key: i64,
}

/// Validated mapping from control ids to key bindings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlMapping {
    pub axes: HashMap<ControlId, AxisBinding>,
    pub buttons: HashMap<ControlId, ButtonBinding>,
    pub triggers: HashMap<ControlId, TriggerBinding>,
}

/// On-disk representation of the mapping
///
/// Keys stay strings so the file keeps the shape JSON objects allow; they are
/// parsed into ids during validation.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MappingFile {
    #[serde(default)]
    pub axes: BTreeMap<String, [i64; 3]>,
    #[serde(default)]
    pub buttons: BTreeMap<String, i64>,
    #[serde(default)]
    pub triggers: BTreeMap<String, [i64; 2]>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read mapping file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to write default mapping to {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to encode mapping: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Malformed mapping file {path:?} (moved to {quarantined:?}): {source}")]
    Malformed {
        path: PathBuf,
        quarantined: PathBuf,
        source: serde_json::Error,
    },

    #[error("Malformed mapping file {path:?} could not be moved aside: {source}")]
    Quarantine {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{kind} id {key:?} is not a valid control id")]
    InvalidControlId { kind: ControlKind, key: String },

    #[error("{kind} {id} is mapped more than once")]
    DuplicateControlId { kind: ControlKind, id: ControlId },

    #[error("{kind} {id} has threshold {threshold}, expected a positive value")]
    InvalidThreshold {
        kind: ControlKind,
        id: ControlId,
        threshold: i64,
    },
}

fn parse_id(kind: ControlKind, key: &str) -> Result<ControlId, ConfigError> {
    key.parse::<ControlId>()
        .map_err(|_| ConfigError::InvalidControlId {
            kind,
            key: key.to_string(),
        })
}

/// Inserts a binding, rejecting a second key that names the same id ("1", "01")
fn insert_unique<B>(
    table: &mut HashMap<ControlId, B>,
    kind: ControlKind,
    id: ControlId,
    binding: B,
) -> Result<(), ConfigError> {
    match table.insert(id, binding) {
        Some(_) => Err(ConfigError::DuplicateControlId { kind, id }),
        None => Ok(()),
    }
}

fn parse_threshold(kind: ControlKind, id: ControlId, threshold: i64) -> Result<i32, ConfigError> {
    match i32::try_from(threshold) {
        Ok(t) if t > 0 => Ok(t),
        _ => Err(ConfigError::InvalidThreshold {
            kind,
            id,
            threshold,
        }),
    }
}

impl TryFrom<MappingFile> for ControlMapping {
    type Error = ConfigError;

    fn try_from(file: MappingFile) -> Result<Self, Self::Error> {
        let mut mapping = ControlMapping::default();

        for (key, [threshold, negative_key, positive_key]) in file.axes {
            let id = parse_id(ControlKind::Axis, &key)?;
            let threshold = parse_threshold(ControlKind::Axis, id, threshold)?;
            insert_unique(
                &mut mapping.axes,
                ControlKind::Axis,
                id,
                AxisBinding {
                    threshold,
                    negative_key,
                    positive_key,
                },
            )?;
        }

        for (key, key_code) in file.buttons {
            let id = parse_id(ControlKind::Button, &key)?;
            insert_unique(
                &mut mapping.buttons,
                ControlKind::Button,
                id,
                ButtonBinding { key: key_code },
            )?;
        }

        for (key, [threshold, key_code]) in file.triggers {
            let id = parse_id(ControlKind::Trigger, &key)?;
            let threshold = parse_threshold(ControlKind::Trigger, id, threshold)?;
            insert_unique(
                &mut mapping.triggers,
                ControlKind::Trigger,
                id,
                TriggerBinding {
                    threshold,
                    key: key_code,
                },
            )?;
        }

        debug!(
            "Validated mapping: {} axes, {} buttons, {} triggers",
            mapping.axes.len(),
            mapping.buttons.len(),
            mapping.triggers.len()
        );
        Ok(mapping)
    }
}

impl From<&ControlMapping> for MappingFile {
    fn from(mapping: &ControlMapping) -> Self {
        MappingFile {
            axes: mapping
                .axes
                .iter()
                .map(|(id, a)| {
                    (
                        id.to_string(),
                        [i64::from(a.threshold), a.negative_key, a.positive_key],
                    )
                })
                .collect(),
            buttons: mapping
                .buttons
                .iter()
                .map(|(id, b)| (id.to_string(), b.key))
                .collect(),
            triggers: mapping
                .triggers
                .iter()
                .map(|(id, t)| (id.to_string(), [i64::from(t.threshold), t.key]))
                .collect(),
        }
    }
}

impl ControlMapping {
    /// Default bindings for a standard gamepad
    ///
    /// Sticks drive the arrow keys and A/S/X/Z, face buttons type Z/X/A/S,
    /// triggers E/R.
    pub fn default_mapping() -> Self {
        let axis = |negative_key, positive_key| AxisBinding {
            threshold: DEFAULT_THRESHOLD,
            negative_key,
            positive_key,
        };
        let trigger = |key| TriggerBinding {
            threshold: DEFAULT_THRESHOLD,
            key,
        };

        let axes = HashMap::from([
            (AXIS_LEFT_X, axis(0x7B, 0x7C)),  // Arrow Left + Right
            (AXIS_LEFT_Y, axis(0x7E, 0x7D)),  // Arrow Up + Down
            (AXIS_RIGHT_X, axis(0x00, 0x07)), // A + X
            (AXIS_RIGHT_Y, axis(0x01, 0x06)), // S + Z
        ]);

        let buttons = [
            (BUTTON_DPAD_UP, 0x7E),        // Up
            (BUTTON_DPAD_DOWN, 0x7D),      // Down
            (BUTTON_DPAD_LEFT, 0x7B),      // Left
            (BUTTON_DPAD_RIGHT, 0x7C),     // Right
            (BUTTON_A, 0x06),              // Z
            (BUTTON_B, 0x07),              // X
            (BUTTON_X, 0x00),              // A
            (BUTTON_Y, 0x01),              // S
            (BUTTON_LEFT_SHOULDER, 0x0C),  // Q
            (BUTTON_RIGHT_SHOULDER, 0x0D), // W
            (BUTTON_LEFT_STICK, 0x38),     // Shift
            (BUTTON_RIGHT_STICK, 0x3B),    // Ctrl
            (BUTTON_BACK, 0x33),           // Delete
            (BUTTON_GUIDE, 0x30),          // Tab
            (BUTTON_START, 0x24),          // Return
        ]
        .into_iter()
        .map(|(id, key)| (id, ButtonBinding { key }))
        .collect();

        let triggers = HashMap::from([
            (TRIGGER_LEFT, trigger(0x0E)),  // E
            (TRIGGER_RIGHT, trigger(0x0F)), // R
        ]);

        ControlMapping {
            axes,
            buttons,
            triggers,
        }
    }
}
