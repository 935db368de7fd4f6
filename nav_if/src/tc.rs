//! # Telecommand module
//!
//! Telecommands are the instructions a host (or a test script) sends to the drive executable:
//! request a route, start or reset a simulation mode, and press or release directional keys.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Internal
use crate::input::{InputEvent, Key};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand.
///
/// Serialised as JSON with the variant in a `type` field, for example
/// `{"type": "PRESS", "key": "LEFT"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tc {
    /// Resolve both places and fetch a new path between them.
    Route {
        origin_id: String,
        destination_id: String,
    },

    /// Start playing the vehicle along the current path.
    StartTutorial,

    /// Start driving the vehicle from the keyboard.
    StartManual,

    /// Stop any running mode and put the vehicle back at the origin.
    Reset,

    Press { key: Key },

    Release { key: Key },

    /// Stop the executable.
    Stop,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {
    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)
    }

    /// The input event carried by this TC, if it is a key press or release.
    pub fn input_event(&self) -> Option<InputEvent> {
        match *self {
            Tc::Press { key } => Some(InputEvent::Press(key)),
            Tc::Release { key } => Some(InputEvent::Release(key)),
            _ => None,
        }
    }
}
