//! # Directional input
//!
//! Input sources (keyboard, touch buttons, scripts) press and release keys asynchronously. The
//! manual controller only ever reads a snapshot of the flags taken at the start of a tick, so a
//! flag cannot toggle part way through a computation.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The directional inputs active during a tick.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Input flags which may be written from event handlers on any thread and read once per tick.
///
/// All four flags live in a single atomic byte so that `snapshot` is always consistent.
#[derive(Debug, Clone, Default)]
pub struct SharedInputFlags {
    bits: Arc<AtomicU8>,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// A directional key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
}

/// A transition emitted by an input source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Press(Key),
    Release(Key),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Key {
    fn mask(self) -> u8 {
        match self {
            Key::Forward => 0b0001,
            Key::Backward => 0b0010,
            Key::Left => 0b0100,
            Key::Right => 0b1000,
        }
    }
}

impl InputFlags {
    /// True if no key is held.
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }

    /// Set the flag for the given key.
    pub fn set(&mut self, key: Key, held: bool) {
        match key {
            Key::Forward => self.forward = held,
            Key::Backward => self.backward = held,
            Key::Left => self.left = held,
            Key::Right => self.right = held,
        }
    }

    /// Apply a press or release event.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press(k) => self.set(k, true),
            InputEvent::Release(k) => self.set(k, false),
        }
    }

    fn from_bits(bits: u8) -> Self {
        Self {
            forward: bits & Key::Forward.mask() != 0,
            backward: bits & Key::Backward.mask() != 0,
            left: bits & Key::Left.mask() != 0,
            right: bits & Key::Right.mask() != 0,
        }
    }
}

impl SharedInputFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, key: Key) {
        self.bits.fetch_or(key.mask(), Ordering::AcqRel);
    }

    pub fn release(&self, key: Key) {
        self.bits.fetch_and(!key.mask(), Ordering::AcqRel);
    }

    pub fn apply(&self, event: InputEvent) {
        match event {
            InputEvent::Press(k) => self.press(k),
            InputEvent::Release(k) => self.release(k),
        }
    }

    /// Release every key.
    pub fn clear(&self) {
        self.bits.store(0, Ordering::Release);
    }

    /// Read all flags at once.
    pub fn snapshot(&self) -> InputFlags {
        InputFlags::from_bits(self.bits.load(Ordering::Acquire))
    }
}
