//! Joystick classification from key capabilities
//!
//! There is no kernel flag that marks a device as a joystick, so the decision
//! is made from the shape of its key bitmask, following libinput's heuristics:
//! enough joystick buttons, not too many keyboard keys, and no signature of a
//! keyboard or of a mouse with a large button count.

use std::fmt;

use crate::constants::{input, thresholds};
use crate::input::capabilities::{CapabilityCode, CapabilitySet};

/// Which family a single key code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// Ordinary keyboard key
    Keyboard,
    /// Joystick, gamepad, D-pad or trigger-happy button
    JoystickButton,
    /// The last mouse button code, only seen on mice with many buttons
    MouseOverflow,
    /// Anything the heuristic ignores (mouse buttons, digitizer tools, ...)
    Other,
}

/// Assign a key code to its family. The ranges are disjoint.
pub fn key_class(code: CapabilityCode) -> KeyClass {
    use crate::constants::input::*;

    match code {
        KEYBOARD_RANGE_START..KEYBOARD_RANGE_END => KeyClass::Keyboard,
        MOUSE_BUTTON_BOUNDARY => KeyClass::MouseOverflow,
        BTN_JOYSTICK..BTN_DIGI => KeyClass::JoystickButton,
        KEY_OK..BTN_DPAD_UP => KeyClass::Keyboard,
        BTN_DPAD_UP..=BTN_DPAD_RIGHT => KeyClass::JoystickButton,
        KEY_ALS_TOGGLE..BTN_TRIGGER_HAPPY => KeyClass::Keyboard,
        BTN_TRIGGER_HAPPY..=BTN_TRIGGER_HAPPY40 => KeyClass::JoystickButton,
        _ => KeyClass::Other,
    }
}

pub fn is_well_known_keyboard_key(code: CapabilityCode) -> bool {
    input::WELL_KNOWN_KEYBOARD_KEYS.binary_search(&code).is_ok()
}

/// Counters gathered over a device's key capabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyScan {
    pub well_known_keyboard_keys: usize,
    pub keyboard_keys: usize,
    pub joystick_buttons: usize,
}

impl KeyScan {
    fn record(&mut self, code: CapabilityCode, class: KeyClass) {
        if is_well_known_keyboard_key(code) {
            self.well_known_keyboard_keys += 1;
        }
        match class {
            KeyClass::Keyboard => self.keyboard_keys += 1,
            KeyClass::JoystickButton => self.joystick_buttons += 1,
            KeyClass::MouseOverflow | KeyClass::Other => {}
        }
    }

    /// Apply the threshold rules in order; the first failing rule wins
    fn verdict(&self) -> Classification {
        if self.well_known_keyboard_keys >= thresholds::WELL_KNOWN_KEYBOARD_KEYS {
            Classification::Rejected(Rejection::KeyboardSignature)
        } else if self.joystick_buttons < thresholds::MIN_JOYSTICK_BUTTONS {
            Classification::Rejected(Rejection::TooFewButtons)
        } else if self.keyboard_keys >= thresholds::KEYBOARD_KEYS {
            Classification::Rejected(Rejection::TooManyKeyboardKeys)
        } else {
            Classification::Joystick
        }
    }
}

/// Why a device was not taken for a joystick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The device reports no key capabilities at all
    NoKeys,
    /// The device has the highest mouse button code
    MouseButtons,
    /// At least four well-known keyboard keys
    KeyboardSignature,
    /// Fewer than two joystick buttons
    TooFewButtons,
    /// Ten or more ordinary keyboard keys
    TooManyKeyboardKeys,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::NoKeys => "no key capabilities",
            Rejection::MouseButtons => "looks like a mouse with many buttons",
            Rejection::KeyboardSignature => "looks like a keyboard",
            Rejection::TooFewButtons => "not enough joystick buttons",
            Rejection::TooManyKeyboardKeys => "too many keyboard keys",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Joystick,
    Rejected(Rejection),
}

impl Classification {
    pub fn is_joystick(&self) -> bool {
        matches!(self, Classification::Joystick)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Joystick => f.write_str("joystick"),
            Classification::Rejected(reason) => write!(f, "rejected: {}", reason),
        }
    }
}

/// Scan the key capabilities and classify the device
///
/// Returns the counters alongside the result. A mouse overflow code stops the
/// scan early, so the counters are partial in that case.
pub fn scan(caps: &CapabilitySet) -> (KeyScan, Classification) {
    let mut counts = KeyScan::default();

    if caps.is_empty() {
        return (counts, Classification::Rejected(Rejection::NoKeys));
    }

    for code in caps.iter() {
        let class = key_class(code);
        if class == KeyClass::MouseOverflow {
            return (counts, Classification::Rejected(Rejection::MouseButtons));
        }
        counts.record(code, class);
    }

    (counts, counts.verdict())
}

pub fn classify(caps: &CapabilitySet) -> Classification {
    scan(caps).1
}

/// Whether the key capabilities look like a joystick or gamepad
pub fn is_joystick(caps: &CapabilitySet) -> bool {
    classify(caps).is_joystick()
}
