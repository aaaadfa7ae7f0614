//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Key capability codes and ranges (from Linux input-event-codes.h)
pub mod input {
    /// Keys that practically never appear on a joystick but are common on keyboards.
    /// Kept sorted for binary search.
    pub const WELL_KNOWN_KEYBOARD_KEYS: [u64; 10] = [
        29,  // KEY_LEFTCTRL
        58,  // KEY_CAPSLOCK
        69,  // KEY_NUMLOCK
        110, // KEY_INSERT
        113, // KEY_MUTE
        140, // KEY_CALC
        144, // KEY_FILE
        155, // KEY_MAIL
        164, // KEY_PLAYPAUSE
        224, // KEY_BRIGHTNESSDOWN
    ];

    /// Top of the mouse button range (BTN_JOYSTICK - 1)
    pub const MOUSE_BUTTON_BOUNDARY: u64 = 0x11F;

    /// BTN_JOYSTICK
    pub const BTN_JOYSTICK: u64 = 0x120;
    /// BTN_DIGI
    pub const BTN_DIGI: u64 = 0x140;
    /// KEY_OK
    pub const KEY_OK: u64 = 0x160;
    /// BTN_DPAD_UP
    pub const BTN_DPAD_UP: u64 = 0x220;
    /// BTN_DPAD_RIGHT
    pub const BTN_DPAD_RIGHT: u64 = 0x223;
    /// KEY_ALS_TOGGLE
    pub const KEY_ALS_TOGGLE: u64 = 0x230;
    /// BTN_TRIGGER_HAPPY
    pub const BTN_TRIGGER_HAPPY: u64 = 0x2C0;
    /// BTN_TRIGGER_HAPPY40
    pub const BTN_TRIGGER_HAPPY40: u64 = 0x2E7;

    /// Start of the generic keyboard key range (exclusive of KEY_RESERVED)
    pub const KEYBOARD_RANGE_START: u64 = 0x01;
    /// End of the generic keyboard key range (exclusive)
    pub const KEYBOARD_RANGE_END: u64 = 0x100;
}

/// Classification thresholds (derived from libinput's joystick heuristics)
pub mod thresholds {
    /// This many well-known keyboard keys means the device is a keyboard
    pub const WELL_KNOWN_KEYBOARD_KEYS: usize = 4;

    /// Fewer joystick buttons than this and the device is something else
    pub const MIN_JOYSTICK_BUTTONS: usize = 2;

    /// This many ordinary keyboard keys rules out a joystick
    pub const KEYBOARD_KEYS: usize = 10;
}

/// System paths
pub mod paths {
    /// Input device directory
    pub const DEV_INPUT: &str = "/dev/input";

    /// sysfs input class directory
    pub const SYS_CLASS_INPUT: &str = "/sys/class/input";

    /// Key capability bitmask, relative to a device's sysfs directory
    pub const KEY_CAPABILITIES: &str = "device/capabilities/key";

    /// Name prefix of evdev character devices
    pub const EVENT_DEVICE_PREFIX: &str = "event";
}

/// User group permissions
pub mod permissions {
    /// Linux group name for input device access
    pub const INPUT_GROUP: &str = "input";
}

/// Configuration paths and filenames
pub mod config {
    /// Application directory name under XDG config
    pub const APP_DIR: &str = "joystick-monitor";

    /// Configuration filename
    pub const FILENAME: &str = "config.json";

    /// Environment variable overriding the configuration directory
    pub const DIR_ENV: &str = "JOYSTICK_MONITOR_CONFIG_DIR";
}

/// Default configuration values
pub mod defaults {
    /// Interval between scans in watch mode
    pub const POLL_INTERVAL_MS: u64 = 1000;

    /// Smallest interval accepted for watch mode
    pub const MIN_POLL_INTERVAL_MS: u64 = 50;
}
