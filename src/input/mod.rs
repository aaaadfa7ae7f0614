//! Input device inspection and joystick detection

pub mod capabilities;
pub mod classifier;
pub mod device_detection;
