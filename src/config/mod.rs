//! Configuration management
//!
//! JSON settings file with per-field defaults; command line flags override it.

pub mod settings;

pub use settings::Settings;
