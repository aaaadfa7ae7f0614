//! Joystick device detection
//!
//! Walks the evdev device directory and decides for each `event*` node whether
//! it is a joystick, using the key capability bitmask published in sysfs.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use evdev::Device;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::{paths, permissions};
use crate::input::capabilities::{CapabilityParseError, CapabilitySet, parse_capabilities};
use crate::input::classifier::{self, Classification, KeyScan};

/// Device paths classified as joysticks in one scan
pub type JoystickInventory = BTreeSet<PathBuf>;

/// Failure to inspect a single device
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("failed to read device {device} keys")]
    Read {
        device: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse device {device} keys")]
    Capabilities {
        device: String,
        #[source]
        source: CapabilityParseError,
    },
}

/// Where to look for input devices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    /// Directory holding the device nodes (`/dev/input`)
    pub dev_input: PathBuf,
    /// sysfs input class directory (`/sys/class/input`)
    pub sys_class_input: PathBuf,
    /// Only entries starting with this prefix are considered
    pub device_prefix: String,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            dev_input: PathBuf::from(paths::DEV_INPUT),
            sys_class_input: PathBuf::from(paths::SYS_CLASS_INPUT),
            device_prefix: paths::EVENT_DEVICE_PREFIX.to_string(),
        }
    }
}

impl InputPaths {
    fn key_capabilities_path(&self, device_name: &str) -> PathBuf {
        self.sys_class_input
            .join(device_name)
            .join(paths::KEY_CAPABILITIES)
    }
}

/// Everything the classifier saw for one device
#[derive(Debug, Clone)]
pub struct DeviceReport {
    pub device: String,
    pub capabilities: CapabilitySet,
    pub counts: KeyScan,
    pub classification: Classification,
}

/// Scans the input directory and returns the paths of all joystick devices
///
/// A missing input directory yields an empty inventory. Devices that cannot
/// be inspected are logged and skipped.
pub fn list_event_joysticks(input_paths: &InputPaths) -> Result<JoystickInventory> {
    let mut joysticks = JoystickInventory::new();

    for name in candidate_devices(input_paths)? {
        match is_compatible_device(input_paths, &name) {
            Ok(true) => {
                let path = input_paths.dev_input.join(&name);
                debug!(device_path = %path.display(), "Found joystick");
                joysticks.insert(path);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(device = %name, error = %e, "Failed to check device compatibility, ignoring");
            }
        }
    }

    Ok(joysticks)
}

/// Check whether a device (e.g. "event0") looks like a joystick
///
/// A device without a key capability file is not a joystick.
pub fn is_compatible_device(
    input_paths: &InputPaths,
    device_name: &str,
) -> std::result::Result<bool, DeviceError> {
    Ok(read_key_capabilities(input_paths, device_name)?
        .is_some_and(|caps| classifier::is_joystick(&caps)))
}

/// Classify a device and keep the intermediate results for diagnostics
pub fn explain_device(
    input_paths: &InputPaths,
    device_name: &str,
) -> std::result::Result<DeviceReport, DeviceError> {
    let capabilities = read_key_capabilities(input_paths, device_name)?.unwrap_or_default();
    let (counts, classification) = classifier::scan(&capabilities);

    Ok(DeviceReport {
        device: device_name.to_string(),
        capabilities,
        counts,
        classification,
    })
}

/// Names of all candidate devices in the input directory, sorted
pub fn candidate_devices(input_paths: &InputPaths) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(&input_paths.dev_input) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %input_paths.dev_input.display(), "Input directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e).context(format!(
                "Failed to read {} - are you in the '{}' group?",
                input_paths.dev_input.display(),
                permissions::INPUT_GROUP
            ));
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to list {}", input_paths.dev_input.display()))?;
        // Device names are plain ASCII; anything else is not an evdev node
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with(&input_paths.device_prefix) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Read and parse the key capability bitmask of a device
///
/// Returns `None` when the device publishes no key capabilities.
fn read_key_capabilities(
    input_paths: &InputPaths,
    device_name: &str,
) -> std::result::Result<Option<CapabilitySet>, DeviceError> {
    let path = input_paths.key_capabilities_path(device_name);

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        // Normally the file exists and holds "0", but not always
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(DeviceError::Read {
                device: device_name.to_string(),
                source,
            });
        }
    };

    parse_capabilities(&raw)
        .map(Some)
        .map_err(|source| DeviceError::Capabilities {
            device: device_name.to_string(),
            source,
        })
}

/// Best-effort human-readable name of a device node, for log output
pub fn device_name(path: &Path) -> Option<String> {
    Device::open(path)
        .ok()
        .and_then(|device| device.name().map(str::to_string))
}

/// Log each joystick in the inventory with its name when it can be opened
pub fn log_inventory(joysticks: &JoystickInventory) {
    for path in joysticks {
        info!(
            device_path = %path.display(),
            name = ?device_name(path),
            "Found joystick"
        );
    }
    info!(count = joysticks.len(), "Joystick scan complete");
}
