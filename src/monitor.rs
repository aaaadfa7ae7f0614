//! Watch mode
//!
//! Rescans the input devices on a fixed interval and reports joysticks as
//! they are plugged in and removed, until interrupted with Ctrl-C.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::input::device_detection::{self, InputPaths, JoystickInventory};

/// Difference between two consecutive scans
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InventoryChange {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl InventoryChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub fn diff_inventories(previous: &JoystickInventory, current: &JoystickInventory) -> InventoryChange {
    InventoryChange {
        added: current.difference(previous).cloned().collect(),
        removed: previous.difference(current).cloned().collect(),
    }
}

/// Print one `+ path` / `- path` line per change
fn report_change(out: &mut impl Write, change: &InventoryChange) -> std::io::Result<()> {
    for path in &change.removed {
        writeln!(out, "- {}", path.display())?;
    }
    for path in &change.added {
        writeln!(out, "+ {}", path.display())?;
    }
    out.flush()
}

/// Run the polling loop on a single-threaded runtime
pub fn run_watch(input_paths: InputPaths, interval: Duration) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    rt.block_on(watch(input_paths, interval))
}

async fn watch(input_paths: InputPaths, interval: Duration) -> Result<()> {
    info!(
        path = %input_paths.dev_input.display(),
        interval_ms = interval.as_millis() as u64,
        "Watching for joysticks"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut known = JoystickInventory::new();
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let current = match device_detection::list_event_joysticks(&input_paths) {
                    Ok(current) => current,
                    Err(e) => {
                        error!(error = ?e, "Joystick scan failed");
                        continue;
                    }
                };

                let change = diff_inventories(&known, &current);
                if !change.is_empty() {
                    info!(
                        added = change.added.len(),
                        removed = change.removed.len(),
                        total = current.len(),
                        "Joysticks changed"
                    );
                    report_change(&mut stdout, &change).context("Failed to write to stdout")?;
                }
                known = current;
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
                info!("Interrupted, stopping watch");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(paths: &[&str]) -> JoystickInventory {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_diff_no_change() {
        let a = inventory(&["/dev/input/event3"]);
        assert!(diff_inventories(&a, &a).is_empty());
    }

    #[test]
    fn test_diff_added_and_removed() {
        let previous = inventory(&["/dev/input/event3", "/dev/input/event7"]);
        let current = inventory(&["/dev/input/event7", "/dev/input/event9"]);

        let change = diff_inventories(&previous, &current);
        assert_eq!(change.added, vec![PathBuf::from("/dev/input/event9")]);
        assert_eq!(change.removed, vec![PathBuf::from("/dev/input/event3")]);
    }

    #[test]
    fn test_diff_from_empty() {
        let current = inventory(&["/dev/input/event2", "/dev/input/event1"]);
        let change = diff_inventories(&JoystickInventory::new(), &current);
        assert_eq!(
            change.added,
            vec![
                PathBuf::from("/dev/input/event1"),
                PathBuf::from("/dev/input/event2")
            ]
        );
        assert!(change.removed.is_empty());
    }

    #[test]
    fn test_report_change_format() {
        let change = InventoryChange {
            added: vec![PathBuf::from("/dev/input/event4")],
            removed: vec![PathBuf::from("/dev/input/event2")],
        };
        let mut out = Vec::new();
        report_change(&mut out, &change).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "- /dev/input/event2\n+ /dev/input/event4\n"
        );
    }

    #[tokio::test]
    async fn test_watch_keeps_running_without_input_dir() {
        // A missing input directory is an empty inventory, not an error
        let temp_dir = tempfile::tempdir().unwrap();
        let paths = InputPaths {
            dev_input: temp_dir.path().join("missing"),
            ..InputPaths::default()
        };
        let result =
            tokio::time::timeout(Duration::from_millis(120), watch(paths, Duration::from_millis(50)))
                .await;
        assert!(result.is_err(), "watch only ends on Ctrl-C");
    }

    #[tokio::test]
    async fn test_watch_survives_failing_scans() {
        // Listing a regular file fails on every tick
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("input");
        std::fs::write(&file, b"").unwrap();
        let paths = InputPaths {
            dev_input: file.clone(),
            ..InputPaths::default()
        };
        assert!(device_detection::list_event_joysticks(&paths).is_err());

        let result =
            tokio::time::timeout(Duration::from_millis(200), watch(paths, Duration::from_millis(50)))
                .await;
        assert!(result.is_err(), "scan failures must not end the watch");
    }
}
