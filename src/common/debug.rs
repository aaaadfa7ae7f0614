use std::process::Command;
use tracing::{debug, warn};

use crate::constants::permissions;
use crate::input::device_detection::InputPaths;

/// Log system information for debugging purposes
pub fn log_system_info(input_paths: &InputPaths) {
    debug!("=== System Information ===");

    if let Ok(kernel) = get_command_output("uname", &["-sr"]) {
        debug!("Kernel: {}", kernel);
    }

    if let Ok(os_release) = std::fs::read_to_string("/etc/os-release") {
        for line in os_release.lines() {
            if let Some(name) = line.strip_prefix("PRETTY_NAME=") {
                debug!("OS: {}", name.trim_matches('"'));
                break;
            }
        }
    }

    // Which of the scanned directories are present and readable
    for dir in [&input_paths.dev_input, &input_paths.sys_class_input] {
        match std::fs::read_dir(dir) {
            Ok(entries) => debug!("{}: {} entries", dir.display(), entries.count()),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => warn!(
                "{} is not readable - are you in the '{}' group?",
                dir.display(),
                permissions::INPUT_GROUP
            ),
            Err(e) => debug!("{}: {}", dir.display(), e),
        }
    }

    debug!("==========================");
}

fn get_command_output(cmd: &str, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new(cmd).args(args).output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
