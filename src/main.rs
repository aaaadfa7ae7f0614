#![deny(unsafe_code)]

mod common;
mod config;
mod constants;
mod input;
mod monitor;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use evdev::KeyCode;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Settings;
use crate::input::device_detection::{self, DeviceReport, InputPaths, JoystickInventory};

#[derive(Parser)]
#[command(name = "joystick-monitor")]
#[command(version)]
#[command(about = "Detect joysticks and gamepads among the system's input devices", long_about = None)]
struct Cli {
    /// Keep running and report joysticks as they appear and disappear
    #[arg(long)]
    watch: bool,

    /// Scan interval for --watch, in milliseconds
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Print the joystick list as a JSON array
    #[arg(long, conflicts_with = "watch")]
    json: bool,

    /// Show how every candidate device was classified
    #[arg(long, conflicts_with_all = ["watch", "json"])]
    explain: bool,

    /// Directory holding the input device nodes
    #[arg(long, value_name = "DIR")]
    input_dir: Option<PathBuf>,

    /// sysfs input class directory
    #[arg(long, value_name = "DIR")]
    sysfs_dir: Option<PathBuf>,

    /// Write the effective settings to the config file
    #[arg(long)]
    save_config: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(dir) = &self.input_dir {
            settings.input_dir = dir.clone();
        }
        if let Some(dir) = &self.sysfs_dir {
            settings.sysfs_input_dir = dir.clone();
        }
        if let Some(interval_ms) = self.interval_ms {
            settings.poll_interval_ms = interval_ms;
        }
    }
}

fn init_tracing(debug: bool) -> Result<()> {
    // Logs go to stderr so stdout stays a clean device listing
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let mut settings = Settings::load_or_default();
    cli.apply_overrides(&mut settings);

    if cli.save_config {
        let path = settings.save()?;
        info!(path = %path.display(), "Settings written");
    }

    let input_paths = settings.input_paths();
    common::debug::log_system_info(&input_paths);

    if cli.watch {
        return monitor::run_watch(input_paths, settings.poll_interval());
    }

    let mut stdout = std::io::stdout().lock();

    if cli.explain {
        return explain_devices(&input_paths, &mut stdout);
    }

    let joysticks = device_detection::list_event_joysticks(&input_paths)?;
    device_detection::log_inventory(&joysticks);
    print_inventory(&mut stdout, &joysticks, cli.json)
}

fn print_inventory(out: &mut impl Write, joysticks: &JoystickInventory, json: bool) -> Result<()> {
    if json {
        let json = serde_json::to_string_pretty(joysticks).context("Failed to serialize joysticks")?;
        writeln!(out, "{}", json)?;
    } else {
        for path in joysticks {
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(())
}

fn explain_devices(input_paths: &InputPaths, out: &mut impl Write) -> Result<()> {
    for name in device_detection::candidate_devices(input_paths)? {
        match device_detection::explain_device(input_paths, &name) {
            Ok(report) => write_report(out, &report)?,
            Err(e) => warn!(device = %name, error = %e, "Failed to check device compatibility, ignoring"),
        }
    }
    Ok(())
}

fn write_report(out: &mut impl Write, report: &DeviceReport) -> std::io::Result<()> {
    writeln!(
        out,
        "{}: {} (joystick buttons: {}, keyboard keys: {}, well-known keyboard keys: {})",
        report.device,
        report.classification,
        report.counts.joystick_buttons,
        report.counts.keyboard_keys,
        report.counts.well_known_keyboard_keys,
    )?;

    if !report.capabilities.is_empty() {
        let names: Vec<String> = report
            .capabilities
            .iter()
            .map(|code| match u16::try_from(code) {
                Ok(code) => format!("{:?}", KeyCode(code)),
                Err(_) => code.to_string(),
            })
            .collect();
        writeln!(out, "    {}", names.join(" "))?;
    }
    Ok(())
}
