//! mx3100 CLI: command-line configuration for the MX-3100 gaming mouse.
//!
//! Each command with no value prints the current setting; with a value it
//! validates, then rewrites the settings sections. Exit status is 0 on
//! success, 255 (-1) on device or file failure, and 254 (-2) on invalid
//! input.

mod usb;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mx3100_core::dpi::{self, DpiProfile, Rgb};
use mx3100_core::error::{Error, ErrorClass};
use mx3100_core::led::{self, LedMode};
use mx3100_core::settings::{self, Axis};
use mx3100_core::{memory, safety, section, snapshot};
use mx3100_core::{MX3100_INTERFACE, MX3100_PID, MX3100_VID};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use usb::UsbMouse;

#[derive(Parser)]
#[command(
    name = "mx3100",
    version,
    about = "Configure persistent settings on the MX-3100 gaming mouse"
)]
struct Cli {
    /// USB vendor ID (decimal, or hex with 0x prefix).
    #[arg(long, global = true, default_value_t = MX3100_VID, value_parser = parse_usb_id)]
    vid: u16,
    /// USB product ID (decimal, or hex with 0x prefix).
    #[arg(long, global = true, default_value_t = MX3100_PID, value_parser = parse_usb_id)]
    pid: u16,
    /// HID interface number carrying the configuration protocol.
    #[arg(long, global = true, default_value_t = MX3100_INTERFACE)]
    interface: i32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get or set angle snapping (on, off).
    AngleSnap {
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Get or set angle correction (-2 to 2).
    AngleCorrect {
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Get or set the LED mode (off, standard, breathe, neon).
    LedMode {
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Get or set LED brightness (1-10, standard mode only).
    LedBrightness {
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Get or set LED speed (1-10, breathe and neon modes only).
    LedSpeed {
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Get or set sensitivity for one axis (1-10).
    Sensitivity {
        /// Axis: x or y.
        #[arg(allow_hyphen_values = true)]
        axis: String,
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Get or set whether a DPI profile is enabled.
    DpiEnable {
        /// DPI profile (1-7).
        #[arg(allow_hyphen_values = true)]
        profile: String,
        /// on, or anything else for off.
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Get or set a DPI profile's indicator colour.
    DpiColor {
        /// DPI profile (1-7).
        #[arg(allow_hyphen_values = true)]
        profile: String,
        /// Six hex digits, e.g. ff8800.
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Get or set a DPI profile's DPI (100-12000, multiples of 100).
    DpiValue {
        /// DPI profile (1-7).
        #[arg(allow_hyphen_values = true)]
        profile: String,
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Restore factory settings and erase all macros.
    FactoryReset,
    /// Write the full device memory to a file, or stdout when omitted or '-'.
    #[command(alias = "save-info")]
    Dump { file: Option<PathBuf> },
    /// Write a previous dump back to the device.
    Restore { file: PathBuf },
    /// Show every setting.
    Status {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn parse_usb_id(s: &str) -> std::result::Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse::<u16>(),
    };
    parsed.map_err(|e| format!("invalid USB id '{s}': {e}"))
}

/// Open the device and send the startup handshake.
fn open_mouse(cli: &Cli) -> Result<UsbMouse> {
    let mouse = UsbMouse::open(cli.vid, cli.pid, cli.interface)?;
    section::send_startup(&mouse).context("startup handshake failed")?;
    Ok(mouse)
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::AngleSnap { value: None } => {
            let mouse = open_mouse(cli)?;
            println!("{}", on_off(settings::read_angle_snap(&mouse)?));
        }
        Commands::AngleSnap { value: Some(value) } => {
            let enabled = safety::parse_on_off(value)?;
            let mouse = open_mouse(cli)?;
            settings::write_angle_snap(&mouse, enabled).context("error changing angle snap")?;
        }
        Commands::AngleCorrect { value: None } => {
            let mouse = open_mouse(cli)?;
            println!("{}", settings::read_angle_correction(&mouse)?);
        }
        Commands::AngleCorrect { value: Some(value) } => {
            let degree = settings::parse_angle_correction(value)?;
            let mouse = open_mouse(cli)?;
            settings::write_angle_correction(&mouse, degree)
                .context("error changing angle correction")?;
        }
        Commands::LedMode { value: None } => {
            let mouse = open_mouse(cli)?;
            println!("{}", led::read_led_mode(&mouse)?);
        }
        Commands::LedMode { value: Some(value) } => {
            let mode = LedMode::from_name(value)?;
            let mouse = open_mouse(cli)?;
            led::write_led_mode(&mouse, mode).context("error changing LED mode")?;
        }
        Commands::LedBrightness { value: None } => {
            let mouse = open_mouse(cli)?;
            println!("{}", led::read_led_brightness(&mouse)?);
        }
        Commands::LedBrightness { value: Some(value) } => {
            let brightness = led::parse_brightness(value)?;
            let mouse = open_mouse(cli)?;
            led::write_led_brightness(&mouse, brightness)
                .context("error changing LED brightness")?;
        }
        Commands::LedSpeed { value: None } => {
            let mouse = open_mouse(cli)?;
            println!("{}", led::read_led_speed(&mouse)?);
        }
        Commands::LedSpeed { value: Some(value) } => {
            let speed = led::parse_speed(value)?;
            let mouse = open_mouse(cli)?;
            led::write_led_speed(&mouse, speed).context("error changing LED speed")?;
        }
        Commands::Sensitivity { axis, value } => {
            let axis = Axis::from_name(axis)?;
            match value {
                None => {
                    let mouse = open_mouse(cli)?;
                    println!("{}", settings::read_sensitivity(&mouse, axis)?);
                }
                Some(value) => {
                    let sensitivity = settings::parse_sensitivity(value)?;
                    let mouse = open_mouse(cli)?;
                    settings::write_sensitivity(&mouse, axis, sensitivity)
                        .context("error changing sensitivity")?;
                }
            }
        }
        Commands::DpiEnable { profile, value } => {
            let profile = DpiProfile::from_arg(profile)?;
            match value {
                None => {
                    let mouse = open_mouse(cli)?;
                    println!("{}", on_off(dpi::read_dpi_enabled(&mouse, profile)?));
                }
                Some(value) => {
                    let enabled = dpi::parse_enable(value);
                    let mouse = open_mouse(cli)?;
                    dpi::write_dpi_enabled(&mouse, profile, enabled)
                        .context("error changing DPI profile")?;
                }
            }
        }
        Commands::DpiColor { profile, value } => {
            let profile = DpiProfile::from_arg(profile)?;
            match value {
                None => {
                    let mouse = open_mouse(cli)?;
                    println!("{}", dpi::read_dpi_color(&mouse, profile)?);
                }
                Some(value) => {
                    let color: Rgb = value.parse()?;
                    let mouse = open_mouse(cli)?;
                    dpi::write_dpi_color(&mouse, profile, color)
                        .context("error changing DPI color")?;
                }
            }
        }
        Commands::DpiValue { profile, value } => {
            let profile = DpiProfile::from_arg(profile)?;
            match value {
                None => {
                    let mouse = open_mouse(cli)?;
                    println!("{}", dpi::read_dpi_value(&mouse, profile)?);
                }
                Some(value) => {
                    let dpi_value = safety::validate_dpi(value)?;
                    let mouse = open_mouse(cli)?;
                    dpi::write_dpi_value(&mouse, profile, dpi_value)
                        .context("error changing DPI value")?;
                }
            }
        }
        Commands::FactoryReset => {
            let mouse = open_mouse(cli)?;
            memory::factory_reset(&mouse).context("error writing to memory")?;
            eprintln!("Factory settings restored");
        }
        Commands::Dump { file } => {
            let mouse = open_mouse(cli)?;
            let image = memory::dump(&mouse).context("error reading mouse memory")?;
            write_image(file.as_ref(), &image)?;
        }
        Commands::Restore { file } => {
            let image = fs::read(file)
                .map_err(Error::from)
                .with_context(|| format!("error reading {}", file.display()))?;
            memory::check_image(&image)?;
            let mouse = open_mouse(cli)?;
            memory::write_full_memory(&mouse, &image).context("error writing to memory")?;
            eprintln!("Restored {} bytes from {}", image.len(), file.display());
        }
        Commands::Status { json } => {
            let mouse = open_mouse(cli)?;
            let snap = snapshot::read_snapshot(&mouse)?;
            if *json {
                println!("{}", snap.to_json()?);
            } else {
                print!("{snap}");
            }
        }
    }
    Ok(())
}

/// Write a memory image to `file`, or to stdout for `None` / `-`.
///
/// Stdout carries raw bytes here, so nothing else may be printed to it.
fn write_image(file: Option<&PathBuf>, image: &[u8]) -> Result<()> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            fs::write(path, image)
                .map_err(Error::from)
                .with_context(|| format!("error opening {} for writing", path.display()))?;
            eprintln!("Wrote {} bytes to {}", image.len(), path.display());
        }
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(image).map_err(Error::from)?;
            stdout.flush().map_err(Error::from)?;
        }
    }
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    let class = err
        .downcast_ref::<Error>()
        .map(ErrorClass::classify)
        .unwrap_or(ErrorClass::Io);
    ExitCode::from(class.exit_status() as u8)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_code(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("mx3100").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn negative_values_reach_validation() {
        match parse(&["led-brightness", "-1"]).command {
            Commands::LedBrightness { value } => assert_eq!(value.as_deref(), Some("-1")),
            _ => panic!("wrong subcommand"),
        }
        match parse(&["led-speed", "-3"]).command {
            Commands::LedSpeed { value } => assert_eq!(value.as_deref(), Some("-3")),
            _ => panic!("wrong subcommand"),
        }
        match parse(&["sensitivity", "x", "-5"]).command {
            Commands::Sensitivity { axis, value } => {
                assert_eq!(axis, "x");
                assert_eq!(value.as_deref(), Some("-5"));
            }
            _ => panic!("wrong subcommand"),
        }
        match parse(&["dpi-value", "1", "-100"]).command {
            Commands::DpiValue { profile, value } => {
                assert_eq!(profile, "1");
                assert_eq!(value.as_deref(), Some("-100"));
            }
            _ => panic!("wrong subcommand"),
        }
        match parse(&["angle-correct", "-2"]).command {
            Commands::AngleCorrect { value } => assert_eq!(value.as_deref(), Some("-2")),
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn negative_profile_reaches_validation() {
        match parse(&["dpi-color", "-1"]).command {
            Commands::DpiColor { profile, value } => {
                assert_eq!(profile, "-1");
                assert!(value.is_none());
            }
            _ => panic!("wrong subcommand"),
        }
        match parse(&["dpi-enable", "-1", "on"]).command {
            Commands::DpiEnable { profile, value } => {
                assert_eq!(profile, "-1");
                assert_eq!(value.as_deref(), Some("on"));
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn negative_values_fail_as_validation_errors() {
        let err = safety::parse_in_range("led brightness", "-1", 1, 10).unwrap_err();
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Validation);
    }

    #[test]
    fn usb_ids_accept_hex_and_decimal() {
        assert_eq!(parse_usb_id("0x25A7"), Ok(0x25A7));
        assert_eq!(parse_usb_id("64112"), Ok(64112));
        assert!(parse_usb_id("0xZZ").is_err());
    }
}
