//! A decoded view of every managed setting, for `status` output.

use crate::dpi::DpiProfile;
use crate::error::Result;
use crate::led::LedMode;
use crate::settings::{read_settings, Axis, SettingsBuffers};
use crate::transport::MouseTransport;
use serde::Serialize;
use std::fmt;

/// One DPI profile as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DpiProfileSnapshot {
    pub profile: u8,
    pub enabled: bool,
    pub color: String,
    pub dpi: u16,
}

/// All settings decoded from the configs section.
///
/// Fields that are unknown on the device or not applicable to the current
/// LED mode are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsSnapshot {
    pub angle_snap: bool,
    pub angle_correction: Option<i8>,
    pub led_mode: Option<LedMode>,
    pub led_brightness: Option<u8>,
    pub led_speed: Option<u8>,
    pub sensitivity_x: u8,
    pub sensitivity_y: u8,
    pub dpi_profiles: Vec<DpiProfileSnapshot>,
}

impl SettingsSnapshot {
    pub fn from_buffers(settings: &SettingsBuffers) -> Self {
        Self {
            angle_snap: settings.angle_snap(),
            angle_correction: settings.angle_correction().known(),
            led_mode: settings.led_mode().known(),
            led_brightness: settings.led_brightness().ok(),
            led_speed: settings.led_speed().ok(),
            sensitivity_x: settings.sensitivity(Axis::X),
            sensitivity_y: settings.sensitivity(Axis::Y),
            dpi_profiles: DpiProfile::all()
                .map(|p| DpiProfileSnapshot {
                    profile: p.number(),
                    enabled: settings.dpi_enabled(p),
                    color: settings.dpi_color(p).to_string(),
                    dpi: settings.dpi_value(p),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for SettingsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |b: bool| if b { "on" } else { "off" };
        let or_unknown = |v: Option<String>| v.unwrap_or_else(|| "unknown".to_string());

        writeln!(f, "angle-snap: {}", on_off(self.angle_snap))?;
        writeln!(
            f,
            "angle-correct: {}",
            or_unknown(self.angle_correction.map(|v| v.to_string()))
        )?;
        writeln!(
            f,
            "led-mode: {}",
            or_unknown(self.led_mode.map(|m| m.to_string()))
        )?;
        if let Some(brightness) = self.led_brightness {
            writeln!(f, "led-brightness: {brightness}")?;
        }
        if let Some(speed) = self.led_speed {
            writeln!(f, "led-speed: {speed}")?;
        }
        writeln!(f, "sensitivity: x={} y={}", self.sensitivity_x, self.sensitivity_y)?;
        for p in &self.dpi_profiles {
            writeln!(
                f,
                "dpi {}: {:<3} {:>5} #{}",
                p.profile,
                on_off(p.enabled),
                p.dpi,
                p.color
            )?;
        }
        Ok(())
    }
}

/// Read the settings sections and decode them.
pub fn read_snapshot(transport: &dyn MouseTransport) -> Result<SettingsSnapshot> {
    Ok(SettingsSnapshot::from_buffers(&read_settings(transport)?))
}
