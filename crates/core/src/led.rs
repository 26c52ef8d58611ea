//! LED mode, brightness, and speed.
//!
//! Brightness and speed share one byte. Which of the two it holds depends on
//! the LED mode, so each is only readable or writable in the modes that use
//! it. Switching mode resets the shared byte.

use crate::error::{Error, Result};
use crate::safety::{self, LED_BRIGHT_MAX, LED_BRIGHT_MIN, LED_SPEED_MAX, LED_SPEED_MIN};
use crate::settings::{modify_settings, read_settings, Field, Reading, SettingsBuffers};
use crate::transport::MouseTransport;
use serde::Serialize;
use std::fmt;

/// LED lighting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedMode {
    Off,
    Standard,
    Breathe,
    Neon,
}

impl LedMode {
    pub const ALL: &'static [LedMode] = &[
        LedMode::Off,
        LedMode::Standard,
        LedMode::Breathe,
        LedMode::Neon,
    ];

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(Self::Off),
            0x01 => Some(Self::Standard),
            0x02 => Some(Self::Breathe),
            0x03 => Some(Self::Neon),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::Standard => 0x01,
            Self::Breathe => 0x02,
            Self::Neon => 0x03,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Standard => "standard",
            Self::Breathe => "breathe",
            Self::Neon => "neon",
        }
    }

    /// Parse a mode name as typed on the command line.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == name)
            .ok_or_else(|| Error::InvalidValue {
                field: "LED mode",
                value: name.to_string(),
                expected: "must be one of: off, standard, breathe, neon",
            })
    }

    fn uses_brightness(&self) -> bool {
        matches!(self, Self::Standard)
    }

    fn uses_speed(&self) -> bool {
        matches!(self, Self::Breathe | Self::Neon)
    }
}

impl fmt::Display for LedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SettingsBuffers {
    pub fn led_mode(&self) -> Reading<LedMode> {
        let raw = self.get(Field::LedMode);
        LedMode::from_byte(raw).map_or(Reading::Unknown(raw), Reading::Known)
    }

    /// Switch mode. `standard` starts at full brightness, `breathe` and
    /// `neon` at the slowest speed; `off` keeps the shared byte.
    pub fn set_led_mode(&mut self, mode: LedMode) {
        self.set(Field::LedMode, mode.as_byte());
        if mode.uses_brightness() {
            self.set(Field::LedConfig, LED_BRIGHT_MAX);
        } else if mode.uses_speed() {
            self.set(Field::LedConfig, LED_SPEED_MIN);
        }
    }

    pub fn led_brightness(&self) -> Result<u8> {
        self.require_mode(LedMode::uses_brightness, "brightness", "'standard'")?;
        Ok(self.get(Field::LedConfig))
    }

    pub fn set_led_brightness(&mut self, value: u8) -> Result<()> {
        self.require_mode(LedMode::uses_brightness, "brightness", "'standard'")?;
        validate_brightness(value as i64)?;
        self.set(Field::LedConfig, value);
        Ok(())
    }

    pub fn led_speed(&self) -> Result<u8> {
        self.require_mode(LedMode::uses_speed, "speed", "'breathe' or 'neon'")?;
        Ok(self.get(Field::LedConfig))
    }

    pub fn set_led_speed(&mut self, value: u8) -> Result<()> {
        self.require_mode(LedMode::uses_speed, "speed", "'breathe' or 'neon'")?;
        validate_speed(value as i64)?;
        self.set(Field::LedConfig, value);
        Ok(())
    }

    fn require_mode(
        &self,
        allowed: fn(&LedMode) -> bool,
        setting: &'static str,
        required: &'static str,
    ) -> Result<()> {
        match self.led_mode() {
            Reading::Known(mode) if allowed(&mode) => Ok(()),
            _ => Err(Error::LedModeMismatch { setting, required }),
        }
    }
}

fn validate_brightness(value: i64) -> Result<u8> {
    let value = safety::check_range(
        "brightness",
        value,
        LED_BRIGHT_MIN as i64,
        LED_BRIGHT_MAX as i64,
    )?;
    Ok(value as u8)
}

fn validate_speed(value: i64) -> Result<u8> {
    let value = safety::check_range("speed", value, LED_SPEED_MIN as i64, LED_SPEED_MAX as i64)?;
    Ok(value as u8)
}

/// Parse a brightness value from user input.
pub fn parse_brightness(input: &str) -> Result<u8> {
    validate_brightness(safety::parse_int("brightness", input)?)
}

/// Parse a speed value from user input.
pub fn parse_speed(input: &str) -> Result<u8> {
    validate_speed(safety::parse_int("speed", input)?)
}

pub fn read_led_mode(transport: &dyn MouseTransport) -> Result<Reading<LedMode>> {
    Ok(read_settings(transport)?.led_mode())
}

pub fn write_led_mode(transport: &dyn MouseTransport, mode: LedMode) -> Result<()> {
    modify_settings(transport, |s| {
        s.set_led_mode(mode);
        Ok(())
    })
}

pub fn read_led_brightness(transport: &dyn MouseTransport) -> Result<u8> {
    read_settings(transport)?.led_brightness()
}

pub fn write_led_brightness(transport: &dyn MouseTransport, value: u8) -> Result<()> {
    validate_brightness(value as i64)?;
    modify_settings(transport, |s| s.set_led_brightness(value))
}

pub fn read_led_speed(transport: &dyn MouseTransport) -> Result<u8> {
    read_settings(transport)?.led_speed()
}

pub fn write_led_speed(transport: &dyn MouseTransport, value: u8) -> Result<()> {
    validate_speed(value as i64)?;
    modify_settings(transport, |s| s.set_led_speed(value))
}
