//! DPI profiles: enable bits, indicator colours, and DPI values.
//!
//! The MX-3100 stores seven DPI presets. Each has:
//!   - an enable bit in a shared byte (bit 0 = profile 1)
//!   - an RGB colour, three bytes at a fixed stride
//!   - a DPI value, one byte per axis encoded as `dpi / 100 - 1`; both axes
//!     are always written together

use crate::error::{Error, Result};
use crate::safety::{self, DPI_PROFILE_MAX, DPI_PROFILE_MIN, DPI_STEP};
use crate::settings::{modify_settings, read_settings, Field, SettingsBuffers};
use crate::transport::MouseTransport;
use std::fmt;
use std::str::FromStr;

/// A validated 1-based DPI profile number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DpiProfile(u8);

impl DpiProfile {
    pub fn new(number: u8) -> Result<Self> {
        safety::check_range(
            "DPI profile",
            number as i64,
            DPI_PROFILE_MIN as i64,
            DPI_PROFILE_MAX as i64,
        )?;
        Ok(Self(number))
    }

    /// Parse a profile number from user input.
    pub fn from_arg(input: &str) -> Result<Self> {
        Self::new(safety::validate_profile(input)?)
    }

    /// All profiles, in order.
    pub fn all() -> impl Iterator<Item = DpiProfile> {
        (DPI_PROFILE_MIN..=DPI_PROFILE_MAX).map(Self)
    }

    /// 1-based profile number.
    pub fn number(&self) -> u8 {
        self.0
    }

    /// 0-based index.
    pub fn index(&self) -> usize {
        (self.0 - DPI_PROFILE_MIN) as usize
    }

    fn bit(&self) -> u8 {
        1 << self.index()
    }
}

impl fmt::Display for DpiProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Profile indicator colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FromStr for Rgb {
    type Err = Error;

    /// Parse six hex digits without a leading `#`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidValue {
            field: "color",
            value: s.to_string(),
            expected: "please specify a 6-character hex string without '#'",
        };
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Stored byte for a DPI value.
fn encode_dpi(dpi: u16) -> u8 {
    (dpi / DPI_STEP - 1) as u8
}

fn decode_dpi(raw: u8) -> u16 {
    (raw as u16 + 1) * DPI_STEP
}

impl SettingsBuffers {
    pub fn dpi_enabled(&self, profile: DpiProfile) -> bool {
        self.get(Field::DpiEnable) & profile.bit() != 0
    }

    pub fn set_dpi_enabled(&mut self, profile: DpiProfile, enabled: bool) {
        let flags = self.get(Field::DpiEnable);
        let flags = if enabled {
            flags | profile.bit()
        } else {
            flags & !profile.bit()
        };
        self.set(Field::DpiEnable, flags);
    }

    pub fn dpi_color(&self, profile: DpiProfile) -> Rgb {
        Rgb {
            r: self.get(Field::DpiColor(profile, 0)),
            g: self.get(Field::DpiColor(profile, 1)),
            b: self.get(Field::DpiColor(profile, 2)),
        }
    }

    pub fn set_dpi_color(&mut self, profile: DpiProfile, color: Rgb) {
        self.set(Field::DpiColor(profile, 0), color.r);
        self.set(Field::DpiColor(profile, 1), color.g);
        self.set(Field::DpiColor(profile, 2), color.b);
    }

    /// DPI of a profile, taken from the X axis byte.
    pub fn dpi_value(&self, profile: DpiProfile) -> u16 {
        decode_dpi(self.get(Field::DpiValueX(profile)))
    }

    pub fn set_dpi_value(&mut self, profile: DpiProfile, dpi: u16) -> Result<()> {
        let dpi = safety::check_dpi(dpi as i64)?;
        let raw = encode_dpi(dpi);
        self.set(Field::DpiValueX(profile), raw);
        self.set(Field::DpiValueY(profile), raw);
        Ok(())
    }
}

/// Parse the on/off argument of `dpi-enable`: anything but exactly `on`
/// disables.
pub fn parse_enable(input: &str) -> bool {
    input == "on"
}

pub fn read_dpi_enabled(transport: &dyn MouseTransport, profile: DpiProfile) -> Result<bool> {
    Ok(read_settings(transport)?.dpi_enabled(profile))
}

pub fn write_dpi_enabled(
    transport: &dyn MouseTransport,
    profile: DpiProfile,
    enabled: bool,
) -> Result<()> {
    modify_settings(transport, |s| {
        s.set_dpi_enabled(profile, enabled);
        Ok(())
    })
}

pub fn read_dpi_color(transport: &dyn MouseTransport, profile: DpiProfile) -> Result<Rgb> {
    Ok(read_settings(transport)?.dpi_color(profile))
}

pub fn write_dpi_color(
    transport: &dyn MouseTransport,
    profile: DpiProfile,
    color: Rgb,
) -> Result<()> {
    modify_settings(transport, |s| {
        s.set_dpi_color(profile, color);
        Ok(())
    })
}

pub fn read_dpi_value(transport: &dyn MouseTransport, profile: DpiProfile) -> Result<u16> {
    Ok(read_settings(transport)?.dpi_value(profile))
}

/// Write a DPI value to both axes of a profile.
///
/// The value is validated before the device is touched.
pub fn write_dpi_value(transport: &dyn MouseTransport, profile: DpiProfile, dpi: u16) -> Result<()> {
    safety::check_dpi(dpi as i64)?;
    modify_settings(transport, |s| s.set_dpi_value(profile, dpi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{addr, SECTION_LEN};
    use crate::settings::offsets;
    use crate::transport::mock::MockTransport;

    fn blank() -> SettingsBuffers {
        SettingsBuffers::new([0u8; SECTION_LEN], [0u8; SECTION_LEN])
    }

    fn profile(n: u8) -> DpiProfile {
        DpiProfile::new(n).unwrap()
    }

    #[test]
    fn profile_bounds() {
        assert!(DpiProfile::new(0).is_err());
        assert!(DpiProfile::new(8).is_err());
        assert_eq!(DpiProfile::all().count(), 7);
        assert_eq!(profile(1).index(), 0);
        assert_eq!(profile(7).index(), 6);
        assert!(DpiProfile::from_arg("3").is_ok());
        assert!(DpiProfile::from_arg("three").is_err());
    }

    #[test]
    fn enable_bit_isolated_per_profile() {
        for p in DpiProfile::all() {
            for initial in [0x00u8, 0x7F] {
                let mut s = blank();
                s.config[offsets::DPI_ENABLE] = initial;
                let enabled = initial == 0;
                s.set_dpi_enabled(p, enabled);
                assert_eq!(s.dpi_enabled(p), enabled);
                for other in DpiProfile::all().filter(|o| *o != p) {
                    assert_eq!(s.dpi_enabled(other), !enabled, "profile {other} changed");
                }
            }
        }
    }

    #[test]
    fn enable_uses_low_bits() {
        let mut s = blank();
        s.set_dpi_enabled(profile(1), true);
        s.set_dpi_enabled(profile(7), true);
        assert_eq!(s.config[offsets::DPI_ENABLE], 0b0100_0001);
    }

    #[test]
    fn parse_enable_anything_but_on_disables() {
        assert!(parse_enable("on"));
        assert!(!parse_enable("ON"));
        assert!(!parse_enable("On"));
        assert!(!parse_enable("off"));
        assert!(!parse_enable("yes"));
    }

    #[test]
    fn color_offsets_and_canonical_form() {
        let mut s = blank();
        let color: Rgb = "A1b2C3".parse().unwrap();
        s.set_dpi_color(profile(3), color);
        let base = offsets::DPI_COLOR_START + 2 * offsets::DPI_COLOR_STEP;
        assert_eq!(&s.config[base..base + 3], &[0xA1, 0xB2, 0xC3]);
        assert_eq!(s.dpi_color(profile(3)).to_string(), "a1b2c3");
        assert_eq!(s.dpi_color(profile(2)).to_string(), "000000");
    }

    #[test]
    fn color_rejects_malformed() {
        for input in ["", "fff", "#a1b2c3", "a1b2c3d", "g1b2c3", "a1 2c3", "ä1b2c"] {
            assert!(input.parse::<Rgb>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn dpi_value_encoding() {
        let mut s = blank();
        s.set_dpi_value(profile(2), 800).unwrap();
        assert_eq!(s.config[offsets::DPI_VALUE_X + 1], 7);
        assert_eq!(s.config[offsets::DPI_VALUE_Y + 1], 7);
        assert_eq!(s.dpi_value(profile(2)), 800);
    }

    #[test]
    fn dpi_value_every_step_round_trips() {
        let mut s = blank();
        for dpi in (100..=12000).step_by(100) {
            s.set_dpi_value(profile(5), dpi).unwrap();
            assert_eq!(s.dpi_value(profile(5)), dpi);
        }
    }

    #[test]
    fn dpi_value_rejects_without_mutation() {
        let mut s = blank();
        s.set_dpi_value(profile(1), 1600).unwrap();
        let before = s.clone();
        for dpi in [0, 50, 150, 12100, 12050] {
            assert!(s.set_dpi_value(profile(1), dpi).is_err(), "accepted {dpi}");
        }
        assert_eq!(s, before);
    }

    #[test]
    fn write_dpi_value_touches_only_its_profile() {
        let mock = MockTransport::new();
        write_dpi_value(&mock, profile(4), 3200).unwrap();
        let config = mock.section(addr::CONFIGS);
        assert_eq!(config[offsets::DPI_VALUE_X + 3], 31);
        assert_eq!(config[offsets::DPI_VALUE_Y + 3], 31);
        assert_eq!(config.iter().filter(|b| **b != 0).count(), 2);
        assert_eq!(read_dpi_value(&mock, profile(4)).unwrap(), 3200);
    }

    #[test]
    fn write_dpi_value_rejected_before_io() {
        let mock = MockTransport::new();
        assert!(write_dpi_value(&mock, profile(1), 850).is_err());
        assert!(mock.frames().is_empty());
    }

    #[test]
    fn write_color_and_enable() {
        let mock = MockTransport::new();
        write_dpi_color(&mock, profile(6), "00ff7f".parse().unwrap()).unwrap();
        write_dpi_enabled(&mock, profile(6), true).unwrap();
        assert_eq!(read_dpi_color(&mock, profile(6)).unwrap().to_string(), "00ff7f");
        assert!(read_dpi_enabled(&mock, profile(6)).unwrap());
        assert!(!read_dpi_enabled(&mock, profile(5)).unwrap());
    }
}
