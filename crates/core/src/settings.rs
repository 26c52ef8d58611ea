//! Settings registry: where each logical setting lives in the configs
//! section, and how it is encoded.
//!
//! Decoding and encoding are pure operations on [`SettingsBuffers`]. The
//! `read_*` / `write_*` functions wrap them in the device round trip: both
//! settings sections are read fresh, modified in memory, and written back
//! together, since the device has no partial writes.

use crate::dpi::DpiProfile;
use crate::error::{Error, Result};
use crate::protocol::{addr, Section};
use crate::safety::{self, SENSITIVITY_MAX, SENSITIVITY_MIN, SENSITIVITY_STEP};
use crate::section::{read_section, write_section};
use crate::transport::MouseTransport;
use std::fmt;
use tracing::debug;

/// Byte offsets inside the configs section.
pub mod offsets {
    /// One enable bit per DPI profile, bit 0 = profile 1.
    pub const DPI_ENABLE: usize = 0x02;
    /// Seven X-axis DPI bytes, one per profile.
    pub const DPI_VALUE_X: usize = 0x0C;
    /// Seven Y-axis DPI bytes, one per profile.
    pub const DPI_VALUE_Y: usize = 0x14;
    /// First RGB triple of the DPI profile colours.
    pub const DPI_COLOR_START: usize = 0x1C;
    /// Distance between two profile colours.
    pub const DPI_COLOR_STEP: usize = 3;
    pub const LED_MODE: usize = 0x32;
    /// Brightness or speed, depending on the LED mode.
    pub const LED_CFG: usize = 0x33;
    pub const ANGLE_SNAP: usize = 0x35;
    pub const ANGLE_CORRECT: usize = 0x36;
    pub const SENSITIVITY_X: usize = 0x38;
    pub const SENSITIVITY_Y: usize = 0x39;
}

pub const ANGLE_SNAP_ENABLED: u8 = 0x01;
pub const ANGLE_SNAP_DISABLED: u8 = 0x00;

/// Angle correction sentinel bytes, indexed by degree.
const ANGLE_CORRECT_TABLE: [(i8, u8); 5] = [
    (-2, 0xFE),
    (-1, 0xFF),
    (0, 0x00),
    (1, 0x01),
    (2, 0x02),
];

/// Sensor axis for sensitivity settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Parse `x` or `y` (case-insensitive, exactly one character).
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            _ => Err(Error::InvalidValue {
                field: "axis",
                value: name.to_string(),
                expected: "must specify X or Y",
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

/// Identifier of every byte the registry touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    DpiEnable,
    DpiValueX(DpiProfile),
    DpiValueY(DpiProfile),
    /// Channel 0..3 (R, G, B) of a profile colour.
    DpiColor(DpiProfile, usize),
    LedMode,
    LedConfig,
    AngleSnap,
    AngleCorrect,
    Sensitivity(Axis),
}

impl Field {
    /// Offset of this field inside the configs section.
    pub fn offset(&self) -> usize {
        match *self {
            Self::DpiEnable => offsets::DPI_ENABLE,
            Self::DpiValueX(p) => offsets::DPI_VALUE_X + p.index(),
            Self::DpiValueY(p) => offsets::DPI_VALUE_Y + p.index(),
            Self::DpiColor(p, channel) => {
                debug_assert!(channel < 3);
                offsets::DPI_COLOR_START + p.index() * offsets::DPI_COLOR_STEP + channel
            }
            Self::LedMode => offsets::LED_MODE,
            Self::LedConfig => offsets::LED_CFG,
            Self::AngleSnap => offsets::ANGLE_SNAP,
            Self::AngleCorrect => offsets::ANGLE_CORRECT,
            Self::Sensitivity(Axis::X) => offsets::SENSITIVITY_X,
            Self::Sensitivity(Axis::Y) => offsets::SENSITIVITY_Y,
        }
    }
}

/// A decoded byte, or the raw byte when it matches no known encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading<T> {
    Known(T),
    Unknown(u8),
}

impl<T> Reading<T> {
    pub fn known(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{v}"),
            Self::Unknown(raw) => write!(f, "unknown value: 0x{raw:02x}"),
        }
    }
}

/// The two settings sections as read from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsBuffers {
    pub config: Section,
    pub buttons: Section,
}

impl SettingsBuffers {
    pub fn new(config: Section, buttons: Section) -> Self {
        Self { config, buttons }
    }

    pub fn get(&self, field: Field) -> u8 {
        self.config[field.offset()]
    }

    pub fn set(&mut self, field: Field, value: u8) {
        self.config[field.offset()] = value;
    }

    pub fn angle_snap(&self) -> bool {
        self.get(Field::AngleSnap) == ANGLE_SNAP_ENABLED
    }

    pub fn set_angle_snap(&mut self, enabled: bool) {
        let raw = if enabled {
            ANGLE_SNAP_ENABLED
        } else {
            ANGLE_SNAP_DISABLED
        };
        self.set(Field::AngleSnap, raw);
    }

    pub fn angle_correction(&self) -> Reading<i8> {
        let raw = self.get(Field::AngleCorrect);
        ANGLE_CORRECT_TABLE
            .iter()
            .find(|(_, sentinel)| *sentinel == raw)
            .map_or(Reading::Unknown(raw), |(degree, _)| Reading::Known(*degree))
    }

    pub fn set_angle_correction(&mut self, degree: i8) -> Result<()> {
        let sentinel = angle_correction_sentinel(degree)?;
        self.set(Field::AngleCorrect, sentinel);
        Ok(())
    }

    /// Sensitivity in user units (stored byte divided by the step).
    pub fn sensitivity(&self, axis: Axis) -> u8 {
        self.get(Field::Sensitivity(axis)) / SENSITIVITY_STEP
    }

    pub fn set_sensitivity(&mut self, axis: Axis, value: u8) -> Result<()> {
        validate_sensitivity(value as i64)?;
        self.set(Field::Sensitivity(axis), value * SENSITIVITY_STEP);
        Ok(())
    }
}

fn angle_correction_sentinel(degree: i8) -> Result<u8> {
    ANGLE_CORRECT_TABLE
        .iter()
        .find(|(d, _)| *d == degree)
        .map(|(_, sentinel)| *sentinel)
        .ok_or(Error::OutOfRange {
            field: "angle correction",
            value: degree as i64,
            min: safety::ANGLE_CORRECT_MIN as i64,
            max: safety::ANGLE_CORRECT_MAX as i64,
        })
}

fn validate_sensitivity(value: i64) -> Result<u8> {
    let value = safety::check_range(
        "sensitivity",
        value,
        SENSITIVITY_MIN as i64,
        SENSITIVITY_MAX as i64,
    )?;
    Ok(value as u8)
}

/// Parse a sensitivity value from user input.
pub fn parse_sensitivity(input: &str) -> Result<u8> {
    validate_sensitivity(safety::parse_int("sensitivity", input)?)
}

/// Parse an angle correction value from user input.
pub fn parse_angle_correction(input: &str) -> Result<i8> {
    let value = safety::parse_in_range(
        "angle correction",
        input,
        safety::ANGLE_CORRECT_MIN as i64,
        safety::ANGLE_CORRECT_MAX as i64,
    )?;
    Ok(value as i8)
}

/// Read the configs and buttons sections.
pub fn read_settings(transport: &dyn MouseTransport) -> Result<SettingsBuffers> {
    let config = read_section(transport, addr::CONFIGS)?;
    let buttons = read_section(transport, addr::BUTTONS)?;
    Ok(SettingsBuffers::new(config, buttons))
}

/// Write both settings sections back, configs first.
pub fn write_settings(transport: &dyn MouseTransport, settings: &SettingsBuffers) -> Result<()> {
    write_section(transport, addr::CONFIGS, &settings.config)?;
    write_section(transport, addr::BUTTONS, &settings.buttons)
}

/// Read both sections, apply `change`, and write them back.
///
/// Nothing is written when `change` fails.
pub fn modify_settings<F>(transport: &dyn MouseTransport, change: F) -> Result<()>
where
    F: FnOnce(&mut SettingsBuffers) -> Result<()>,
{
    let mut settings = read_settings(transport)?;
    change(&mut settings)?;
    write_settings(transport, &settings)?;
    debug!("Settings written");
    Ok(())
}

pub fn read_angle_snap(transport: &dyn MouseTransport) -> Result<bool> {
    Ok(read_settings(transport)?.angle_snap())
}

pub fn write_angle_snap(transport: &dyn MouseTransport, enabled: bool) -> Result<()> {
    modify_settings(transport, |s| {
        s.set_angle_snap(enabled);
        Ok(())
    })
}

pub fn read_angle_correction(transport: &dyn MouseTransport) -> Result<Reading<i8>> {
    Ok(read_settings(transport)?.angle_correction())
}

pub fn write_angle_correction(transport: &dyn MouseTransport, degree: i8) -> Result<()> {
    angle_correction_sentinel(degree)?;
    modify_settings(transport, |s| s.set_angle_correction(degree))
}

pub fn read_sensitivity(transport: &dyn MouseTransport, axis: Axis) -> Result<u8> {
    Ok(read_settings(transport)?.sensitivity(axis))
}

pub fn write_sensitivity(transport: &dyn MouseTransport, axis: Axis, value: u8) -> Result<()> {
    validate_sensitivity(value as i64)?;
    modify_settings(transport, |s| s.set_sensitivity(axis, value))?;
    debug!(axis = axis.name(), value, "Sensitivity set");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SECTION_LEN;
    use crate::transport::mock::MockTransport;

    fn blank() -> SettingsBuffers {
        SettingsBuffers::new([0u8; SECTION_LEN], [0u8; SECTION_LEN])
    }

    #[test]
    fn angle_snap_sentinels() {
        let mut s = blank();
        s.set_angle_snap(true);
        assert_eq!(s.config[offsets::ANGLE_SNAP], ANGLE_SNAP_ENABLED);
        assert!(s.angle_snap());
        s.set_angle_snap(false);
        assert_eq!(s.config[offsets::ANGLE_SNAP], ANGLE_SNAP_DISABLED);
        assert!(!s.angle_snap());
    }

    #[test]
    fn angle_correction_all_degrees() {
        let mut s = blank();
        for degree in -2..=2 {
            s.set_angle_correction(degree).unwrap();
            assert_eq!(s.angle_correction(), Reading::Known(degree));
        }
        // Each degree has its own sentinel.
        let sentinels: std::collections::HashSet<u8> =
            ANGLE_CORRECT_TABLE.iter().map(|(_, b)| *b).collect();
        assert_eq!(sentinels.len(), 5);
    }

    #[test]
    fn angle_correction_rejects_out_of_range_without_mutation() {
        let mut s = blank();
        s.set_angle_correction(1).unwrap();
        let before = s.clone();
        assert!(s.set_angle_correction(3).is_err());
        assert!(s.set_angle_correction(-3).is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn angle_correction_unknown_byte() {
        let mut s = blank();
        s.config[offsets::ANGLE_CORRECT] = 0x42;
        let reading = s.angle_correction();
        assert_eq!(reading, Reading::Unknown(0x42));
        assert_eq!(reading.to_string(), "unknown value: 0x42");
    }

    #[test]
    fn sensitivity_uses_step() {
        let mut s = blank();
        s.set_sensitivity(Axis::X, 7).unwrap();
        s.set_sensitivity(Axis::Y, 3).unwrap();
        assert_eq!(s.config[offsets::SENSITIVITY_X], 70);
        assert_eq!(s.config[offsets::SENSITIVITY_Y], 30);
        assert_eq!(s.sensitivity(Axis::X), 7);
        assert_eq!(s.sensitivity(Axis::Y), 3);
    }

    #[test]
    fn sensitivity_rejects_out_of_range() {
        let mut s = blank();
        assert!(s.set_sensitivity(Axis::X, 0).is_err());
        assert!(s.set_sensitivity(Axis::X, 11).is_err());
        assert_eq!(s, blank());
        assert!(parse_sensitivity("abc").is_err());
        assert_eq!(parse_sensitivity("10").unwrap(), 10);
    }

    #[test]
    fn axis_names() {
        assert_eq!(Axis::from_name("x").unwrap(), Axis::X);
        assert_eq!(Axis::from_name("X").unwrap(), Axis::X);
        assert_eq!(Axis::from_name("Y").unwrap(), Axis::Y);
        assert_eq!(Axis::from_name(Axis::X.name()).unwrap(), Axis::X);
        assert_eq!(Axis::Y.name(), "y");
        assert!(Axis::from_name("xy").is_err());
        assert!(Axis::from_name("z").is_err());
        assert!(Axis::from_name("").is_err());
    }

    #[test]
    fn parse_angle_correction_accepts_negative() {
        assert_eq!(parse_angle_correction("-2").unwrap(), -2);
        assert_eq!(parse_angle_correction("2").unwrap(), 2);
        assert!(parse_angle_correction("3").is_err());
        assert!(parse_angle_correction("one").is_err());
    }

    #[test]
    fn write_sensitivity_round_trip() {
        let mock = MockTransport::new();
        write_sensitivity(&mock, Axis::X, 8).unwrap();
        assert_eq!(read_sensitivity(&mock, Axis::X).unwrap(), 8);
        assert_eq!(read_sensitivity(&mock, Axis::Y).unwrap(), 0);
    }

    #[test]
    fn write_writes_both_sections() {
        let mock = MockTransport::new();
        let mut buttons = [0u8; SECTION_LEN];
        buttons[0] = 0xAB;
        mock.set_section(addr::BUTTONS, buttons);

        write_angle_snap(&mock, true).unwrap();
        assert_eq!(mock.section_writes(), vec![addr::CONFIGS, addr::BUTTONS]);
        assert_eq!(mock.section(addr::BUTTONS), buttons);
        assert!(read_angle_snap(&mock).unwrap());
    }

    #[test]
    fn rejected_value_never_reaches_device() {
        let mock = MockTransport::new();
        assert!(write_angle_correction(&mock, 5).is_err());
        assert!(write_sensitivity(&mock, Axis::Y, 0).is_err());
        assert!(mock.frames().is_empty());
    }
}
