//! Safety layer: parses and validates every user-supplied value before
//! anything is sent to the device.
//!
//! # MX-3100 Bounds
//!
//! ## DPI
//! - **Range**: 100 – 12,000 DPI
//! - **Step size**: 100 DPI; other values are rejected, not rounded
//! - **Encoding**: one byte per axis, `dpi / 100 - 1`
//!
//! ## DPI Profiles
//! - **Range**: 1–7, each with its own enable bit, colour, and DPI value
//!
//! ## Angle Correction
//! - **Range**: -2 to 2
//!
//! ## LED
//! - **Brightness**: 1–10, `standard` mode only
//! - **Speed**: 1–10, `breathe` and `neon` modes only
//!
//! ## Sensitivity
//! - **Range**: 1–10 per axis, stored in steps of 10
//!
//! ## Safety Invariants
//! 1. Parsing and range checks run before any device I/O
//! 2. A rejected value never mutates a section buffer
//! 3. Numbers must parse completely; "12abc" is not 12 and "abc" is not 0

use crate::error::{Error, Result};

pub const DPI_MIN: u16 = 100;
pub const DPI_MAX: u16 = 12000;
pub const DPI_STEP: u16 = 100;

pub const DPI_PROFILE_MIN: u8 = 1;
pub const DPI_PROFILE_MAX: u8 = 7;

pub const ANGLE_CORRECT_MIN: i8 = -2;
pub const ANGLE_CORRECT_MAX: i8 = 2;

pub const LED_BRIGHT_MIN: u8 = 1;
pub const LED_BRIGHT_MAX: u8 = 10;
pub const LED_SPEED_MIN: u8 = 1;
pub const LED_SPEED_MAX: u8 = 10;

pub const SENSITIVITY_MIN: u8 = 1;
pub const SENSITIVITY_MAX: u8 = 10;
pub const SENSITIVITY_STEP: u8 = 10;

/// Parse a decimal integer, rejecting trailing garbage.
pub fn parse_int(field: &'static str, input: &str) -> Result<i64> {
    input.trim().parse::<i64>().map_err(|_| Error::InvalidValue {
        field,
        value: input.to_string(),
        expected: "expected a whole number",
    })
}

/// Check that `value` lies in `min..=max`.
pub fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Error::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Parse a decimal integer and check it against `min..=max`.
pub fn parse_in_range(field: &'static str, input: &str, min: i64, max: i64) -> Result<i64> {
    check_range(field, parse_int(field, input)?, min, max)
}

/// Parse `on` / `off`, case-insensitive.
pub fn parse_on_off(input: &str) -> Result<bool> {
    if input.eq_ignore_ascii_case("on") {
        Ok(true)
    } else if input.eq_ignore_ascii_case("off") {
        Ok(false)
    } else {
        Err(Error::InvalidValue {
            field: "switch",
            value: input.to_string(),
            expected: "valid values are 'on' or 'off'",
        })
    }
}

/// Check a DPI value: in range and a multiple of [`DPI_STEP`].
pub fn check_dpi(dpi: i64) -> Result<u16> {
    let dpi = check_range("dpi", dpi, DPI_MIN as i64, DPI_MAX as i64)?;
    if dpi % DPI_STEP as i64 != 0 {
        return Err(Error::InvalidValue {
            field: "dpi",
            value: dpi.to_string(),
            expected: "DPI must be a multiple of 100 (100, 200, 300, .. 12000)",
        });
    }
    Ok(dpi as u16)
}

/// Parse a DPI value from user input.
pub fn validate_dpi(input: &str) -> Result<u16> {
    check_dpi(parse_int("dpi", input)?)
}

/// Parse a 1-based DPI profile number.
pub fn validate_profile(input: &str) -> Result<u8> {
    let value = parse_in_range(
        "DPI profile",
        input,
        DPI_PROFILE_MIN as i64,
        DPI_PROFILE_MAX as i64,
    )?;
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_rejects_garbage() {
        assert_eq!(parse_int("n", "42").unwrap(), 42);
        assert_eq!(parse_int("n", "-2").unwrap(), -2);
        assert!(parse_int("n", "12abc").is_err());
        assert!(parse_int("n", "abc").is_err());
        assert!(parse_int("n", "").is_err());
    }

    #[test]
    fn check_range_bounds_inclusive() {
        assert!(check_range("n", 1, 1, 10).is_ok());
        assert!(check_range("n", 10, 1, 10).is_ok());
        assert!(check_range("n", 0, 1, 10).is_err());
        assert!(check_range("n", 11, 1, 10).is_err());
    }

    #[test]
    fn on_off_accepts_any_case() {
        assert!(parse_on_off("on").unwrap());
        assert!(parse_on_off("ON").unwrap());
        assert!(parse_on_off("On").unwrap());
        assert!(!parse_on_off("off").unwrap());
        assert!(!parse_on_off("OFF").unwrap());
        assert!(!parse_on_off("oFf").unwrap());
    }

    #[test]
    fn on_off_rejects_other_words() {
        for input in ["", "o", "of", "onn", "offf", "yes", "1", "n"] {
            assert!(parse_on_off(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn validate_dpi_accepts_steps() {
        assert_eq!(validate_dpi("100").unwrap(), 100);
        assert_eq!(validate_dpi("800").unwrap(), 800);
        assert_eq!(validate_dpi("12000").unwrap(), 12000);
    }

    #[test]
    fn validate_dpi_rejects_off_step_and_out_of_range() {
        assert!(validate_dpi("850").is_err());
        assert!(validate_dpi("0").is_err());
        assert!(validate_dpi("12100").is_err());
        assert!(validate_dpi("-100").is_err());
    }

    #[test]
    fn check_dpi_step_before_encoding() {
        assert_eq!(check_dpi(1200).unwrap(), 1200);
        assert!(matches!(check_dpi(1250), Err(Error::InvalidValue { .. })));
        assert!(matches!(check_dpi(99), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn validate_profile_range() {
        for p in 1..=7 {
            assert_eq!(validate_profile(&p.to_string()).unwrap(), p);
        }
        assert!(validate_profile("0").is_err());
        assert!(validate_profile("8").is_err());
    }
}
