//! Error types for mx3100-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A control or data transfer failed at the USB layer.
    #[error("USB transfer failed: {0}")]
    Transport(String),

    /// No matching device was found when opening the transport.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Value out of the range the device accepts.
    #[error("value out of range: {field} = {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// User-supplied value could not be parsed.
    #[error("invalid {field} '{value}': {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// LED brightness/speed accessed while the LED mode does not use it.
    #[error("{setting} is only valid when {required} LED mode is active")]
    LedModeMismatch {
        setting: &'static str,
        required: &'static str,
    },

    /// A memory image passed to restore is not a full dump.
    #[error("memory image is {actual} bytes, expected exactly {expected}")]
    ImageSize { actual: usize, expected: usize },

    /// Reading or writing a dump file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be rendered as JSON.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of errors by what the caller should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Device communication, file, or output failed; device state may be unknown.
    Io,
    /// The request was rejected before anything was written to the device.
    Validation,
}

impl ErrorClass {
    /// Classify an error for exit status reporting.
    pub fn classify(err: &Error) -> Self {
        match err {
            Error::Transport(_) | Error::DeviceNotFound(_) | Error::Io(_) | Error::Serialize(_) => {
                Self::Io
            }
            Error::OutOfRange { .. }
            | Error::InvalidValue { .. }
            | Error::LedModeMismatch { .. }
            | Error::ImageSize { .. } => Self::Validation,
        }
    }

    /// Process exit status: -1 for I/O failures, -2 for rejected input.
    pub fn exit_status(&self) -> i32 {
        match self {
            Self::Io => -1,
            Self::Validation => -2,
        }
    }
}
