//! mx3100-core: section protocol, settings codec, and memory dump/restore
//! for the MX-3100 gaming mouse.
//!
//! The device keeps its configuration in 64-byte memory sections. Every
//! setting change reads the configs and buttons sections, edits them in
//! memory, and writes both back. The USB transport is supplied by the caller
//! through [`transport::MouseTransport`].

pub mod dpi;
pub mod error;
pub mod led;
pub mod memory;
pub mod protocol;
pub mod safety;
pub mod section;
pub mod settings;
pub mod snapshot;
pub mod transport;

/// MX-3100 USB Vendor ID.
pub const MX3100_VID: u16 = 0x25A7;

/// MX-3100 USB Product ID.
pub const MX3100_PID: u16 = 0xFA70;

/// HID interface carrying the vendor configuration protocol.
pub const MX3100_INTERFACE: i32 = 1;
