//! Section transfers: one command frame followed by two data lines.
//!
//! Nothing here retries. A transport error aborts the transfer and is
//! returned to the caller as-is.

use crate::error::Result;
use crate::protocol::{
    data_line, CommandFrame, Frame, Section, DATA_LINE_LEN, SECTION_LEN, STARTUP_FRAMES,
};
use crate::transport::MouseTransport;
use tracing::{debug, trace, warn};

/// Send the initialisation frames a freshly opened device expects.
pub fn send_startup(transport: &dyn MouseTransport) -> Result<()> {
    for frame in &STARTUP_FRAMES {
        trace!(frame_hex = format_args!("{:02X?}", frame), "startup TX");
        transport.send_control(frame)?;
    }
    debug!("Startup handshake sent");
    Ok(())
}

/// Read one 64-byte section.
///
/// An acknowledgement that does not echo byte 0 of the command is logged and
/// otherwise ignored; some firmware revisions answer with a different tag.
/// Both data lines are always requested so the device is left idle. The
/// first failing line's error is returned.
pub fn read_section(transport: &dyn MouseTransport, address: u8) -> Result<Section> {
    let cmd = CommandFrame::read(address).encode();
    trace!(
        address = format_args!("0x{:02X}", address),
        cmd_hex = format_args!("{:02X?}", cmd),
        "section read TX"
    );
    transport.send_control(&cmd)?;

    let ack = transport.read_control()?;
    check_ack(&cmd, &ack);

    let first = transport.read_data();
    let second = transport.read_data();

    let mut section = [0u8; SECTION_LEN];
    section[..DATA_LINE_LEN].copy_from_slice(&first?);
    section[DATA_LINE_LEN..].copy_from_slice(&second?);

    trace!(
        address = format_args!("0x{:02X}", address),
        data_hex = format_args!("{:02X?}", section),
        "section read RX"
    );
    Ok(section)
}

/// Compare an acknowledgement with the command it answers.
///
/// A mismatch in byte 0 is logged at warn level and never fails the transfer.
pub fn check_ack(cmd: &Frame, ack: &Frame) -> bool {
    if ack[0] == cmd[0] {
        return true;
    }
    warn!(
        cmd_hex = format_args!("{:02X?}", cmd),
        ack_hex = format_args!("{:02X?}", ack),
        "Command received unexpected ACK"
    );
    false
}

/// Write one 64-byte section.
///
/// If the first data line fails the second is not sent, leaving the section
/// on the device in an unknown state.
pub fn write_section(transport: &dyn MouseTransport, address: u8, section: &Section) -> Result<()> {
    let cmd = CommandFrame::write(address).encode();
    trace!(
        address = format_args!("0x{:02X}", address),
        cmd_hex = format_args!("{:02X?}", cmd),
        data_hex = format_args!("{:02X?}", section),
        "section write TX"
    );
    transport.send_control(&cmd)?;
    transport.send_data(&data_line(section, 0))?;
    transport.send_data(&data_line(section, 1))?;

    debug!(address = format_args!("0x{:02X}", address), "Section written");
    Ok(())
}
