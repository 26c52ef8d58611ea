//! hidapi-backed transport.
//!
//! Command frames travel as feature reports on the vendor interface; data
//! lines use the interrupt endpoints. hidapi expects a leading report ID
//! byte, which is always 0 for this device.

use hidapi::{HidApi, HidDevice};
use mx3100_core::error::{Error, Result};
use mx3100_core::protocol::{DataLine, Frame, CMD_MSG_LEN, DATA_LINE_LEN};
use mx3100_core::transport::MouseTransport;
use tracing::{debug, info};

/// Timeout for one data line read, in milliseconds.
const READ_TIMEOUT_MS: i32 = 1000;

/// An open MX-3100. The handle is released when this is dropped.
pub struct UsbMouse {
    device: HidDevice,
}

impl UsbMouse {
    /// Open the first HID interface matching the given ids.
    pub fn open(vid: u16, pid: u16, interface: i32) -> Result<Self> {
        let api = HidApi::new().map_err(|e| Error::Transport(format!("hidapi init: {e}")))?;

        let info = api
            .device_list()
            .find(|d| {
                d.vendor_id() == vid && d.product_id() == pid && d.interface_number() == interface
            })
            .ok_or_else(|| {
                Error::DeviceNotFound(format!(
                    "no HID interface {interface} for VID=0x{vid:04X} PID=0x{pid:04X}"
                ))
            })?;

        let device = info.open_device(&api).map_err(|e| {
            Error::Transport(format!(
                "open HID device (VID=0x{vid:04X} PID=0x{pid:04X}): {e}"
            ))
        })?;

        info!(
            vid = format_args!("0x{:04X}", vid),
            pid = format_args!("0x{:04X}", pid),
            interface,
            path = %info.path().to_string_lossy(),
            "Opened MX-3100"
        );
        Ok(Self { device })
    }
}

impl MouseTransport for UsbMouse {
    fn send_control(&self, frame: &Frame) -> Result<()> {
        let mut report = [0u8; CMD_MSG_LEN + 1];
        report[1..].copy_from_slice(frame);
        self.device
            .send_feature_report(&report)
            .map_err(|e| Error::Transport(format!("send_control: {e}")))
    }

    fn read_control(&self) -> Result<Frame> {
        let mut report = [0u8; CMD_MSG_LEN + 1];
        let n = self
            .device
            .get_feature_report(&mut report)
            .map_err(|e| Error::Transport(format!("read_control: {e}")))?;
        if n < CMD_MSG_LEN {
            return Err(Error::Transport(format!(
                "read_control: short report ({n} bytes)"
            )));
        }

        // Some backends include the report ID in the count, some do not.
        let mut frame = [0u8; CMD_MSG_LEN];
        frame.copy_from_slice(&report[n - CMD_MSG_LEN..n]);
        Ok(frame)
    }

    fn send_data(&self, line: &DataLine) -> Result<()> {
        let mut report = [0u8; DATA_LINE_LEN + 1];
        report[1..].copy_from_slice(line);
        let n = self
            .device
            .write(&report)
            .map_err(|e| Error::Transport(format!("send_data: {e}")))?;
        if n < DATA_LINE_LEN {
            return Err(Error::Transport(format!(
                "send_data: short write ({n} bytes)"
            )));
        }
        Ok(())
    }

    fn read_data(&self) -> Result<DataLine> {
        let mut line = [0u8; DATA_LINE_LEN];
        let n = self
            .device
            .read_timeout(&mut line, READ_TIMEOUT_MS)
            .map_err(|e| Error::Transport(format!("read_data: {e}")))?;
        match n {
            0 => Err(Error::Transport(format!(
                "read_data: timed out after {READ_TIMEOUT_MS}ms"
            ))),
            DATA_LINE_LEN => Ok(line),
            short => {
                debug!(bytes = short, "short data line");
                Err(Error::Transport(format!(
                    "read_data: short read ({short} bytes)"
                )))
            }
        }
    }
}
