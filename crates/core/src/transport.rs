//! USB transport abstraction for device communication.
//!
//! The MX-3100 speaks over two channels: 8-byte control messages that carry
//! command frames and acknowledgements, and 32-byte data lines that carry
//! section contents. Real devices and the simulated device share this trait.

use crate::error::Result;
use crate::protocol::{DataLine, Frame};

/// The four blocking primitives the protocol is built on.
///
/// Exactly one transaction is in flight at a time; callers must issue the
/// primitives in protocol order.
pub trait MouseTransport: Send {
    /// Send a command frame as a control message.
    fn send_control(&self, frame: &Frame) -> Result<()>;

    /// Read the 8-byte acknowledgement of the last command frame.
    fn read_control(&self) -> Result<Frame>;

    /// Send one data line.
    fn send_data(&self, line: &DataLine) -> Result<()>;

    /// Read one data line.
    fn read_data(&self) -> Result<DataLine>;
}
