//! MX-3100 command framing.
//!
//! Device memory is organised in 64-byte sections. Every section transfer is
//! announced by an 8-byte command frame sent as a control message, followed by
//! two 32-byte data lines on the data endpoint.
//!
//! Command frame layout:
//!   - byte 0: address parity tag, OR'd with [`ADDR_READ`] for reads
//!   - byte 1: macro parity tag (macro sections only)
//!   - byte 2: section length (writes only)
//!   - byte 7: target address
//!
//! The tags are chosen so that the eight frame bytes sum to 0xFF. They detect
//! nothing beyond a framing mistake and must be rebuilt for every address and
//! direction.

/// Length of a command frame.
pub const CMD_MSG_LEN: usize = 8;
/// Length of one data-phase transfer.
pub const DATA_LINE_LEN: usize = 32;
/// Length of an addressable memory section.
pub const SECTION_LEN: usize = 64;

/// Raw command frame.
pub type Frame = [u8; CMD_MSG_LEN];
/// Raw data line (half a section).
pub type DataLine = [u8; DATA_LINE_LEN];
/// Raw memory section.
pub type Section = [u8; SECTION_LEN];

/// Flag OR'd into byte 0 of read frames.
pub const ADDR_READ: u8 = 0x40;

/// Reserved section addresses and parity constants.
pub mod addr {
    /// Section holding DPI, LED, angle and sensitivity settings.
    pub const CONFIGS: u8 = 0x00;
    /// Section holding button assignments.
    pub const BUTTONS: u8 = 0x01;
    /// Highest settings address.
    pub const SETTINGS_MAX: u8 = 0x01;
    /// Parity offset for settings addresses.
    pub const SETTINGS_PARITY: u8 = 0xBE;
    /// Byte 0 marker for macro memory.
    pub const MACRO_MEM_FLAG: u8 = 0x80;
    /// Parity base for macro addresses, carried in byte 1.
    pub const MACRO_PARITY: u8 = 0x3F;
    /// Address of macro section 0; later sections count downwards.
    pub const MACRO_START: u8 = 0x7F;
}

/// Number of macro sections in device memory.
pub const NUM_MACROS: usize = 16;

/// Size of a full memory image: configs, buttons, then every macro section.
pub const FULL_MEMORY_LEN: usize = (2 + NUM_MACROS) * SECTION_LEN;

/// Initialisation frames sent once after opening the device.
pub const STARTUP_FRAMES: [Frame; 2] = [
    [0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFD],
    // byte 2 is believed to be the poll rate
    [0x03, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0xFA],
];

/// Which parity formula an address uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// Configs or buttons section.
    Settings,
    /// Any other address is treated as macro memory.
    Macro,
}

impl AddressKind {
    /// Classify a section address.
    pub fn of(address: u8) -> Self {
        if address == addr::CONFIGS || address == addr::BUTTONS {
            Self::Settings
        } else {
            Self::Macro
        }
    }
}

/// Transfer direction of a section command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// A section read or write command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    pub direction: Direction,
    pub address: u8,
}

impl CommandFrame {
    pub fn read(address: u8) -> Self {
        Self {
            direction: Direction::Read,
            address,
        }
    }

    pub fn write(address: u8) -> Self {
        Self {
            direction: Direction::Write,
            address,
        }
    }

    /// Encode into the 8-byte control message.
    pub fn encode(&self) -> Frame {
        let mut frame = [0u8; CMD_MSG_LEN];
        frame[7] = self.address;

        match AddressKind::of(self.address) {
            AddressKind::Settings => {
                frame[0] = addr::SETTINGS_MAX
                    .wrapping_sub(self.address)
                    .wrapping_add(addr::SETTINGS_PARITY);
            }
            AddressKind::Macro => {
                frame[0] = addr::MACRO_MEM_FLAG;
                frame[1] = addr::MACRO_PARITY.wrapping_sub(self.address);
            }
        }

        match self.direction {
            Direction::Read => frame[0] |= ADDR_READ,
            Direction::Write => frame[2] = SECTION_LEN as u8,
        }
        frame
    }
}

/// Address of macro section `index` (0-based).
pub fn macro_address(index: usize) -> u8 {
    debug_assert!(index < NUM_MACROS);
    addr::MACRO_START.wrapping_sub(index as u8)
}

/// Section addresses in memory-image order: configs, buttons, macros.
pub fn image_addresses() -> impl Iterator<Item = u8> {
    [addr::CONFIGS, addr::BUTTONS]
        .into_iter()
        .chain((0..NUM_MACROS).map(macro_address))
}

/// Wrapping sum of all frame bytes; 0xFF for every well-formed frame.
pub fn frame_sum(frame: &Frame) -> u8 {
    frame.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Copy half `index` (0 or 1) of a section into a data line.
pub fn data_line(section: &Section, index: usize) -> DataLine {
    let mut line = [0u8; DATA_LINE_LEN];
    let start = index * DATA_LINE_LEN;
    line.copy_from_slice(&section[start..start + DATA_LINE_LEN]);
    line
}
