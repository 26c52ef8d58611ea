//! Whole-memory operations: dump, restore, and factory reset.
//!
//! A memory image is the concatenation of every section in a fixed order:
//! configs, buttons, then macro sections 0..NUM_MACROS. There is no header,
//! checksum, or version tag, so images from earlier dumps restore as-is.

use crate::error::{Error, Result};
use crate::protocol::{image_addresses, Section, FULL_MEMORY_LEN, SECTION_LEN};
use crate::section::{read_section, write_section};
use crate::transport::MouseTransport;
use tracing::info;

/// Factory contents of the configs section.
///
/// Seven DPI profiles enabled at 400/800/1200/1600/2400/3200/4800 DPI with
/// red, green, blue, yellow, magenta, cyan, and white indicators; standard
/// LED mode at full brightness; no angle snap or correction; sensitivity 5.
pub const FACTORY_CONFIG: Section = [
    0x00, 0x00, 0x7F, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x03, 0x07, 0x0B, 0x0F, //
    0x17, 0x1F, 0x2F, 0x00, 0x03, 0x07, 0x0B, 0x0F, //
    0x17, 0x1F, 0x2F, 0x00, 0xFF, 0x00, 0x00, 0x00, //
    0xFF, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x00, //
    0xFF, 0x00, 0xFF, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, //
    0xFF, 0x00, 0x01, 0x0A, 0x00, 0x00, 0x00, 0x00, //
    0x32, 0x32, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

/// Factory contents of the buttons section: four bytes per button
/// (kind, code, two reserved), left, right, middle, back, forward,
/// DPI up, DPI down, DPI cycle.
pub const FACTORY_BUTTONS: Section = [
    0x01, 0x01, 0x00, 0x00, 0x01, 0x02, 0x00, 0x00, //
    0x01, 0x04, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, //
    0x01, 0x10, 0x00, 0x00, 0x02, 0x01, 0x00, 0x00, //
    0x02, 0x02, 0x00, 0x00, 0x02, 0x03, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

/// The image written by a factory reset: default settings, empty macros.
pub fn factory_image() -> Vec<u8> {
    let mut image = vec![0u8; FULL_MEMORY_LEN];
    image[..SECTION_LEN].copy_from_slice(&FACTORY_CONFIG);
    image[SECTION_LEN..2 * SECTION_LEN].copy_from_slice(&FACTORY_BUTTONS);
    image
}

/// Read every section into one image.
pub fn dump(transport: &dyn MouseTransport) -> Result<Vec<u8>> {
    let mut image = Vec::with_capacity(FULL_MEMORY_LEN);
    for address in image_addresses() {
        image.extend_from_slice(&read_section(transport, address)?);
    }
    info!(bytes = image.len(), "Memory dump complete");
    Ok(image)
}

/// Reject anything that is not exactly one full memory image.
pub fn check_image(image: &[u8]) -> Result<()> {
    if image.len() != FULL_MEMORY_LEN {
        return Err(Error::ImageSize {
            actual: image.len(),
            expected: FULL_MEMORY_LEN,
        });
    }
    Ok(())
}

/// Write a full image back, section by section, in image order.
///
/// The image size is checked before anything is sent. A transport error
/// stops the restore; sections already written keep their new contents.
pub fn write_full_memory(transport: &dyn MouseTransport, image: &[u8]) -> Result<()> {
    check_image(image)?;

    for (address, chunk) in image_addresses().zip(image.chunks_exact(SECTION_LEN)) {
        let mut section = [0u8; SECTION_LEN];
        section.copy_from_slice(chunk);
        write_section(transport, address, &section)?;
    }
    info!(bytes = image.len(), "Memory image written");
    Ok(())
}

/// Restore factory settings and clear all macros.
pub fn factory_reset(transport: &dyn MouseTransport) -> Result<()> {
    write_full_memory(transport, &factory_image())
}
