//! # sdsmart-rs
//! A library (and the `sdsmart-get` tool) for reading the vendor SMART
//! sector of industrial SD-/microSD-cards over the Linux MMC
//! passthrough ioctl, without relying on external tools.
//!
//! ## Current Scope
//! *   **Apacer** industrial cards (manfid 0x27): CMD56 pre-load +
//!     fetch sequence.
//! *   **Transcend** industrial cards (manfid 0x74): single CMD56
//!     fetch.
//!
//! The 512-byte sector is returned raw; decoding the per-vendor record
//! layout is left to a separate parser. Works against `/dev/mmcblk*`
//! on a real MMC host controller; USB card readers do not pass CMD56
//! through.

pub mod error;
mod mmc;
mod platform;
mod vendor;

use error::SmartError;

pub use mmc::{DataDirection, MmcTransport, SdCommand, SECTOR_SIZE, SD_GEN_CMD};
#[cfg(target_os = "linux")]
pub use platform::{read_manfid, MmcBlockDevice, MmcIocCmd};
pub use vendor::Vendor;

// Cards that accept the vendor command without actually implementing
// SMART answer with a sector of 0xff bytes. Only the first 500 bytes
// take part in the check; the tail of the sector is not specified.
const SENTINEL_SCAN_LEN: usize = 500;

/// A raw 512-byte SMART sector as returned by the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartSector([u8; SECTOR_SIZE]);

impl SmartSector {
    pub fn as_bytes(&self) -> &[u8; SECTOR_SIZE] {
        &self.0
    }

    /// The sector as 1024 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl AsRef<[u8]> for SmartSector {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Executes `vendor`'s SMART command sequence over `transport` and
/// returns the resulting sector.
///
/// The sequence runs against a single zero-initialized sector buffer;
/// the first transport failure aborts the remaining commands. A
/// sequence that succeeds at the transport level but leaves the buffer
/// all-0xff is reported as [`SmartError::NoSmartData`], since that is
/// how cards signal an unimplemented vendor command.
///
/// # Permissions
/// With the real [`MmcBlockDevice`] transport this issues privileged
/// ioctls and requires access to the raw block device (root or SUID).
pub fn read_smart<T: MmcTransport>(
    transport: &mut T,
    vendor: Vendor,
) -> Result<SmartSector, SmartError> {
    let mut sector = [0u8; SECTOR_SIZE];
    for spec in vendor.command_sequence() {
        let cmd = spec.to_command();
        transport
            .issue(&cmd, &mut sector)
            .map_err(SmartError::Transport)?;
    }
    if sector[..SENTINEL_SCAN_LEN].iter().all(|&b| b == 0xff) {
        return Err(SmartError::NoSmartData);
    }
    Ok(SmartSector(sector))
}

/// Like [`read_smart`], but resolves the vendor profile from a CID
/// manufacturer ID first. An unknown ID fails with
/// [`SmartError::UnsupportedVendor`] before any command is issued.
pub fn read_smart_by_manfid<T: MmcTransport>(
    transport: &mut T,
    manfid: u32,
) -> Result<SmartSector, SmartError> {
    let vendor = Vendor::from_manfid(manfid).ok_or(SmartError::UnsupportedVendor { manfid })?;
    read_smart(transport, vendor)
}
