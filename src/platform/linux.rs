use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use crate::error::SmartError;
use crate::mmc::{DataDirection, MmcTransport, SdCommand, SECTOR_SIZE};

/// Mirror of `struct mmc_ioc_cmd` from linux/mmc/ioctl.h.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct MmcIocCmd {
    pub write_flag: i32,
    pub is_acmd: i32,
    pub opcode: u32,
    pub arg: u32,
    pub response: [u32; 4],
    pub flags: u32,
    pub blksz: u32,
    pub blocks: u32,
    pub postsleep_min_us: u32,
    pub postsleep_max_us: u32,
    pub data_timeout_ns: u32,
    pub cmd_timeout_ms: u32,
    pub pad: u32,
    pub data_ptr: u64,
}

// MMC_IOC_CMD is _IOWR(MMC_BLOCK_MAJOR, 0, struct mmc_ioc_cmd).
const MMC_BLOCK_MAJOR: u8 = 179;
nix::ioctl_readwrite!(mmc_ioc_cmd, MMC_BLOCK_MAJOR, 0, MmcIocCmd);

/// An open raw MMC block device (`/dev/mmcblk*`), usable as a command
/// transport. The device must be the whole-card node, not a partition,
/// and must be opened read/write for the passthrough ioctl to accept
/// write-direction commands.
pub struct MmcBlockDevice {
    file: File,
}

impl MmcBlockDevice {
    pub fn open(path: &Path) -> io::Result<Self> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map(|file| MmcBlockDevice { file })
    }

    pub fn from_file(file: File) -> Self {
        MmcBlockDevice { file }
    }
}

impl MmcTransport for MmcBlockDevice {
    fn issue(&mut self, cmd: &SdCommand, data: &mut [u8; SECTOR_SIZE]) -> io::Result<()> {
        let mut idata = MmcIocCmd::default();
        idata.write_flag = matches!(cmd.direction, DataDirection::Write) as i32;
        idata.opcode = cmd.opcode;
        idata.arg = cmd.arg;
        idata.flags = cmd.flags;
        idata.blksz = cmd.blksz;
        idata.blocks = cmd.blocks;
        idata.data_ptr = data.as_mut_ptr() as usize as u64;

        let fd = self.file.as_raw_fd();
        unsafe { mmc_ioc_cmd(fd, &mut idata) }
            .map(drop)
            .map_err(|e| io::Error::from_raw_os_error(e as i32))
    }
}

/// Reads the card's CID manufacturer ID from
/// `/sys/block/<dev>/device/manfid`.
pub fn read_manfid(device: &Path) -> Result<u32, SmartError> {
    let name = device
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SmartError::Parse(format!("invalid device path {}", device.display())))?;
    let attr = format!("/sys/block/{name}/device/manfid");
    let text = std::fs::read_to_string(&attr)?;
    parse_manfid(&text).ok_or_else(|| SmartError::Parse(format!("unexpected contents of {attr}")))
}

fn parse_manfid(text: &str) -> Option<u32> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).ok()
}
