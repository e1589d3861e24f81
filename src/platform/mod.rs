#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::{read_manfid, MmcBlockDevice, MmcIocCmd};
