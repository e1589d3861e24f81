use std::io::ErrorKind;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sdsmart_rs::error::SmartError;
use sdsmart_rs::{read_manfid, read_smart, MmcBlockDevice, Vendor};

const LONG_ABOUT: &str = "\
Get raw SMART-information from an industrial microSD-/SD-card.

On success the SMART sector is printed to stdout as the vendor tag and
1024 hex characters, e.g. `A-1234...`; all diagnostics go to stderr.

Note that this does not work with USB-cardreaders.
Supported cards:
    - Apacer CV110-MSD / AK6.112*
    - Apacer CH110-MSD / AK6.118*
    - Apacer H1-M  / AP-*-1HTM
    - Apacer H2-M  / AP-*-1RTM
    - Apacer H1-SL / AP-*-2HTM
    - Apacer H2-SL / AP-*-2RTM
    - Transcend 230I
    - Transcend 240I";

#[derive(Debug, Parser)]
#[command(name = "sdsmart-get")]
#[command(about = "Get raw SMART-information from an industrial microSD-/SD-card")]
#[command(long_about = LONG_ABOUT)]
struct Args {
    /// Raw MMC block device, e.g. /dev/mmcblk0.
    device: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err)
            if err.kind() == ClapErrorKind::DisplayHelp
                || err.kind() == ClapErrorKind::DisplayVersion =>
        {
            let _ = err.print();
            return;
        }
        Err(err) => {
            let _ = err.print();
            exit(-1);
        }
    };

    exit(run(&args.device));
}

fn run(device: &Path) -> i32 {
    // Keep the device allowlist tight: the binary is meant to be
    // installable SUID, and MMC_IOC_CMD only exists on mmcblk nodes
    // anyway.
    if !is_allowed_device(device) {
        eprintln!("ERROR: Only devices /dev/mmcblk* allowed.");
        return -1;
    }
    if let Ok(meta) = std::fs::metadata(device) {
        if !meta.file_type().is_block_device() {
            eprintln!(
                "ERROR: Invalid device '{}', must be a block-device.",
                device.display()
            );
            return libc::ENOTBLK;
        }
    }

    let manfid = match read_manfid(device) {
        Ok(manfid) => manfid,
        Err(err) => return report(device, &err),
    };
    debug!("card manufacturer id {manfid:#x}");

    let Some(vendor) = Vendor::from_manfid(manfid) else {
        return report(device, &SmartError::UnsupportedVendor { manfid });
    };
    debug!(?vendor, "selected vendor profile");

    let mut dev = match MmcBlockDevice::open(device) {
        Ok(dev) => dev,
        Err(err) => return report(device, &SmartError::Io(err)),
    };

    match read_smart(&mut dev, vendor) {
        Ok(sector) => {
            println!("{}-{}", vendor.tag(), sector.to_hex());
            0
        }
        Err(err) => report(device, &err),
    }
}

fn is_allowed_device(device: &Path) -> bool {
    let Some(path) = device.to_str() else {
        return false;
    };
    path.strip_prefix("/dev/mmcblk")
        .is_some_and(|rest| !rest.contains('/'))
}

fn report(device: &Path, err: &SmartError) -> i32 {
    match err {
        SmartError::UnsupportedVendor { manfid } => {
            eprintln!("ERROR: Device not supported. (manfid {manfid:#x})");
            libc::ENOTSUP
        }
        SmartError::NoSmartData => {
            eprintln!("ERROR: Device not supported. (ff..ff)");
            libc::ENOTSUP
        }
        SmartError::Parse(msg) => {
            eprintln!("ERROR: {msg}.");
            libc::ENOTSUP
        }
        SmartError::Transport(io) => {
            eprintln!("ERROR: Failed. ({io})");
            io.raw_os_error().unwrap_or(libc::EIO)
        }
        SmartError::Io(io) => {
            match io.kind() {
                ErrorKind::NotFound => {
                    eprintln!("ERROR: Device '{}' does not exist.", device.display());
                }
                ErrorKind::PermissionDenied => {
                    eprintln!("ERROR: Permission denied for '{}'.", device.display());
                }
                _ => {
                    eprintln!("ERROR: {io} for '{}'.", device.display());
                }
            }
            io.raw_os_error().unwrap_or(libc::EIO)
        }
    }
}
