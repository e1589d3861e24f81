//! Per-vendor SMART command profiles.
//!
//! Each supported card family answers CMD56 with a 512-byte SMART
//! sector, but the argument values (and for Apacer, a preceding
//! write-direction "pre-load" command) differ. A profile is a fixed
//! table of command specs executed in order against one shared sector
//! buffer.

use crate::mmc::{DataDirection, SdCommand};

/// A supported card family, selected from the card's CID manufacturer
/// ID. Adding a family means adding a variant and its command table;
/// the dispatch below is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Apacer,
    Transcend,
}

/// Direction and argument of one profile step. Opcode, flags and block
/// geometry are the same for every step and filled in by
/// [`SdCommand::gen_cmd`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct CmdSpec {
    pub direction: DataDirection,
    pub arg: u32,
}

impl CmdSpec {
    pub(crate) fn to_command(self) -> SdCommand {
        SdCommand::gen_cmd(self.direction, self.arg)
    }
}

// "Pre-Load SMART Command Information" followed by "Get SMART Command
// Information".
const APACER_SEQUENCE: &[CmdSpec] = &[
    CmdSpec { direction: DataDirection::Write, arg: 0x10 },
    CmdSpec { direction: DataDirection::Read, arg: 0x21 },
];

const TRANSCEND_SEQUENCE: &[CmdSpec] = &[CmdSpec {
    direction: DataDirection::Read,
    arg: 0x1100_05F9,
}];

impl Vendor {
    /// Maps a CID manufacturer ID (the `manfid` sysfs attribute) to a
    /// known card family.
    pub fn from_manfid(manfid: u32) -> Option<Vendor> {
        match manfid {
            0x27 => Some(Vendor::Apacer),
            0x74 => Some(Vendor::Transcend),
            _ => None,
        }
    }

    /// Single-letter tag used in the tool's output format.
    pub fn tag(self) -> char {
        match self {
            Vendor::Apacer => 'A',
            Vendor::Transcend => 'T',
        }
    }

    pub(crate) fn command_sequence(self) -> &'static [CmdSpec] {
        match self {
            Vendor::Apacer => APACER_SEQUENCE,
            Vendor::Transcend => TRANSCEND_SEQUENCE,
        }
    }
}
