use crate::Error;

use log::*;
use nom::*;

/// Magic value of the capture container when the four magic bytes are read
/// big-endian. Seen as-is it marks a big-endian source; byte-swapped it
/// marks a little-endian source.
pub const MAGIC_NUMBER: u32 = 0xa1b2c3d4;
pub const MAGIC_NUMBER_SWAPPED: u32 = 0xd4c3b2a1;

const LINKTYPE_ETHERNET: u32 = 1;
const LINKTYPE_USB: u32 = 220;

///
/// Framing of every record's first layer, taken from the `network` field of
/// the global header. Codes without a dedicated decoder are retained so
/// dispatch can fall through to a raw node instead of failing the capture.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Ethernet,
    Usb,
    Unknown(u32),
}

impl From<u32> for LinkType {
    fn from(value: u32) -> LinkType {
        match value {
            LINKTYPE_ETHERNET => LinkType::Ethernet,
            LINKTYPE_USB => LinkType::Usb,
            value => LinkType::Unknown(value),
        }
    }
}

///
/// Global header of a libpcap capture. Parsed once per input; the resolved
/// endianness and link type govern every record that follows.
///
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalHeader {
    endianness: Endianness,
    version_major: u16,
    version_minor: u16,
    zone: i32,
    sig_figs: u32,
    snap_length: u32,
    network: u32,
}

impl GlobalHeader {
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }
    pub fn version_major(&self) -> u16 {
        self.version_major
    }
    pub fn version_minor(&self) -> u16 {
        self.version_minor
    }
    /// Timezone offset from UTC in seconds. Zero in practice.
    pub fn zone(&self) -> i32 {
        self.zone
    }
    /// Timestamp accuracy field. Historically unreliable, always zero.
    pub fn sig_figs(&self) -> u32 {
        self.sig_figs
    }
    pub fn snap_length(&self) -> u32 {
        self.snap_length
    }
    /// Raw link-layer code as written in the file.
    pub fn network(&self) -> u32 {
        self.network
    }
    pub fn link_type(&self) -> LinkType {
        LinkType::from(self.network)
    }

    pub fn parse<'a>(input: &'a [u8]) -> Result<(&'a [u8], GlobalHeader), Error> {
        let (rem, magic) = be_u32(input).map_err(|_| Error::TruncatedData {
            needed: 4,
            available: input.len(),
        })?;

        let endianness = match magic {
            MAGIC_NUMBER => Endianness::Big,
            MAGIC_NUMBER_SWAPPED => Endianness::Little,
            magic => return Err(Error::InvalidSignature { magic }),
        };

        debug!("Resolved capture byte order {:?} from magic {:#010x}", endianness, magic);

        do_parse!(rem,

            version_major: u16!(endianness) >>
            version_minor: u16!(endianness) >>
            zone: i32!(endianness) >>
            sig_figs: u32!(endianness) >>
            snap_length: u32!(endianness) >>
            network: u32!(endianness) >>

            (
                GlobalHeader {
                    endianness: endianness,
                    version_major: version_major,
                    version_minor: version_minor,
                    zone: zone,
                    sig_figs: sig_figs,
                    snap_length: snap_length,
                    network: network
                }
            )
        )
        .map_err(|_| Error::TruncatedData {
            needed: 20,
            available: rem.len(),
        })
    }
}
