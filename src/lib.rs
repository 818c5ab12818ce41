//! Offline decoder for libpcap capture files.
//!
//! A capture is a global header followed by per-packet records. Each record's
//! payload is decoded into a [`Protocol`] tree by recursive, field-driven
//! dispatch: the link type picks the first decoder, and every layer picks the
//! next one from a value it just decoded (version nibble, IP protocol number,
//! port pair), falling back to an opaque raw node when nothing matches.
//!
//! ```no_run
//! use pcap_decode::CaptureReader;
//!
//! # fn main() -> Result<(), pcap_decode::Error> {
//! let bytes = std::fs::read("capture.pcap").expect("readable file");
//! let mut reader = CaptureReader::new(&bytes)?;
//! while let Some(record) = reader.next_record()? {
//!     if let Some(tcp) = record.tcp() {
//!         println!("{} -> {} {:?}", tcp.src_port, tcp.dst_port, tcp.flag_names());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate nom;

pub mod common;
pub mod cursor;
pub mod errors;
pub mod global_header;
pub mod layer2;
pub mod layer3;
pub mod layer4;
pub mod layer7;
pub mod protocol;
pub mod record;

pub use crate::common::{MacAddress, Port};
pub use crate::cursor::ByteCursor;
pub use crate::errors::Error;
pub use crate::global_header::{GlobalHeader, LinkType};
pub use crate::protocol::Protocol;
pub use crate::record::PcapRecord;
pub use nom::Endianness;

use log::*;

///
/// Knobs threaded from the decode entry points into every cursor. `verbose`
/// turns on short-read reporting through `log`.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    pub verbose: bool,
}

///
/// Streaming reader over a capture: parses the global header once, then
/// hands out one decoded record at a time.
///
pub struct CaptureReader<'a> {
    global_header: GlobalHeader,
    input: &'a [u8],
    options: DecodeOptions,
    done: bool,
}

impl<'a> CaptureReader<'a> {
    pub fn new(input: &'a [u8]) -> Result<CaptureReader<'a>, Error> {
        CaptureReader::with_options(input, DecodeOptions::default())
    }

    pub fn with_options(
        input: &'a [u8],
        options: DecodeOptions,
    ) -> Result<CaptureReader<'a>, Error> {
        let (rem, global_header) = GlobalHeader::parse(input)?;

        debug!(
            "Capture version {}.{}, {:?} endian, link type {:?}",
            global_header.version_major(),
            global_header.version_minor(),
            global_header.endianness(),
            global_header.link_type()
        );

        Ok(CaptureReader {
            global_header,
            input: rem,
            options,
            done: false,
        })
    }

    pub fn global_header(&self) -> &GlobalHeader {
        &self.global_header
    }

    /// The next record, or `None` once the capture is exhausted. After an
    /// error the reader is fused and keeps returning `None`.
    pub fn next_record(&mut self) -> Result<Option<PcapRecord>, Error> {
        if self.done {
            return Ok(None);
        }
        match PcapRecord::parse(
            self.input,
            self.global_header.endianness(),
            self.global_header.link_type(),
            self.options,
        ) {
            Ok((rem, record)) => {
                self.input = rem;
                Ok(Some(record))
            }
            Err(Error::EndOfCapture) => {
                self.done = true;
                Ok(None)
            }
            Err(e) => {
                self.done = true;
                Err(e)
            }
        }
    }
}

impl<'a> Iterator for CaptureReader<'a> {
    type Item = Result<PcapRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

///
/// A fully decoded capture.
///
#[derive(Debug)]
pub struct CaptureFile {
    pub global_header: GlobalHeader,
    pub records: Vec<PcapRecord>,
}

impl CaptureFile {
    ///
    /// Parse a byte slice holding a whole libpcap file
    /// (https://wiki.wireshark.org/Development/LibpcapFileFormat).
    ///
    /// A record header cut off by the end of the input ends the loop
    /// gracefully; the records decoded up to that point are kept.
    ///
    pub fn parse(input: &[u8]) -> Result<CaptureFile, Error> {
        CaptureFile::parse_with(input, DecodeOptions::default())
    }

    pub fn parse_with(input: &[u8], options: DecodeOptions) -> Result<CaptureFile, Error> {
        let mut reader = CaptureReader::with_options(input, options)?;
        let mut records = Vec::new();

        loop {
            match reader.next_record() {
                Ok(Some(record)) => records.push(record),
                Ok(None) => break,
                Err(e @ Error::TruncatedRecord { .. }) => {
                    warn!("Stopping record loop: {}", e);
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        trace!("Decoded {} records", records.len());

        Ok(CaptureFile {
            global_header: reader.global_header,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture_bytes() -> Vec<u8> {
        let mut raw = vec![
            0xa1u8, 0xb2, 0xc3, 0xd4, //magic number
            0x00, 0x02, //version major, 2
            0x00, 0x04, //version minor, 4
            0x00, 0x00, 0x00, 0x00, //zone
            0x00, 0x00, 0x00, 0x00, //sig figs
            0x00, 0x00, 0xFF, 0xFF, //snap length
            0x00, 0x00, 0x00, 0x93, //network, 147, no decoder
        ];
        raw.extend_from_slice(&[
            0x5B, 0x11, 0x6D, 0xE3, //seconds
            0x00, 0x02, 0x51, 0xF5, //microseconds
            0x00, 0x00, 0x00, 0x03, //captured length, 3
            0x00, 0x00, 0x00, 0x03, //original length, 3
            0x01, 0x02, 0x03, //payload
        ]);
        raw.extend_from_slice(&[
            0x5B, 0x11, 0x6D, 0xE4, //seconds
            0x00, 0x00, 0x00, 0x00, //microseconds
            0x00, 0x00, 0x00, 0x01, //captured length, 1
            0x00, 0x00, 0x00, 0x01, //original length, 1
            0xFF, //payload
        ]);
        raw
    }

    #[test]
    fn read_records_one_at_a_time() {
        let _ = env_logger::try_init();

        let raw = capture_bytes();
        let mut reader = CaptureReader::new(&raw).expect("Failed to parse header");

        assert_eq!(reader.global_header().link_type(), LinkType::Unknown(147));

        let first = reader.next_record().unwrap().expect("First record");
        assert_eq!(*first.packet(), Protocol::Raw(vec![0x01, 0x02, 0x03]));

        let second = reader.next_record().unwrap().expect("Second record");
        assert_eq!(*second.packet(), Protocol::Raw(vec![0xFF]));

        assert!(reader.next_record().unwrap().is_none());
        //fused
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn parse_whole_file() {
        let _ = env_logger::try_init();

        let raw = capture_bytes();
        let capture = CaptureFile::parse(&raw).expect("Failed to parse");

        assert_eq!(capture.records.len(), 2);
        assert_eq!(capture.global_header.endianness(), Endianness::Big);
    }

    #[test]
    fn iterator_surface() {
        let raw = capture_bytes();
        let reader = CaptureReader::new(&raw).expect("Failed to parse header");

        let records: Result<Vec<_>, _> = reader.collect();

        assert_eq!(records.expect("All records decode").len(), 2);
    }

    #[test]
    fn partial_trailing_header_stops_gracefully() {
        let _ = env_logger::try_init();

        let mut raw = capture_bytes();
        raw.extend_from_slice(&[0x00, 0x01, 0x02]); //3 stray bytes, not a record header

        let capture = CaptureFile::parse(&raw).expect("Failed to parse");

        assert_eq!(capture.records.len(), 2);
    }

    #[test]
    fn invalid_signature_is_fatal() {
        let raw = vec![0u8; 24];

        assert!(CaptureReader::new(&raw).is_err());
        assert!(CaptureFile::parse(&raw).is_err());
    }
}
