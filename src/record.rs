use crate::cursor::ByteCursor;
use crate::global_header::LinkType;
use crate::layer2::usb::Usb;
use crate::layer3::ipv4::IPv4;
use crate::layer3::ipv6::IPv6;
use crate::layer4::icmp::Icmp;
use crate::layer4::tcp::Tcp;
use crate::layer4::udp::Udp;
use crate::layer7::bootp::Bootp;
use crate::protocol::{self, Protocol};
use crate::{DecodeOptions, Error};

use log::*;
use nom::*;

const HEADER_LENGTH: usize = 16;

///
/// One captured record: its header fields and the protocol tree decoded
/// from its payload bytes.
///
#[derive(Debug, Clone, PartialEq)]
pub struct PcapRecord {
    timestamp: f64,
    captured_length: u32,
    original_length: u32,
    packet: Protocol,
}

impl PcapRecord {
    /// Capture time in seconds since the epoch, microsecond fraction folded in.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }
    /// Bytes of the packet present in the capture, possibly fewer than on the wire.
    pub fn captured_length(&self) -> u32 {
        self.captured_length
    }
    /// Length of the packet as it was on the wire.
    pub fn original_length(&self) -> u32 {
        self.original_length
    }
    /// Root of the decoded tree.
    pub fn packet(&self) -> &Protocol {
        &self.packet
    }

    pub fn ip(&self) -> Option<&Protocol> {
        self.packet.ip()
    }
    pub fn ipv4(&self) -> Option<&IPv4> {
        self.packet.ipv4()
    }
    pub fn ipv6(&self) -> Option<&IPv6> {
        self.packet.ipv6()
    }
    pub fn tcp(&self) -> Option<&Tcp> {
        self.packet.tcp()
    }
    pub fn udp(&self) -> Option<&Udp> {
        self.packet.udp()
    }
    pub fn icmp(&self) -> Option<&Icmp> {
        self.packet.icmp()
    }
    pub fn bootp(&self) -> Option<&Bootp> {
        self.packet.bootp()
    }
    pub fn usb(&self) -> Option<&Usb> {
        self.packet.usb()
    }

    pub(crate) fn combine_packet_time(ts_seconds: u32, ts_microseconds: u32) -> f64 {
        f64::from(ts_seconds) + f64::from(ts_microseconds) / 1_000_000.0
    }

    ///
    /// Parse one record header and decode the payload bytes that follow it.
    /// An empty input is the normal end of the capture; a partial header is
    /// a truncated record; a payload cut short by the end of the stream is
    /// decoded over the bytes that are actually there.
    ///
    pub fn parse<'a>(
        input: &'a [u8],
        endianness: Endianness,
        link_type: LinkType,
        options: DecodeOptions,
    ) -> Result<(&'a [u8], PcapRecord), Error> {
        if input.is_empty() {
            return Err(Error::EndOfCapture);
        }

        let (rem, (ts_seconds, ts_microseconds, captured_length, original_length)) = do_parse!(
            input,
            ts_seconds: u32!(endianness)
                >> ts_microseconds: u32!(endianness)
                >> captured_length: u32!(endianness)
                >> original_length: u32!(endianness)
                >> ((ts_seconds, ts_microseconds, captured_length, original_length))
        )
        .map_err(|_| Error::TruncatedRecord {
            needed: HEADER_LENGTH,
            available: input.len(),
        })?;

        let declared = captured_length as usize;
        let take = std::cmp::min(declared, rem.len());
        if take < declared {
            warn!("Record payload truncated, {} of {} bytes present", take, declared);
        }
        let payload = &rem[..take];

        //the usbmon pseudo-header is little-endian no matter how the
        //capture itself was written
        let payload_endianness = match link_type {
            LinkType::Usb => Endianness::Little,
            _ => endianness,
        };

        let mut cursor = ByteCursor::new(payload, payload_endianness).verbose(options.verbose);
        let packet = protocol::decode_link(link_type, &mut cursor);

        Ok((
            &rem[take..],
            PcapRecord {
                timestamp: PcapRecord::combine_packet_time(ts_seconds, ts_microseconds),
                captured_length,
                original_length,
                packet,
            },
        ))
    }
}

impl std::fmt::Display for PcapRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Timestamp={:.6}   Length={}   Original Length={}",
            self.timestamp, self.captured_length, self.original_length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_DATA: &'static [u8] = &[
        0x5Bu8, 0x11u8, 0x6Du8, 0xE3u8, //seconds, 1527868899
        0x00u8, 0x02u8, 0x51u8, 0xF5u8, //microseconds, 152053
        0x00u8, 0x00u8, 0x00u8, 0x04u8, //captured length, 4
        0x00u8, 0x00u8, 0x04u8, 0xD0u8, //original length, 1232
        0x0Au8, 0x0Bu8, 0x0Cu8, 0x0Du8, //payload
    ];

    #[test]
    fn parse_record() {
        let _ = env_logger::try_init();

        let (rem, record) = PcapRecord::parse(
            RAW_DATA,
            Endianness::Big,
            LinkType::Unknown(147),
            DecodeOptions::default(),
        )
        .expect("Could not parse");

        assert!(rem.is_empty());
        assert_eq!(record.captured_length(), 4);
        assert_eq!(record.original_length(), 1232);
        assert_eq!(
            record.timestamp(),
            PcapRecord::combine_packet_time(1527868899, 152053)
        );
        assert_eq!(*record.packet(), Protocol::Raw(vec![0x0A, 0x0B, 0x0C, 0x0D]));
    }

    #[test]
    fn combine_timestamp() {
        let ts = PcapRecord::combine_packet_time(1527868899, 152053);

        assert!((ts - 1527868899.152053).abs() < 1e-6);
    }

    #[test]
    fn empty_input_is_end_of_capture() {
        let result = PcapRecord::parse(
            &[],
            Endianness::Big,
            LinkType::Ethernet,
            DecodeOptions::default(),
        );

        match result {
            Err(Error::EndOfCapture) => (),
            other => panic!("Expected EndOfCapture, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn partial_header_is_truncated_record() {
        let result = PcapRecord::parse(
            &RAW_DATA[..10],
            Endianness::Big,
            LinkType::Ethernet,
            DecodeOptions::default(),
        );

        match result {
            Err(Error::TruncatedRecord { needed, available }) => {
                assert_eq!(needed, 16);
                assert_eq!(available, 10);
            }
            other => panic!("Expected TruncatedRecord, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn payload_cut_short_still_yields_a_record() {
        let _ = env_logger::try_init();

        let mut raw = RAW_DATA.to_vec();
        raw[11] = 0x40; //declare 64 bytes captured, only 4 present

        let (rem, record) = PcapRecord::parse(
            &raw,
            Endianness::Big,
            LinkType::Unknown(147),
            DecodeOptions::default(),
        )
        .expect("Could not parse");

        assert!(rem.is_empty());
        assert_eq!(record.captured_length(), 64);
        assert_eq!(*record.packet(), Protocol::Raw(vec![0x0A, 0x0B, 0x0C, 0x0D]));
    }

    #[test]
    fn zero_length_record() {
        let raw = &RAW_DATA[..16];
        let mut raw = raw.to_vec();
        raw[11] = 0x00;

        let (rem, record) = PcapRecord::parse(
            &raw,
            Endianness::Big,
            LinkType::Ethernet,
            DecodeOptions::default(),
        )
        .expect("Could not parse");

        assert!(rem.is_empty());
        assert_eq!(*record.packet(), Protocol::Raw(vec![]));
    }

    #[test]
    fn little_endian_record_header() {
        let raw = [
            0xE3u8, 0x6D, 0x11, 0x5B, //seconds
            0xF5, 0x51, 0x02, 0x00, //microseconds
            0x02, 0x00, 0x00, 0x00, //captured length, 2
            0xD0, 0x04, 0x00, 0x00, //original length
            0xAA, 0xBB, //payload
        ];

        let (rem, record) = PcapRecord::parse(
            &raw,
            Endianness::Little,
            LinkType::Unknown(147),
            DecodeOptions::default(),
        )
        .expect("Could not parse");

        assert!(rem.is_empty());
        assert_eq!(record.captured_length(), 2);
        assert_eq!(*record.packet(), Protocol::Raw(vec![0xAA, 0xBB]));
    }
}
