use crate::cursor::ByteCursor;
use crate::layer3::read_ipv4_address;
use crate::protocol::{self, Protocol};
use crate::Error;

use log::*;

///
/// IPv4 header plus its dispatched payload. The header checksum is decoded
/// but never verified, and a total length that disagrees with the bytes
/// actually captured yields a best-effort, possibly empty payload.
///
#[derive(Debug, Clone, PartialEq)]
pub struct IPv4 {
    pub version: u8,
    /// Header length in bytes, already scaled from the word count.
    pub header_length: usize,
    pub tos: u8,
    pub total_length: u16,
    pub id: u16,
    pub flags: u8,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub src_ip: std::net::Ipv4Addr,
    pub dst_ip: std::net::Ipv4Addr,
    pub options: Vec<u8>,
    pub payload: Box<Protocol>,
}

impl IPv4 {
    pub fn parse(cursor: &mut ByteCursor) -> Result<IPv4, Error> {
        trace!("Available={}", cursor.remaining());

        let b = cursor.read_u8()?;
        let version = b >> 4;
        let header_length = ((b & 0x0F) as usize) * 4;

        let tos = cursor.read_u8()?;
        let total_length = cursor.read_u16()?;
        let id = cursor.read_u16()?;

        let frag = cursor.read_u16()?;
        let flags = (frag >> 13) as u8;
        let fragment_offset = frag & 0x1FFF;

        let ttl = cursor.read_u8()?;
        let protocol = cursor.read_u8()?;
        let checksum = cursor.read_u16()?;
        let src_ip = read_ipv4_address(cursor)?;
        let dst_ip = read_ipv4_address(cursor)?;

        let options = cursor
            .read(header_length.saturating_sub(cursor.position()))
            .to_vec();

        let payload_length = (total_length as usize).saturating_sub(cursor.position());
        let mut payload_cursor = cursor.sub_cursor(payload_length);
        let payload = protocol::decode_transport(protocol, &mut payload_cursor);

        Ok(IPv4 {
            version,
            header_length,
            tos,
            total_length,
            id,
            flags,
            fragment_offset,
            ttl,
            protocol,
            checksum,
            src_ip,
            dst_ip,
            options,
            payload: Box::new(payload),
        })
    }
}
