use crate::cursor::ByteCursor;
use crate::layer3::read_ipv6_address;
use crate::protocol::{self, Protocol};
use crate::Error;

use log::*;

///
/// IPv6 header plus its dispatched payload.
///
/// The extension-header chain is a known gap: `next_header` is handed to
/// transport dispatch as-is, so hop-by-hop, routing or fragment headers end
/// up in a raw payload node instead of being walked.
///
#[derive(Debug, Clone, PartialEq)]
pub struct IPv6 {
    pub version: u8,
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_length: u16,
    pub next_header: u8,
    pub hop_limit: u8,
    pub src_ip: std::net::Ipv6Addr,
    pub dst_ip: std::net::Ipv6Addr,
    pub payload: Box<Protocol>,
}

impl IPv6 {
    pub fn parse(cursor: &mut ByteCursor) -> Result<IPv6, Error> {
        trace!("Available={}", cursor.remaining());

        let head = cursor.read_u32()?;
        let version = ((head >> 28) & 0x0F) as u8;
        let traffic_class = ((head >> 20) & 0xFF) as u8;
        let flow_label = head & 0x000F_FFFF;

        let payload_length = cursor.read_u16()?;
        let next_header = cursor.read_u8()?;
        let hop_limit = cursor.read_u8()?;
        let src_ip = read_ipv6_address(cursor)?;
        let dst_ip = read_ipv6_address(cursor)?;

        let mut payload_cursor = cursor.sub_cursor(payload_length as usize);
        let payload = protocol::decode_transport(next_header, &mut payload_cursor);

        Ok(IPv6 {
            version,
            traffic_class,
            flow_label,
            payload_length,
            next_header,
            hop_limit,
            src_ip,
            dst_ip,
            payload: Box::new(payload),
        })
    }
}
