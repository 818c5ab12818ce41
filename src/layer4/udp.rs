use crate::common::Port;
use crate::cursor::ByteCursor;
use crate::protocol::{self, Protocol};
use crate::Error;

use log::*;

const HEADER_LENGTH: usize = 8;

///
/// UDP datagram. The payload sub-cursor is sized from the declared length
/// and the child decoder is picked from the port pair.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Udp {
    pub src_port: Port,
    pub dst_port: Port,
    pub length: u16,
    pub checksum: u16,
    pub payload: Box<Protocol>,
}

impl Udp {
    pub fn parse(cursor: &mut ByteCursor) -> Result<Udp, Error> {
        trace!("Available={}", cursor.remaining());

        let src_port = cursor.read_u16()?;
        let dst_port = cursor.read_u16()?;
        let length = cursor.read_u16()?;
        let checksum = cursor.read_u16()?;

        let payload_length = (length as usize).saturating_sub(HEADER_LENGTH);
        let mut payload_cursor = cursor.sub_cursor(payload_length);
        let payload = protocol::decode_udp_payload(src_port, dst_port, &mut payload_cursor);

        Ok(Udp {
            src_port,
            dst_port,
            length,
            checksum,
            payload: Box::new(payload),
        })
    }
}
