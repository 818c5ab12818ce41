use crate::common::{MacAddress, MAC_LENGTH};
use crate::cursor::ByteCursor;
use crate::protocol::{self, Protocol};
use crate::Error;

use arrayref::array_ref;
use log::*;

const TRAILER_LENGTH: usize = 4;

///
/// Ethernet frame. The wire format carries the destination address first.
/// The last four bytes of the frame are reserved for the optional trailing
/// CRC, so the payload sub-cursor never covers them.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Ethernet {
    pub dst_mac: MacAddress,
    pub src_mac: MacAddress,
    pub ether_type: u16,
    pub payload: Box<Protocol>,
    pub crc: Option<u32>,
}

fn read_mac_address(cursor: &mut ByteCursor) -> Result<MacAddress, Error> {
    let bytes = cursor.read_exact(MAC_LENGTH)?;
    Ok(MacAddress(array_ref![bytes, 0, MAC_LENGTH].clone()))
}

impl Ethernet {
    pub fn parse(cursor: &mut ByteCursor) -> Result<Ethernet, Error> {
        trace!("Available={}", cursor.remaining());

        let dst_mac = read_mac_address(cursor)?;
        let src_mac = read_mac_address(cursor)?;
        let ether_type = cursor.read_u16()?;

        let payload_length = cursor.remaining().saturating_sub(TRAILER_LENGTH);
        let mut payload_cursor = cursor.sub_cursor(payload_length);
        let payload = protocol::decode_ip_auto(&mut payload_cursor);

        let crc = if cursor.at_end() {
            None
        } else {
            cursor.read_u32().ok()
        };

        Ok(Ethernet {
            dst_mac,
            src_mac,
            ether_type,
            payload: Box::new(payload),
            crc,
        })
    }
}
