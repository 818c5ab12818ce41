use crate::cursor::ByteCursor;
use crate::layer3::{read_ipv4_address, IPV4_ADDRESS_LENGTH};
use crate::Error;

use log::*;

/// Cookie ahead of the DHCP option block, read in the cursor's byte order.
pub const DHCP_MAGIC: u32 = 0x63825363;

/// op/htype/hlen/hops/xid/secs/flags block, kept raw.
const TRANSACTION_LENGTH: usize = 12;
/// chaddr + sname + file block between the gateway address and the cookie.
const LEGACY_LENGTH: usize = 236 - TRANSACTION_LENGTH - 4 * IPV4_ADDRESS_LENGTH;

const OPTION_PAD: u8 = 0;
const OPTION_MESSAGE_TYPE: u8 = 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhcpMessageType {
    Discover,
    Offer,
    Request,
    Decline,
    Ack,
    Nak,
    Release,
    Inform,
    Unknown(u8),
}

impl From<u8> for DhcpMessageType {
    fn from(value: u8) -> DhcpMessageType {
        match value {
            1 => DhcpMessageType::Discover,
            2 => DhcpMessageType::Offer,
            3 => DhcpMessageType::Request,
            4 => DhcpMessageType::Decline,
            5 => DhcpMessageType::Ack,
            6 => DhcpMessageType::Nak,
            7 => DhcpMessageType::Release,
            8 => DhcpMessageType::Inform,
            value => DhcpMessageType::Unknown(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DhcpOptionValue {
    MessageType(DhcpMessageType),
    Raw(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DhcpOption {
    pub code: u8,
    pub value: DhcpOptionValue,
}

///
/// BOOTP body, with the DHCP option block decoded when the magic cookie
/// matches. Terminal: everything up to the end of the datagram belongs to
/// this node.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Bootp {
    pub transaction: Vec<u8>,
    pub client_ip: std::net::Ipv4Addr,
    pub your_ip: std::net::Ipv4Addr,
    pub server_ip: std::net::Ipv4Addr,
    pub gateway_ip: std::net::Ipv4Addr,
    pub legacy: Vec<u8>,
    pub magic: u32,
    pub options: Vec<DhcpOption>,
}

impl Bootp {
    /// DHCP message type carried in option 53, if the datagram had one.
    pub fn message_type(&self) -> Option<DhcpMessageType> {
        self.options.iter().find_map(|option| match option.value {
            DhcpOptionValue::MessageType(message_type) => Some(message_type),
            _ => None,
        })
    }

    pub fn parse(cursor: &mut ByteCursor) -> Result<Bootp, Error> {
        trace!("Available={}", cursor.remaining());

        let transaction = cursor.read_exact(TRANSACTION_LENGTH)?.to_vec();
        let client_ip = read_ipv4_address(cursor)?;
        let your_ip = read_ipv4_address(cursor)?;
        let server_ip = read_ipv4_address(cursor)?;
        let gateway_ip = read_ipv4_address(cursor)?;
        let legacy = cursor.read_exact(LEGACY_LENGTH)?.to_vec();
        let magic = cursor.read_u32()?;

        let mut options = Vec::new();
        if magic == DHCP_MAGIC {
            while !cursor.at_end() {
                let code = match cursor.read_u8() {
                    Ok(code) => code,
                    Err(_) => break,
                };
                let length = match cursor.read_u8() {
                    Ok(length) => length,
                    Err(_) => break,
                };
                if code == OPTION_PAD && length == 0 {
                    continue;
                }

                let bytes = cursor.read(length as usize).to_vec();
                let value = match (code, bytes.first()) {
                    (OPTION_MESSAGE_TYPE, Some(&b)) => {
                        DhcpOptionValue::MessageType(DhcpMessageType::from(b))
                    }
                    _ => DhcpOptionValue::Raw(bytes),
                };
                options.push(DhcpOption { code, value });
            }
        } else {
            debug!("No DHCP cookie ({:#010x}), skipping option decode", magic);
        }

        Ok(Bootp {
            transaction,
            client_ip,
            your_ip,
            server_ip,
            gateway_ip,
            legacy,
            magic,
            options,
        })
    }
}
