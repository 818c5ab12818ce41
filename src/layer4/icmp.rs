use crate::cursor::ByteCursor;
use crate::protocol::Protocol;
use crate::Error;

use log::*;

///
/// Well-known ICMP message types. Anything else stays numeric; sub-types
/// are not decoded further.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IcmpType {
    EchoReply,
    DestinationUnreachable,
    SourceQuench,
    RedirectMessage,
    EchoRequest,
    RouterAdvertisement,
    RouterSolicitation,
    TimeExceeded,
    BadIpHeader,
    Timestamp,
    TimestampReply,
    AddressMaskRequest,
    AddressMaskReply,
}

impl IcmpType {
    pub fn from(value: u8) -> Option<IcmpType> {
        match value {
            0 => Some(IcmpType::EchoReply),
            3 => Some(IcmpType::DestinationUnreachable),
            4 => Some(IcmpType::SourceQuench),
            5 => Some(IcmpType::RedirectMessage),
            8 => Some(IcmpType::EchoRequest),
            9 => Some(IcmpType::RouterAdvertisement),
            10 => Some(IcmpType::RouterSolicitation),
            11 => Some(IcmpType::TimeExceeded),
            12 => Some(IcmpType::BadIpHeader),
            13 => Some(IcmpType::Timestamp),
            14 => Some(IcmpType::TimestampReply),
            17 => Some(IcmpType::AddressMaskRequest),
            18 => Some(IcmpType::AddressMaskReply),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Icmp {
    pub type_: u8,
    pub code: u8,
    pub checksum: u16,
    pub identifier: u16,
    pub sequence: u16,
    pub payload: Box<Protocol>,
}

impl Icmp {
    pub fn type_enum(&self) -> Option<IcmpType> {
        IcmpType::from(self.type_)
    }

    pub fn parse(cursor: &mut ByteCursor) -> Result<Icmp, Error> {
        trace!("Available={}", cursor.remaining());

        let type_ = cursor.read_u8()?;
        let code = cursor.read_u8()?;
        let checksum = cursor.read_u16()?;
        let identifier = cursor.read_u16()?;
        let sequence = cursor.read_u16()?;
        let payload = Protocol::Raw(cursor.read_to_end().to_vec());

        Ok(Icmp {
            type_,
            code,
            checksum,
            identifier,
            sequence,
            payload: Box::new(payload),
        })
    }
}
