use crate::common::Port;
use crate::cursor::ByteCursor;
use crate::protocol::Protocol;
use crate::Error;

use log::*;

const FIN: u8 = 0x01;
const SYN: u8 = 0x02;
const RST: u8 = 0x04;
const PSH: u8 = 0x08;
const ACK: u8 = 0x10;
const URG: u8 = 0x20;
const ECE: u8 = 0x40;
const CWR: u8 = 0x80;

const FLAG_NAMES: [&str; 8] = ["fin", "syn", "rst", "psh", "ack", "urg", "ece", "cwr"];

///
/// TCP segment. The payload is whatever follows the options; nothing above
/// TCP is dispatched, so the child is always a raw node.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Tcp {
    pub src_port: Port,
    pub dst_port: Port,
    pub sequence_number: u32,
    pub acknowledgement_number: u32,
    /// Data offset in bytes, already scaled from the word count.
    pub data_offset: usize,
    pub flags: u8,
    pub window_size: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
    pub options: Vec<u8>,
    pub payload: Box<Protocol>,
}

impl Tcp {
    pub fn fin(&self) -> bool {
        self.flags & FIN != 0
    }
    pub fn syn(&self) -> bool {
        self.flags & SYN != 0
    }
    pub fn rst(&self) -> bool {
        self.flags & RST != 0
    }
    pub fn psh(&self) -> bool {
        self.flags & PSH != 0
    }
    pub fn ack(&self) -> bool {
        self.flags & ACK != 0
    }
    pub fn urg(&self) -> bool {
        self.flags & URG != 0
    }
    pub fn ece(&self) -> bool {
        self.flags & ECE != 0
    }
    pub fn cwr(&self) -> bool {
        self.flags & CWR != 0
    }

    /// Names of the set flags, lowest wire bit first.
    pub fn flag_names(&self) -> Vec<&'static str> {
        FLAG_NAMES
            .iter()
            .enumerate()
            .filter(|(bit, _)| self.flags & (1 << bit) != 0)
            .map(|(_, name)| *name)
            .collect()
    }

    pub fn parse(cursor: &mut ByteCursor) -> Result<Tcp, Error> {
        trace!("Available={}", cursor.remaining());

        let src_port = cursor.read_u16()?;
        let dst_port = cursor.read_u16()?;
        let sequence_number = cursor.read_u32()?;
        let acknowledgement_number = cursor.read_u32()?;

        let offset_byte = cursor.read_u8()?;
        let data_offset = ((offset_byte >> 4) as usize) * 4;

        let flags = cursor.read_u8()?;
        let window_size = cursor.read_u16()?;
        let checksum = cursor.read_u16()?;
        let urgent_pointer = cursor.read_u16()?;

        let options = cursor
            .read(data_offset.saturating_sub(cursor.position()))
            .to_vec();

        let payload = Protocol::Raw(cursor.read_to_end().to_vec());

        Ok(Tcp {
            src_port,
            dst_port,
            sequence_number,
            acknowledgement_number,
            data_offset,
            flags,
            window_size,
            checksum,
            urgent_pointer,
            options,
            payload: Box::new(payload),
        })
    }
}
