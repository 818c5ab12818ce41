use crate::cursor::ByteCursor;
use crate::Error;

use arrayref::array_ref;
use log::*;

const SETUP_LENGTH: usize = 8;

/// Raw status values above this are kernel error codes stored as
/// two's-complement negatives.
const STATUS_NEGATIVE_THRESHOLD: u32 = 0xfff0_0000;

///
/// Linux usbmon pseudo-header, 64 bytes, always little-endian on the wire
/// regardless of the capture's own byte order. The payload that follows is
/// opaque bus data and is not dispatched further.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Usb {
    pub urb_id: u64,
    pub urb_type: char,
    pub transfer_type: u8,
    pub endpoint: u8,
    pub device: u8,
    pub bus: u16,
    pub flag_setup: u8,
    pub flag_data: u8,
    pub ts_seconds: u64,
    pub ts_microseconds: u32,
    pub status: i64,
    pub length: u32,
    pub captured_length: u32,
    pub setup: [u8; SETUP_LENGTH],
    pub interval: u32,
    pub start_frame: u32,
    pub transfer_flags: u32,
    pub descriptor_count: u32,
    pub payload: Vec<u8>,
}

impl Usb {
    /// `bus:device:endpoint`, the conventional short form.
    pub fn endpoint_address(&self) -> String {
        format!("{}:{}:{}", self.bus, self.device, self.endpoint)
    }

    pub fn parse(cursor: &mut ByteCursor) -> Result<Usb, Error> {
        trace!("Available={}", cursor.remaining());

        let urb_id = cursor.read_u64()?;
        let urb_type = char::from(cursor.read_u8()?);
        let transfer_type = cursor.read_u8()?;
        let endpoint = cursor.read_u8()?;
        let device = cursor.read_u8()?;
        let bus = cursor.read_u16()?;
        let flag_setup = cursor.read_u8()?;
        let flag_data = cursor.read_u8()?;
        let ts_seconds = cursor.read_u64()?;
        let ts_microseconds = cursor.read_u32()?;

        let raw_status = cursor.read_u32()?;
        let status = if raw_status > STATUS_NEGATIVE_THRESHOLD {
            i64::from(raw_status) - (1i64 << 32)
        } else {
            i64::from(raw_status)
        };

        let length = cursor.read_u32()?;
        let captured_length = cursor.read_u32()?;
        let setup = array_ref![cursor.read_exact(SETUP_LENGTH)?, 0, SETUP_LENGTH].clone();
        let interval = cursor.read_u32()?;
        let start_frame = cursor.read_u32()?;
        let transfer_flags = cursor.read_u32()?;
        let descriptor_count = cursor.read_u32()?;

        let payload = cursor.read(captured_length as usize).to_vec();

        Ok(Usb {
            urb_id,
            urb_type,
            transfer_type,
            endpoint,
            device,
            bus,
            flag_setup,
            flag_data,
            ts_seconds,
            ts_microseconds,
            status,
            length,
            captured_length,
            setup,
            interval,
            start_frame,
            transfer_flags,
            descriptor_count,
            payload,
        })
    }
}
