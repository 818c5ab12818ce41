//! First-layer framings selected by the capture's link type.

pub mod ethernet;
pub mod usb;
