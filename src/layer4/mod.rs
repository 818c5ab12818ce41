//! Transport-layer decoders selected by the IP protocol number.

pub mod icmp;
pub mod tcp;
pub mod udp;
