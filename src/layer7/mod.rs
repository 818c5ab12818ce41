//! Application-level decoders selected by the transport port pair.

pub mod bootp;
