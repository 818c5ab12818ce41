use crate::cursor::ByteCursor;
use crate::global_header::LinkType;
use crate::layer2::ethernet::Ethernet;
use crate::layer2::usb::Usb;
use crate::layer3::ipv4::IPv4;
use crate::layer3::ipv6::IPv6;
use crate::layer4::icmp::Icmp;
use crate::layer4::tcp::Tcp;
use crate::layer4::udp::Udp;
use crate::layer7::bootp::Bootp;
use crate::common::Port;
use crate::Error;

use log::*;

const IP_PROTOCOL_ICMP: u8 = 1;
const IP_PROTOCOL_TCP: u8 = 6;
const IP_PROTOCOL_UDP: u8 = 17;

const BOOTP_SERVER_PORT: Port = 67;
const BOOTP_CLIENT_PORT: Port = 68;

///
/// One node of the decoded tree. Every variant owns its header fields plus
/// the single child node decoded from its payload; `Raw` is the terminal
/// fallback for any payload no decoder claims.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Protocol {
    Ethernet(Ethernet),
    Usb(Usb),
    IPv4(IPv4),
    IPv6(IPv6),
    Tcp(Tcp),
    Udp(Udp),
    Icmp(Icmp),
    Bootp(Bootp),
    Raw(Vec<u8>),
}

impl Protocol {
    /// The child node, for variants that delegate their payload onward.
    pub fn payload(&self) -> Option<&Protocol> {
        match self {
            Protocol::Ethernet(l2) => Some(&l2.payload),
            Protocol::IPv4(l3) => Some(&l3.payload),
            Protocol::IPv6(l3) => Some(&l3.payload),
            Protocol::Tcp(l4) => Some(&l4.payload),
            Protocol::Udp(l4) => Some(&l4.payload),
            Protocol::Icmp(l4) => Some(&l4.payload),
            Protocol::Usb(_) | Protocol::Bootp(_) | Protocol::Raw(_) => None,
        }
    }

    fn find(&self, predicate: fn(&Protocol) -> bool) -> Option<&Protocol> {
        if predicate(self) {
            Some(self)
        } else {
            self.payload().and_then(|child| child.find(predicate))
        }
    }

    /// The network-layer node of this tree, whichever IP version it is.
    pub fn ip(&self) -> Option<&Protocol> {
        self.find(|node| match node {
            Protocol::IPv4(_) | Protocol::IPv6(_) => true,
            _ => false,
        })
    }

    pub fn ipv4(&self) -> Option<&IPv4> {
        match self.find(|node| matches!(node, Protocol::IPv4(_))) {
            Some(Protocol::IPv4(l3)) => Some(l3),
            _ => None,
        }
    }

    pub fn ipv6(&self) -> Option<&IPv6> {
        match self.find(|node| matches!(node, Protocol::IPv6(_))) {
            Some(Protocol::IPv6(l3)) => Some(l3),
            _ => None,
        }
    }

    pub fn tcp(&self) -> Option<&Tcp> {
        match self.find(|node| matches!(node, Protocol::Tcp(_))) {
            Some(Protocol::Tcp(l4)) => Some(l4),
            _ => None,
        }
    }

    pub fn udp(&self) -> Option<&Udp> {
        match self.find(|node| matches!(node, Protocol::Udp(_))) {
            Some(Protocol::Udp(l4)) => Some(l4),
            _ => None,
        }
    }

    pub fn icmp(&self) -> Option<&Icmp> {
        match self.find(|node| matches!(node, Protocol::Icmp(_))) {
            Some(Protocol::Icmp(l4)) => Some(l4),
            _ => None,
        }
    }

    pub fn bootp(&self) -> Option<&Bootp> {
        match self.find(|node| matches!(node, Protocol::Bootp(_))) {
            Some(Protocol::Bootp(l7)) => Some(l7),
            _ => None,
        }
    }

    pub fn usb(&self) -> Option<&Usb> {
        match self {
            Protocol::Usb(l2) => Some(l2),
            _ => None,
        }
    }

    /// Leftover bytes when this node is the raw terminal.
    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            Protocol::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Top of the dispatch chain: pick the first-layer decoder from the
/// capture's link type.
pub(crate) fn decode_link(link_type: LinkType, cursor: &mut ByteCursor) -> Protocol {
    match link_type {
        LinkType::Ethernet => attempt(cursor, |c| Ethernet::parse(c).map(Protocol::Ethernet)),
        LinkType::Usb => attempt(cursor, |c| Usb::parse(c).map(Protocol::Usb)),
        LinkType::Unknown(code) => {
            trace!("No decoder for link type {}, keeping raw bytes", code);
            raw(cursor)
        }
    }
}

/// Distinguish IPv4 from IPv6 by peeking at the version nibble of the next
/// byte without consuming it.
pub(crate) fn decode_ip_auto(cursor: &mut ByteCursor) -> Protocol {
    match cursor.peek_u8().map(|b| b >> 4) {
        Some(4) => attempt(cursor, |c| IPv4::parse(c).map(Protocol::IPv4)),
        Some(6) => attempt(cursor, |c| IPv6::parse(c).map(Protocol::IPv6)),
        _ => raw(cursor),
    }
}

/// Transport decoder keyed by the IP protocol number.
pub(crate) fn decode_transport(protocol: u8, cursor: &mut ByteCursor) -> Protocol {
    match protocol {
        IP_PROTOCOL_TCP => attempt(cursor, |c| Tcp::parse(c).map(Protocol::Tcp)),
        IP_PROTOCOL_UDP => attempt(cursor, |c| Udp::parse(c).map(Protocol::Udp)),
        IP_PROTOCOL_ICMP => attempt(cursor, |c| Icmp::parse(c).map(Protocol::Icmp)),
        other => {
            trace!("No decoder for IP protocol {}, keeping raw bytes", other);
            raw(cursor)
        }
    }
}

/// Application decoder keyed by the UDP port pair, in either direction.
pub(crate) fn decode_udp_payload(src_port: Port, dst_port: Port, cursor: &mut ByteCursor) -> Protocol {
    let low = std::cmp::min(src_port, dst_port);
    let high = std::cmp::max(src_port, dst_port);
    if (low, high) == (BOOTP_SERVER_PORT, BOOTP_CLIENT_PORT) {
        attempt(cursor, |c| Bootp::parse(c).map(Protocol::Bootp))
    } else {
        raw(cursor)
    }
}

fn raw(cursor: &mut ByteCursor) -> Protocol {
    Protocol::Raw(cursor.read_to_end().to_vec())
}

/// Run a decoder over the cursor, falling back to a raw node over the
/// untouched bytes when it fails mid-header. Captures truncated by the
/// snapshot length routinely cut a header short, so the record as a whole
/// must survive.
fn attempt<F>(cursor: &mut ByteCursor, decode: F) -> Protocol
where
    F: FnOnce(&mut ByteCursor) -> Result<Protocol, Error>,
{
    let checkpoint = *cursor;
    match decode(&mut *cursor) {
        Ok(node) => node,
        Err(e) => {
            debug!("Decode failed ({}), keeping {} raw bytes", e, checkpoint.remaining());
            *cursor = checkpoint;
            raw(cursor)
        }
    }
}
