use crate::cursor::ByteCursor;
use crate::Error;

use arrayref::array_ref;

pub mod ipv4;
pub mod ipv6;

pub(crate) const IPV4_ADDRESS_LENGTH: usize = 4;
pub(crate) const IPV6_ADDRESS_LENGTH: usize = 16;

pub(crate) fn read_ipv4_address(cursor: &mut ByteCursor) -> Result<std::net::Ipv4Addr, Error> {
    let bytes = cursor.read_exact(IPV4_ADDRESS_LENGTH)?;
    Ok(std::net::Ipv4Addr::from(
        array_ref![bytes, 0, IPV4_ADDRESS_LENGTH].clone(),
    ))
}

pub(crate) fn read_ipv6_address(cursor: &mut ByteCursor) -> Result<std::net::Ipv6Addr, Error> {
    let bytes = cursor.read_exact(IPV6_ADDRESS_LENGTH)?;
    Ok(std::net::Ipv6Addr::from(
        array_ref![bytes, 0, IPV6_ADDRESS_LENGTH].clone(),
    ))
}
