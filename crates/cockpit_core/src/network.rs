use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

pub const DEFAULT_PROBE_ADDR: &str = "8.8.8.8:65530";

/// Local IPv4 address the OS would use to reach `probe`.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub fn local_ipv4(probe: &str) -> io::Result<Ipv4Addr> {
    let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))?;
    socket.connect(probe)?;
    match socket.local_addr()?.ip() {
        IpAddr::V4(addr) => {
            log::debug!("local address towards {probe} is {addr}");
            Ok(addr)
        }
        IpAddr::V6(addr) => Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("route to {probe} uses IPv6 address {addr}"),
        )),
    }
}
