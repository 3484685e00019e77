use std::net::{IpAddr, UdpSocket};

/// Address of the interface used for outbound traffic, for display only.
///
/// Connecting a UDP socket sends no packets; it only selects a route. Falls
/// back to `localhost` when no route is available.
pub fn local_ip_address() -> String {
    discover_local_ip()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "localhost".to_string())
}

fn discover_local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}
