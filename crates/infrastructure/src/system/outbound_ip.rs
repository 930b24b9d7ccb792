use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use tracing::debug;
use wpadproxy_application::ports::OutboundNetwork;
use wpadproxy_domain::DomainError;

/// Address the kernel routes a probe socket toward; no packet is sent,
/// connecting a UDP socket only selects the egress interface.
const PROBE_ADDR: &str = "8.8.8.8:53";

pub struct UdpProbeNetwork;

impl OutboundNetwork for UdpProbeNetwork {
    fn outbound_ip(&self) -> Result<Ipv4Addr, DomainError> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DomainError::OutboundAddressFailed(e.to_string()))?;
        socket
            .connect(PROBE_ADDR)
            .map_err(|e| DomainError::OutboundAddressFailed(e.to_string()))?;
        let local = socket
            .local_addr()
            .map_err(|e| DomainError::OutboundAddressFailed(e.to_string()))?;
        match local.ip() {
            IpAddr::V4(v4) => {
                debug!(ip = %v4, "Outbound IPv4 address discovered");
                Ok(v4)
            }
            IpAddr::V6(v6) => Err(DomainError::OutboundAddressFailed(format!(
                "probe selected an IPv6 source: {v6}"
            ))),
        }
    }
}
