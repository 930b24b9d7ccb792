use std::net::Ipv4Addr;
use wpadproxy_domain::DomainError;

pub trait OutboundNetwork: Send + Sync {
    /// The IPv4 source address this host would use for egress traffic.
    fn outbound_ip(&self) -> Result<Ipv4Addr, DomainError>;
}
