use hickory_resolver::Resolver;
use std::net::IpAddr;
use tracing::debug;
use wpadproxy_application::ports::HostResolver;
use wpadproxy_domain::DomainError;

/// Blocking system-resolver adapter.
///
/// The blocking form of hickory's resolver is deliberate: `dnsResolve` and
/// `isResolvable` are called from inside Boa native functions, and the whole
/// PAC evaluation already runs on a blocking thread.
pub struct SystemHostResolver {
    inner: Resolver,
}

impl SystemHostResolver {
    /// Build a resolver from the system's `/etc/resolv.conf`.
    pub fn from_system() -> Result<Self, DomainError> {
        let inner = Resolver::from_system_conf()
            .map_err(|e| DomainError::ResolverUnavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl HostResolver for SystemHostResolver {
    fn first_ipv4(&self, host: &str) -> Option<String> {
        let lookup = match self.inner.lookup_ip(host) {
            Ok(lookup) => lookup,
            Err(e) => {
                debug!(host = %host, error = %e, "DNS lookup failed");
                return None;
            }
        };
        lookup.iter().find_map(|addr| match addr {
            IpAddr::V4(v4) => Some(v4.to_string()),
            IpAddr::V6(_) => None,
        })
    }
}
