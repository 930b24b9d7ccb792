/// System-resolver lookup backing `dnsResolve`/`isResolvable` and WPAD
/// candidate probing.
///
/// Returns the first IPv4 address as a dotted quad. NXDOMAIN, timeouts and
/// records without an A entry are not distinguished; all collapse to `None`.
/// Lookups are synchronous because the PAC helpers call them from inside a
/// JavaScript host function.
pub trait HostResolver: Send + Sync {
    fn first_ipv4(&self, host: &str) -> Option<String>;
}
