use async_trait::async_trait;
use wpadproxy_domain::DomainError;

#[async_trait]
pub trait WpadClient: Send + Sync {
    /// Ordered DNS suffixes used to build WPAD candidate names.
    fn search_domains(&self) -> Vec<String>;

    /// Fetch `wpad.dat` from the first resolvable candidate FQDN.
    ///
    /// Failure is expected on networks without WPAD; the caller degrades to
    /// `detected = false` instead of propagating.
    async fn fetch_wpad(&self, search_domains: &[String]) -> Result<String, DomainError>;
}
