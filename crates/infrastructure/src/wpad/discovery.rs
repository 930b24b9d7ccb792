use crate::system::resolv_conf;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info};
use wpadproxy_application::ports::{HostResolver, WpadClient};
use wpadproxy_domain::DomainError;

const WPAD_HOST: &str = "wpad";

/// WPAD discovery: candidate-name construction plus the `wpad.dat` fetch.
pub struct WpadDiscovery {
    resolver: Arc<dyn HostResolver>,
    http: reqwest::Client,
}

impl WpadDiscovery {
    pub fn new(resolver: Arc<dyn HostResolver>) -> Result<Self, DomainError> {
        // The discovery fetch must never route through this proxy itself.
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| DomainError::WpadDiscoveryFailed(e.to_string()))?;
        Ok(Self { resolver, http })
    }
}

/// Candidate FQDNs for `host`: for every search domain, every progressive
/// suffix tail of it (one label dropped from the left at a time).
pub(crate) fn candidate_fqdns(host: &str, search_domains: &[String]) -> Vec<String> {
    let mut candidates = Vec::new();
    for domain in search_domains {
        let labels: Vec<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();
        for start in 0..labels.len() {
            candidates.push(format!("{host}.{}", labels[start..].join(".")));
        }
    }
    candidates
}

/// First candidate the resolver can turn into an address.
pub(crate) fn first_resolvable(
    resolver: &dyn HostResolver,
    candidates: &[String],
) -> Option<String> {
    candidates
        .iter()
        .find(|name| resolver.first_ipv4(name).is_some())
        .cloned()
}

/// The host's own domain: everything after the first `.` of its hostname.
fn host_domain() -> Option<String> {
    let name = hostname::get().ok()?;
    let name = name.to_str()?;
    name.split_once('.')
        .map(|(_, domain)| domain.to_string())
        .filter(|domain| !domain.is_empty())
}

#[async_trait]
impl WpadClient for WpadDiscovery {
    fn search_domains(&self) -> Vec<String> {
        if let Some(domain) = host_domain() {
            debug!(domain = %domain, "Using the host's own domain for WPAD candidates");
            return vec![domain];
        }
        match resolv_conf::load() {
            Ok(conf) => conf.search_domains(),
            Err(e) => {
                debug!(error = %e, "resolv.conf unavailable; no search domains");
                Vec::new()
            }
        }
    }

    async fn fetch_wpad(&self, search_domains: &[String]) -> Result<String, DomainError> {
        let fqdn = if search_domains.is_empty() {
            WPAD_HOST.to_string()
        } else {
            let resolver = Arc::clone(&self.resolver);
            let candidates = candidate_fqdns(WPAD_HOST, search_domains);
            task::spawn_blocking(move || first_resolvable(resolver.as_ref(), &candidates))
                .await
                .map_err(|e| DomainError::WpadDiscoveryFailed(e.to_string()))?
                .ok_or_else(|| {
                    DomainError::WpadDiscoveryFailed("no WPAD candidate resolved".to_string())
                })?
        };

        let url = format!("http://{fqdn}/wpad.dat");
        info!(url = %url, "Fetching WPAD script");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::WpadDiscoveryFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DomainError::WpadDiscoveryFailed(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        response
            .text()
            .await
            .map_err(|e| DomainError::WpadDiscoveryFailed(e.to_string()))
    }
}
