use crate::ports::{OutboundNetwork, WpadClient};
use crate::services::ProxyStateService;
use std::sync::Arc;
use tracing::{info, warn};
use wpadproxy_domain::ProxyState;

/// Re-probe the network environment and swap in a fresh [`ProxyState`].
///
/// Runs once at startup and again on every `/refresh`. Partial failures
/// degrade instead of aborting: an unreachable WPAD host leaves the proxy in
/// forced-DIRECT mode, and a failed outbound-IP probe keeps the previous
/// address.
pub struct RefreshStateUseCase {
    state: Arc<ProxyStateService>,
    wpad: Arc<dyn WpadClient>,
    network: Arc<dyn OutboundNetwork>,
}

impl RefreshStateUseCase {
    pub fn new(
        state: Arc<ProxyStateService>,
        wpad: Arc<dyn WpadClient>,
        network: Arc<dyn OutboundNetwork>,
    ) -> Self {
        Self {
            state,
            wpad,
            network,
        }
    }

    pub async fn execute(&self) -> Arc<ProxyState> {
        let previous = self.state.snapshot();

        let local_ip = match self.network.outbound_ip() {
            Ok(ip) => ip.to_string(),
            Err(e) => {
                warn!(error = %e, "Outbound IP discovery failed; keeping previous address");
                previous.local_ip.clone()
            }
        };

        let search_domains = self.wpad.search_domains();

        let next = match self.wpad.fetch_wpad(&search_domains).await {
            Ok(pac_text) => {
                info!(
                    local_ip = %local_ip,
                    pac_bytes = pac_text.len(),
                    "WPAD script fetched"
                );
                ProxyState::with_pac(pac_text, local_ip, search_domains)
            }
            Err(e) => {
                warn!(error = %e, local_ip = %local_ip, "WPAD discovery failed; forcing DIRECT");
                ProxyState::without_pac(local_ip, search_domains)
            }
        };

        self.state.replace(next);
        self.state.snapshot()
    }
}
