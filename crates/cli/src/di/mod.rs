//! Dependency wiring: adapters bound to their ports, use cases assembled,
//! request surfaces built.

use anyhow::Context as _;
use std::sync::Arc;
use wpadproxy_api::AppState;
use wpadproxy_application::ports::{
    DecisionCache, HostResolver, OutboundNetwork, PacEvaluator, WpadClient,
};
use wpadproxy_application::services::ProxyStateService;
use wpadproxy_application::use_cases::{RefreshStateUseCase, ResolveUpstreamUseCase};
use wpadproxy_domain::ProxyState;
use wpadproxy_infrastructure::cache::InMemoryDecisionCache;
use wpadproxy_infrastructure::dns::SystemHostResolver;
use wpadproxy_infrastructure::pac::BoaPacEngine;
use wpadproxy_infrastructure::proxy::{ProxyHandler, ProxyMetrics};
use wpadproxy_infrastructure::system::UdpProbeNetwork;
use wpadproxy_infrastructure::wpad::WpadDiscovery;

pub struct AppContext {
    pub state: Arc<ProxyStateService>,
    pub refresh: Arc<RefreshStateUseCase>,
    pub proxy_handler: Arc<ProxyHandler>,
    pub metrics: Arc<ProxyMetrics>,
}

impl AppContext {
    pub fn build() -> anyhow::Result<Self> {
        let metrics =
            Arc::new(ProxyMetrics::new().context("failed to build the metrics registry")?);
        let resolver: Arc<dyn HostResolver> = Arc::new(
            SystemHostResolver::from_system().context("failed to build the system resolver")?,
        );
        let cache: Arc<dyn DecisionCache> = Arc::new(InMemoryDecisionCache::new());
        let state = Arc::new(ProxyStateService::new(ProxyState::without_pac(
            String::new(),
            Vec::new(),
        )));

        let engine: Arc<dyn PacEvaluator> = Arc::new(BoaPacEngine::new(
            Arc::clone(&resolver),
            Arc::clone(&metrics),
        ));
        let wpad: Arc<dyn WpadClient> = Arc::new(
            WpadDiscovery::new(Arc::clone(&resolver))
                .context("failed to build the WPAD discovery client")?,
        );
        let network: Arc<dyn OutboundNetwork> = Arc::new(UdpProbeNetwork);

        let resolve = Arc::new(ResolveUpstreamUseCase::new(
            Arc::clone(&state),
            engine,
            cache,
        ));
        let refresh = Arc::new(RefreshStateUseCase::new(
            Arc::clone(&state),
            wpad,
            network,
        ));
        let proxy_handler = Arc::new(ProxyHandler::new(resolve, Arc::clone(&metrics)));

        Ok(Self {
            state,
            refresh,
            proxy_handler,
            metrics,
        })
    }

    pub fn api_state(&self) -> AppState {
        AppState {
            proxy_state: Arc::clone(&self.state),
            refresh: Arc::clone(&self.refresh),
            metrics: Arc::clone(&self.metrics),
        }
    }
}
