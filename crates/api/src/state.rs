use std::sync::Arc;
use wpadproxy_application::services::ProxyStateService;
use wpadproxy_application::use_cases::RefreshStateUseCase;
use wpadproxy_infrastructure::proxy::ProxyMetrics;

#[derive(Clone)]
pub struct AppState {
    pub proxy_state: Arc<ProxyStateService>,
    pub refresh: Arc<RefreshStateUseCase>,
    pub metrics: Arc<ProxyMetrics>,
}
