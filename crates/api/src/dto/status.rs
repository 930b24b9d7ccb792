use serde::Serialize;
use wpadproxy_domain::ProxyState;

/// JSON dump of the current proxy state.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub pac_text: String,
    pub local_ip: String,
    pub search_domains: Vec<String>,
    pub detected: bool,
}

impl From<&ProxyState> for StatusResponse {
    fn from(state: &ProxyState) -> Self {
        Self {
            pac_text: state.pac_text.clone(),
            local_ip: state.local_ip.clone(),
            search_domains: state.search_domains.clone(),
            detected: state.detected,
        }
    }
}
