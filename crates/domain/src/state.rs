use serde::Serialize;

/// Snapshot of the discovered proxy environment.
///
/// Replaced wholesale on refresh. `detected` is true only for states built
/// from a successful WPAD fetch, so a true flag never pairs with an empty
/// PAC script.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyState {
    pub pac_text: String,
    pub local_ip: String,
    pub search_domains: Vec<String>,
    pub detected: bool,
}

impl ProxyState {
    /// State after a successful WPAD fetch.
    pub fn with_pac(pac_text: String, local_ip: String, search_domains: Vec<String>) -> Self {
        Self {
            pac_text,
            local_ip,
            search_domains,
            detected: true,
        }
    }

    /// State when WPAD discovery failed; the pipeline forces DIRECT.
    pub fn without_pac(local_ip: String, search_domains: Vec<String>) -> Self {
        Self {
            pac_text: String::new(),
            local_ip,
            search_domains,
            detected: false,
        }
    }
}
