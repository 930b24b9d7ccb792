use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Port of the forward-proxy listener
    #[serde(default = "default_proxy_port")]
    pub proxy_port: u16,

    /// Port of the management listener
    #[serde(default = "default_mgmt_port")]
    pub mgmt_port: u16,

    /// Both listeners bind here; loopback by default
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_proxy_port() -> u16 {
    8080
}

fn default_mgmt_port() -> u16 {
    9001
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            proxy_port: default_proxy_port(),
            mgmt_port: default_mgmt_port(),
            bind_address: default_bind_address(),
        }
    }
}
