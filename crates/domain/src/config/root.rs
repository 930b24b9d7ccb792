use super::{ConfigError, LoggingConfig, ServerConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Command-line flags that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub proxy_port: Option<u16>,
    pub mgmt_port: Option<u16>,
}

impl Config {
    /// Load configuration from an optional TOML file, then apply CLI overrides.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_string(),
                    source,
                })?;
                toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            None => Config::default(),
        };
        if let Some(port) = overrides.proxy_port {
            config.server.proxy_port = port;
        }
        if let Some(port) = overrides.mgmt_port {
            config.server.mgmt_port = port;
        }
        Ok(config)
    }

    pub fn proxy_addr(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.proxy_port)
    }

    pub fn mgmt_addr(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.mgmt_port)
    }
}
