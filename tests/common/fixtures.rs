//! Shared test doubles for the I/O-facing ports.

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use wpadproxy_application::ports::{HostResolver, OutboundNetwork, WpadClient};
use wpadproxy_domain::DomainError;

/// Resolver answering from a fixed table.
#[derive(Default)]
pub struct StaticResolver {
    answers: HashMap<String, String>,
}

impl StaticResolver {
    pub fn with(mut self, host: &str, addr: &str) -> Self {
        self.answers.insert(host.to_string(), addr.to_string());
        self
    }
}

impl HostResolver for StaticResolver {
    fn first_ipv4(&self, host: &str) -> Option<String> {
        self.answers.get(host).cloned()
    }
}

/// WPAD client that replays a scripted sequence of fetch outcomes.
pub struct ScriptedWpad {
    outcomes: Mutex<Vec<Result<String, String>>>,
}

impl ScriptedWpad {
    pub fn new(outcomes: Vec<Result<String, String>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
        }
    }
}

#[async_trait]
impl WpadClient for ScriptedWpad {
    fn search_domains(&self) -> Vec<String> {
        vec!["corp.example.com".to_string()]
    }

    async fn fetch_wpad(&self, _search_domains: &[String]) -> Result<String, DomainError> {
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            return Err(DomainError::WpadDiscoveryFailed("script exhausted".into()));
        }
        outcomes.remove(0).map_err(DomainError::WpadDiscoveryFailed)
    }
}

pub struct FixedNetwork(pub Ipv4Addr);

impl OutboundNetwork for FixedNetwork {
    fn outbound_ip(&self) -> Result<Ipv4Addr, DomainError> {
        Ok(self.0)
    }
}
