//! Refresh flow: WPAD re-discovery swapping the proxy state, and the decision
//! path reacting to it.

#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{FixedNetwork, ScriptedWpad, StaticResolver};
use std::net::Ipv4Addr;
use std::sync::Arc;
use wpadproxy_application::services::ProxyStateService;
use wpadproxy_application::use_cases::{RefreshStateUseCase, ResolveUpstreamUseCase};
use wpadproxy_domain::{Decision, ProxyState};
use wpadproxy_infrastructure::cache::InMemoryDecisionCache;
use wpadproxy_infrastructure::pac::BoaPacEngine;
use wpadproxy_infrastructure::proxy::ProxyMetrics;

const PARENT_PAC: &str =
    "function FindProxyForURL(url, host) { return \"PROXY gateway.example.net:3128\"; }";

#[tokio::test]
async fn refresh_cycle_detects_then_loses_wpad() {
    let state = Arc::new(ProxyStateService::new(ProxyState::without_pac(
        String::new(),
        vec![],
    )));
    let refresh = RefreshStateUseCase::new(
        state.clone(),
        Arc::new(ScriptedWpad::new(vec![
            Ok(PARENT_PAC.to_string()),
            Err("wpad.corp.example.com unreachable".to_string()),
        ])),
        Arc::new(FixedNetwork(Ipv4Addr::new(10, 0, 0, 42))),
    );

    let metrics = Arc::new(ProxyMetrics::new().unwrap());
    let resolve = ResolveUpstreamUseCase::new(
        state.clone(),
        Arc::new(BoaPacEngine::new(
            Arc::new(StaticResolver::default()),
            Arc::clone(&metrics),
        )),
        Arc::new(InMemoryDecisionCache::new()),
    );

    // Before any discovery: forced DIRECT.
    assert_eq!(
        resolve.execute("http://www.example.org/").await,
        Decision::Direct
    );

    // First refresh succeeds: the PAC decision applies.
    let snapshot = refresh.execute().await;
    assert!(snapshot.detected);
    assert_eq!(snapshot.local_ip, "10.0.0.42");
    assert_eq!(
        resolve.execute("http://www.example.org/").await,
        Decision::Proxy("gateway.example.net:3128".into())
    );

    // Second refresh fails: back to forced DIRECT, IP retained.
    let snapshot = refresh.execute().await;
    assert!(!snapshot.detected);
    assert!(snapshot.pac_text.is_empty());
    assert_eq!(snapshot.local_ip, "10.0.0.42");
    assert_eq!(
        resolve.execute("http://fresh.example.org/").await,
        Decision::Direct
    );
}
