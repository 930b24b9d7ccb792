//! Full decision flow: URL → cache → real PAC engine → parsed decision,
//! with only the DNS port mocked.

#[path = "../common/mod.rs"]
mod common;

use common::fixtures::StaticResolver;
use std::sync::Arc;
use wpadproxy_application::services::ProxyStateService;
use wpadproxy_application::use_cases::ResolveUpstreamUseCase;
use wpadproxy_domain::{Decision, ProxyState};
use wpadproxy_infrastructure::cache::InMemoryDecisionCache;
use wpadproxy_infrastructure::pac::BoaPacEngine;
use wpadproxy_infrastructure::proxy::ProxyMetrics;

const SPLIT_PAC: &str = r#"
function FindProxyForURL(url, host) {
    if (dnsDomainIs(host, ".corp.example.com")) {
        return "PROXY gateway.corp.example.com:3128; DIRECT";
    }
    return "DIRECT";
}
"#;

const TIME_SENSITIVE_PAC: &str = r#"
function FindProxyForURL(url, host) {
    if (weekdayRange("SUN", "SAT")) {
        return "PROXY gateway.corp.example.com:3128";
    }
    return "DIRECT";
}
"#;

struct Flow {
    resolve: ResolveUpstreamUseCase,
    cache: Arc<InMemoryDecisionCache>,
    metrics: Arc<ProxyMetrics>,
}

fn flow_with(pac: &str, detected: bool) -> Flow {
    let metrics = Arc::new(ProxyMetrics::new().unwrap());
    let engine = Arc::new(BoaPacEngine::new(
        Arc::new(StaticResolver::default()),
        Arc::clone(&metrics),
    ));
    let cache = Arc::new(InMemoryDecisionCache::new());
    let state = if detected {
        ProxyState::with_pac(pac.to_string(), "10.20.30.40".to_string(), vec![])
    } else {
        ProxyState::without_pac("10.20.30.40".to_string(), vec![])
    };
    let resolve = ResolveUpstreamUseCase::new(
        Arc::new(ProxyStateService::new(state)),
        engine,
        cache.clone(),
    );
    Flow {
        resolve,
        cache,
        metrics,
    }
}

#[tokio::test]
async fn pac_splits_traffic_between_parent_and_direct() {
    let flow = flow_with(SPLIT_PAC, true);

    let internal = flow
        .resolve
        .execute("http://wiki.corp.example.com/page")
        .await;
    assert_eq!(
        internal,
        Decision::Proxy("gateway.corp.example.com:3128".into())
    );

    let external = flow.resolve.execute("http://www.example.org/").await;
    assert_eq!(external, Decision::Direct);
}

#[tokio::test]
async fn repeated_lookups_are_served_from_the_cache() {
    let flow = flow_with(SPLIT_PAC, true);

    for _ in 0..3 {
        let decision = flow.resolve.execute("http://wiki.corp.example.com/").await;
        assert_eq!(
            decision,
            Decision::Proxy("gateway.corp.example.com:3128".into())
        );
    }

    assert_eq!(flow.metrics.pac_executions_total.get(), 1);
    assert_eq!(flow.cache.len(), 1);
}

#[tokio::test]
async fn connect_targets_share_the_canonical_cache_key() {
    let flow = flow_with(SPLIT_PAC, true);

    // A CONNECT authority and its canonical URL must land on one cache entry.
    flow.resolve.execute("wiki.corp.example.com:443").await;
    flow.resolve.execute("https://wiki.corp.example.com:443").await;

    assert_eq!(flow.metrics.pac_executions_total.get(), 1);
}

#[tokio::test]
async fn time_sensitive_decisions_bypass_the_cache() {
    let flow = flow_with(TIME_SENSITIVE_PAC, true);

    for _ in 0..2 {
        let decision = flow.resolve.execute("http://www.example.org/").await;
        assert_eq!(
            decision,
            Decision::Proxy("gateway.corp.example.com:3128".into())
        );
    }

    assert_eq!(flow.metrics.pac_executions_total.get(), 2);
    assert!(flow.cache.is_empty());
}

#[tokio::test]
async fn undetected_wpad_forces_direct_without_evaluation() {
    let flow = flow_with(SPLIT_PAC, false);

    let decision = flow.resolve.execute("http://wiki.corp.example.com/").await;
    assert_eq!(decision, Decision::Direct);
    assert_eq!(flow.metrics.pac_executions_total.get(), 0);
}

#[tokio::test]
async fn broken_scripts_degrade_to_direct() {
    let flow = flow_with("function FindProxyForURL(url, host) { return nope(); }", true);

    let decision = flow.resolve.execute("http://www.example.org/").await;
    assert_eq!(decision, Decision::Direct);
    assert!(flow.cache.is_empty());
}
