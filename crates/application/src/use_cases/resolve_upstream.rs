use crate::ports::{DecisionCache, PacEvaluator};
use crate::services::ProxyStateService;
use sha1::{Digest, Sha1};
use std::sync::Arc;
use tracing::{debug, warn};
use wpadproxy_domain::Decision;

/// Canonicalize a request target for PAC evaluation and cache keying.
///
/// Forward requests arrive as absolute URLs and pass through unchanged.
/// CONNECT targets arrive as bare `host:port` authorities and get a scheme
/// prepended: `https:` for port 443 (or no port), `http:` otherwise.
/// Returns `(canonical_url, host)`.
pub fn canonicalize_url(raw: &str) -> (String, String) {
    if raw.starts_with("http") {
        let host = url::Url::parse(raw)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
            .unwrap_or_default();
        return (raw.to_string(), host);
    }
    match raw.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            let scheme = if port == "443" { "https" } else { "http" };
            (format!("{scheme}://{raw}"), host.to_string())
        }
        _ => (format!("https://{raw}"), raw.to_string()),
    }
}

/// Cache key for one decision: SHA-1 of the local IP concatenated with the
/// canonical URL.
pub fn decision_key(local_ip: &str, canonical_url: &str) -> [u8; 20] {
    let mut hasher = Sha1::new();
    hasher.update(local_ip.as_bytes());
    hasher.update(canonical_url.as_bytes());
    hasher.finalize().into()
}

/// Decide the upstream for one request URL.
///
/// Flow: state snapshot → canonicalize → cache lookup → PAC evaluation on a
/// miss → parse the first directive → memoize when the evaluation was not
/// time-sensitive. Every failure path degrades to [`Decision::Direct`].
pub struct ResolveUpstreamUseCase {
    state: Arc<ProxyStateService>,
    engine: Arc<dyn PacEvaluator>,
    cache: Arc<dyn DecisionCache>,
}

impl ResolveUpstreamUseCase {
    pub fn new(
        state: Arc<ProxyStateService>,
        engine: Arc<dyn PacEvaluator>,
        cache: Arc<dyn DecisionCache>,
    ) -> Self {
        Self {
            state,
            engine,
            cache,
        }
    }

    pub async fn execute(&self, url: &str) -> Decision {
        let snapshot = self.state.snapshot();
        if !snapshot.detected {
            return Decision::Direct;
        }

        let (canonical, host) = canonicalize_url(url);
        let key = decision_key(&snapshot.local_ip, &canonical);

        if let Some(stored) = self.cache.get(&key) {
            debug!(url = %canonical, decision = %stored, "Decision cache hit");
            return Decision::from_cached(&stored);
        }

        let verdict = match self
            .engine
            .evaluate(&snapshot.pac_text, &snapshot.local_ip, &canonical, &host)
            .await
        {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(error = %e, url = %canonical, "PAC evaluation failed; going direct");
                return Decision::Direct;
            }
        };

        match Decision::parse(&verdict.raw) {
            Ok(decision) => {
                if verdict.cacheable {
                    self.cache.put(key, decision.cached_repr().to_string());
                } else {
                    debug!(url = %canonical, "Time-sensitive PAC result; not cached");
                }
                decision
            }
            Err(e) => {
                warn!(error = %e, url = %canonical, "Unrecognized PAC result; going direct");
                Decision::Direct
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PacVerdict;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use wpadproxy_domain::{DomainError, ProxyState};

    struct ScriptedEvaluator {
        verdict: PacVerdict,
        calls: AtomicUsize,
    }

    impl ScriptedEvaluator {
        fn returning(raw: &str, cacheable: bool) -> Arc<Self> {
            Arc::new(Self {
                verdict: PacVerdict {
                    raw: raw.to_string(),
                    cacheable,
                },
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PacEvaluator for ScriptedEvaluator {
        async fn evaluate(
            &self,
            _pac_text: &str,
            _local_ip: &str,
            _url: &str,
            _host: &str,
        ) -> Result<PacVerdict, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.verdict.clone())
        }
    }

    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<[u8; 20], String>>,
    }

    impl DecisionCache for MapCache {
        fn get(&self, key: &[u8; 20]) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        fn put(&self, key: [u8; 20], value: String) {
            self.entries.lock().unwrap().insert(key, value);
        }
    }

    fn detected_state() -> Arc<ProxyStateService> {
        Arc::new(ProxyStateService::new(ProxyState::with_pac(
            "function FindProxyForURL(url, host) { return \"DIRECT\"; }".into(),
            "10.1.2.3".into(),
            vec![],
        )))
    }

    fn use_case(
        state: Arc<ProxyStateService>,
        engine: Arc<ScriptedEvaluator>,
        cache: Arc<MapCache>,
    ) -> ResolveUpstreamUseCase {
        ResolveUpstreamUseCase::new(state, engine, cache)
    }

    #[tokio::test]
    async fn undetected_state_goes_direct_without_evaluation() {
        let state = Arc::new(ProxyStateService::new(ProxyState::without_pac(
            "10.1.2.3".into(),
            vec![],
        )));
        let engine = ScriptedEvaluator::returning("PROXY p:3128", true);
        let uc = use_case(state, engine.clone(), Arc::new(MapCache::default()));

        assert_eq!(uc.execute("http://example.com/").await, Decision::Direct);
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn second_identical_request_hits_the_cache() {
        let engine = ScriptedEvaluator::returning("PROXY p.example:3128", true);
        let uc = use_case(detected_state(), engine.clone(), Arc::new(MapCache::default()));

        let first = uc.execute("http://example.com/a").await;
        let second = uc.execute("http://example.com/a").await;

        assert_eq!(first, Decision::Proxy("p.example:3128".into()));
        assert_eq!(second, first);
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn time_sensitive_results_are_never_stored() {
        let engine = ScriptedEvaluator::returning("DIRECT", false);
        let cache = Arc::new(MapCache::default());
        let uc = use_case(detected_state(), engine.clone(), cache.clone());

        assert_eq!(uc.execute("http://example.com/").await, Decision::Direct);
        assert_eq!(uc.execute("http://example.com/").await, Decision::Direct);

        assert_eq!(engine.calls(), 2);
        assert!(cache.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unrecognized_results_fall_back_to_direct() {
        let engine = ScriptedEvaluator::returning("SOCKS 10.0.0.1:1080", true);
        let cache = Arc::new(MapCache::default());
        let uc = use_case(detected_state(), engine.clone(), cache.clone());

        assert_eq!(uc.execute("http://example.com/").await, Decision::Direct);
        assert!(cache.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn canonicalization_of_connect_targets() {
        assert_eq!(
            canonicalize_url("example.com:443"),
            ("https://example.com:443".to_string(), "example.com".to_string())
        );
        assert_eq!(
            canonicalize_url("example.com:8080"),
            ("http://example.com:8080".to_string(), "example.com".to_string())
        );
        assert_eq!(
            canonicalize_url("example.com"),
            ("https://example.com".to_string(), "example.com".to_string())
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        let (canonical, host) = canonicalize_url("http://example.com:8080/path?q=1");
        assert_eq!(canonical, "http://example.com:8080/path?q=1");
        assert_eq!(host, "example.com");
    }

    #[test]
    fn cache_keys_are_deterministic_and_ip_scoped() {
        let a = decision_key("10.0.0.1", "http://example.com/");
        let b = decision_key("10.0.0.1", "http://example.com/");
        let c = decision_key("10.0.0.2", "http://example.com/");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
