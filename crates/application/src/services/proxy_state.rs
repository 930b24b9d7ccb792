use arc_swap::ArcSwap;
use std::sync::Arc;
use wpadproxy_domain::ProxyState;

/// Shared handle to the current [`ProxyState`].
///
/// Readers take a snapshot; refresh swaps the whole state atomically, so a
/// reader observes either all pre-refresh fields or all post-refresh fields,
/// never a mix.
pub struct ProxyStateService {
    current: ArcSwap<ProxyState>,
}

impl ProxyStateService {
    pub fn new(initial: ProxyState) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    pub fn snapshot(&self) -> Arc<ProxyState> {
        self.current.load_full()
    }

    pub fn replace(&self, next: ProxyState) {
        self.current.store(Arc::new(next));
    }
}
