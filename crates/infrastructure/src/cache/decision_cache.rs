use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use tracing::trace;
use wpadproxy_application::ports::DecisionCache;

/// Shared, multi-threaded PAC decision cache.
///
/// Plain digest → decision table with no eviction: entries are immutable for
/// the process lifetime and the working set is bounded by the set of visited
/// (local IP, URL) pairs. Concurrent inserts of one key resolve
/// last-writer-wins, which is harmless because both writers computed the same
/// decision.
pub struct InMemoryDecisionCache {
    inner: DashMap<[u8; 20], String, FxBuildHasher>,
}

impl InMemoryDecisionCache {
    pub fn new() -> Self {
        Self {
            inner: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for InMemoryDecisionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionCache for InMemoryDecisionCache {
    fn get(&self, key: &[u8; 20]) -> Option<String> {
        let value = self.inner.get(key).map(|entry| entry.value().clone());
        trace!(hit = value.is_some(), "Decision cache lookup");
        value
    }

    fn put(&self, key: [u8; 20], value: String) {
        self.inner.insert(key, value);
    }
}
