pub mod decision_cache;

pub use decision_cache::InMemoryDecisionCache;
