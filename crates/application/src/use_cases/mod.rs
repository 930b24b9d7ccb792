pub mod refresh_state;
pub mod resolve_upstream;

pub use refresh_state::RefreshStateUseCase;
pub use resolve_upstream::{canonicalize_url, decision_key, ResolveUpstreamUseCase};
