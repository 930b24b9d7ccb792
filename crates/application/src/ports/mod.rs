pub mod decision_cache;
pub mod host_resolver;
pub mod outbound_network;
pub mod pac_evaluator;
pub mod wpad_client;

pub use decision_cache::DecisionCache;
pub use host_resolver::HostResolver;
pub use outbound_network::OutboundNetwork;
pub use pac_evaluator::{PacEvaluator, PacVerdict};
pub use wpad_client::WpadClient;
