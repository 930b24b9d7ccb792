//! WPAD Proxy management API
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_management_routes;
pub use state::AppState;
