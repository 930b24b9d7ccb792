pub mod proxy;
pub mod web;

pub use proxy::start_proxy_server;
pub use web::start_management_server;
