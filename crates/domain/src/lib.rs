//! WPAD Proxy Domain Layer
pub mod config;
pub mod decision;
pub mod errors;
pub mod ip;
pub mod resolv;
pub mod state;
pub mod wallclock;

pub use config::{CliOverrides, Config, ConfigError};
pub use decision::Decision;
pub use errors::DomainError;
pub use resolv::ResolvConf;
pub use state::ProxyState;
