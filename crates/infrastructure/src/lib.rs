//! WPAD Proxy Infrastructure Layer
pub mod cache;
pub mod dns;
pub mod pac;
pub mod proxy;
pub mod system;
pub mod wpad;
