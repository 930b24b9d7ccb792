use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid netmask: {0}")]
    InvalidNetmask(String),

    #[error("PAC evaluation failed: {0}")]
    PacEvaluationFailed(String),

    #[error("Unrecognized PAC directive: {0}")]
    UnrecognizedDirective(String),

    #[error("WPAD discovery failed: {0}")]
    WpadDiscoveryFailed(String),

    #[error("Resolver unavailable: {0}")]
    ResolverUnavailable(String),

    #[error("Outbound address discovery failed: {0}")]
    OutboundAddressFailed(String),

    #[error("I/O error: {0}")]
    IoError(String),
}
