use crate::errors::DomainError;
use std::fmt;

/// Routing decision for one request, parsed from a PAC result string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Direct,
    Proxy(String),
}

impl Decision {
    /// Parse the first `;`-separated directive of a PAC result.
    ///
    /// Only `DIRECT` and `PROXY host:port` are honored; anything else is an
    /// error and callers fall back to going direct.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let first = raw.split(';').next().unwrap_or("").trim();
        if first == "DIRECT" {
            return Ok(Decision::Direct);
        }
        let mut parts = first.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some("PROXY"), Some(target), None) => Ok(Decision::Proxy(target.to_string())),
            _ => Err(DomainError::UnrecognizedDirective(raw.to_string())),
        }
    }

    /// Rebuild a decision from its cached representation.
    pub fn from_cached(stored: &str) -> Self {
        if stored == "DIRECT" {
            Decision::Direct
        } else {
            Decision::Proxy(stored.to_string())
        }
    }

    /// The string stored in the decision cache: `DIRECT` or `host:port`.
    pub fn cached_repr(&self) -> &str {
        match self {
            Decision::Direct => "DIRECT",
            Decision::Proxy(target) => target,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Direct => write!(f, "DIRECT"),
            Decision::Proxy(target) => write!(f, "PROXY {target}"),
        }
    }
}
