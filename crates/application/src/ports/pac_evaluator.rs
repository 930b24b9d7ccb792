use async_trait::async_trait;
use wpadproxy_domain::DomainError;

/// Outcome of one PAC evaluation.
#[derive(Debug, Clone)]
pub struct PacVerdict {
    /// Raw return value of `FindProxyForURL` (a `;`-separated directive list).
    pub raw: String,

    /// False iff the evaluation consulted `dateRange`, `timeRange` or
    /// `weekdayRange`. Such results hold only for the current instant and
    /// must not be memoized.
    pub cacheable: bool,
}

#[async_trait]
pub trait PacEvaluator: Send + Sync {
    /// Run `FindProxyForURL(url, host)` against `pac_text`, with `local_ip`
    /// bound to `myIpAddress()`. A script or runtime error is fatal to the
    /// evaluation; callers fall back to DIRECT.
    async fn evaluate(
        &self,
        pac_text: &str,
        local_ip: &str,
        url: &str,
        host: &str,
    ) -> Result<PacVerdict, DomainError>;
}
