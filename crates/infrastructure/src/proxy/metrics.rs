use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntGauge, Registry, TextEncoder,
};
use tracing::error;

/// Prometheus surface of the pipeline and the PAC engine.
///
/// Latency histograms are labeled with the upstream target so parent-proxy
/// and direct egress can be told apart on the scrape side.
pub struct ProxyMetrics {
    registry: Registry,
    pub requests_total: IntCounter,
    pub served_bytes: IntGauge,
    pub tunnel_connect_seconds: HistogramVec,
    pub upstream_http_seconds: HistogramVec,
    pub serve_seconds: HistogramVec,
    pub pac_executions_total: IntCounter,
    pub pac_execution_seconds: Histogram,
}

impl ProxyMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total =
            IntCounter::new("proxy_requests_total", "Client requests handled")?;
        let served_bytes =
            IntGauge::new("proxy_served_bytes", "Bytes relayed back to clients")?;
        let tunnel_connect_seconds = HistogramVec::new(
            HistogramOpts::new(
                "proxy_tunnel_connect_seconds",
                "Upstream tunnel establishment latency",
            ),
            &["upstream"],
        )?;
        let upstream_http_seconds = HistogramVec::new(
            HistogramOpts::new(
                "proxy_upstream_http_seconds",
                "Upstream HTTP round-trip latency",
            ),
            &["upstream"],
        )?;
        let serve_seconds = HistogramVec::new(
            HistogramOpts::new("proxy_serve_seconds", "Total request serve time"),
            &["upstream"],
        )?;
        let pac_executions_total =
            IntCounter::new("pac_executions_total", "PAC script evaluations")?;
        let pac_execution_seconds = Histogram::with_opts(HistogramOpts::new(
            "pac_execution_seconds",
            "PAC script evaluation time",
        ))?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(served_bytes.clone()))?;
        registry.register(Box::new(tunnel_connect_seconds.clone()))?;
        registry.register(Box::new(upstream_http_seconds.clone()))?;
        registry.register(Box::new(serve_seconds.clone()))?;
        registry.register(Box::new(pac_executions_total.clone()))?;
        registry.register(Box::new(pac_execution_seconds.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            served_bytes,
            tunnel_connect_seconds,
            upstream_http_seconds,
            serve_seconds,
            pac_executions_total,
            pac_execution_seconds,
        })
    }

    /// Text exposition for the management `/metrics` endpoint.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            error!(error = %e, "Metrics encoding failed");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_exposition_carries_counters_and_labels() {
        let metrics = ProxyMetrics::new().unwrap();
        metrics.requests_total.inc();
        metrics.served_bytes.add(1024);
        metrics
            .tunnel_connect_seconds
            .with_label_values(&["p.example:3128"])
            .observe(0.05);
        metrics.pac_executions_total.inc();

        let text = metrics.render();
        assert!(text.contains("proxy_requests_total 1"));
        assert!(text.contains("proxy_served_bytes 1024"));
        assert!(text.contains("upstream=\"p.example:3128\""));
        assert!(text.contains("pac_executions_total 1"));
    }
}
