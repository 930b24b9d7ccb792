use super::metrics::ProxyMetrics;
use super::{forward, tunnel};
use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use wpadproxy_application::use_cases::ResolveUpstreamUseCase;

pub type ProxyBody = UnsyncBoxBody<Bytes, std::io::Error>;

/// Entry point for every client request: CONNECT requests become opaque
/// tunnels, everything else is forwarded as plain HTTP with the PAC decision
/// applied as the egress proxy.
pub struct ProxyHandler {
    pub(super) resolve: Arc<ResolveUpstreamUseCase>,
    pub(super) metrics: Arc<ProxyMetrics>,
}

impl ProxyHandler {
    pub fn new(resolve: Arc<ResolveUpstreamUseCase>, metrics: Arc<ProxyMetrics>) -> Self {
        Self { resolve, metrics }
    }

    pub async fn handle(
        self: Arc<Self>,
        req: Request<Incoming>,
        peer: SocketAddr,
    ) -> Result<Response<ProxyBody>, Infallible> {
        self.metrics.requests_total.inc();
        debug!(method = %req.method(), uri = %req.uri(), peer = %peer, "Request received");

        let started = Instant::now();
        let response = if req.method() == Method::CONNECT {
            tunnel::handle_connect(&self, req, started).await
        } else {
            forward::handle_forward(&self, req, peer, started).await
        };
        Ok(response)
    }
}

pub(super) fn full_body(message: &str) -> ProxyBody {
    Full::new(Bytes::copy_from_slice(message.as_bytes()))
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub(super) fn empty_body() -> ProxyBody {
    Empty::new().map_err(|never| match never {}).boxed_unsync()
}

pub(super) fn plain_response(status: StatusCode, message: &str) -> Response<ProxyBody> {
    Response::builder()
        .status(status)
        .body(full_body(message))
        .unwrap_or_else(|_| Response::new(full_body(message)))
}
