use anyhow::Context as _;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use wpadproxy_infrastructure::proxy::ProxyHandler;

/// Accept loop of the forward proxy. Each connection is served with HTTP/1.1
/// and upgrade support, since CONNECT tunnels take over the raw socket.
pub async fn start_proxy_server(
    bind_addr: String,
    handler: Arc<ProxyHandler>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind proxy listener on {bind_addr}"))?;
    info!(bind_address = %bind_addr, "Proxy server ready");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Accept failed");
                continue;
            }
        };
        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let handler = Arc::clone(&handler);
                async move { handler.handle(req, peer).await }
            });
            if let Err(e) = http1::Builder::new()
                .serve_connection(io, service)
                .with_upgrades()
                .await
            {
                debug!(peer = %peer, error = %e, "Connection closed with error");
            }
        });
    }
}
