use super::handler::{plain_response, ProxyBody, ProxyHandler};
use futures::TryStreamExt;
use http::header::{CONTENT_LENGTH, HOST};
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyDataStream, BodyExt, StreamBody};
use hyper::body::{Frame, Incoming};
use hyper::{Request, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use wpadproxy_domain::Decision;

/// Hop-by-hop headers, stripped in both directions (RFC 2616 §13).
const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Forward a plain HTTP/HTTPS request, applying the PAC decision as the
/// egress proxy of the outbound client. The upstream response is relayed
/// verbatim; redirects are not followed here.
pub(super) async fn handle_forward(
    handler: &Arc<ProxyHandler>,
    req: Request<Incoming>,
    peer: SocketAddr,
    started: Instant,
) -> Response<ProxyBody> {
    match req.uri().scheme_str() {
        Some("http") | Some("https") => {}
        _ => {
            return plain_response(StatusCode::BAD_REQUEST, "Protocol scheme not supported");
        }
    }

    let url = req.uri().to_string();
    let decision = handler.resolve.execute(&url).await;
    let upstream_label = match &decision {
        Decision::Proxy(parent) => parent.clone(),
        Decision::Direct => req.uri().host().unwrap_or("direct").to_string(),
    };

    let client = match outbound_client(&decision) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, decision = %decision, "Failed to build outbound client");
            return plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Server Error");
        }
    };

    let (parts, body) = req.into_parts();
    let mut headers = strip_hop_by_hop(&parts.headers);
    // The outbound client rebuilds the request line and re-frames the body.
    headers.remove(HOST);
    headers.remove(CONTENT_LENGTH);
    append_forwarded_for(&mut headers, peer);

    let upstream_started = Instant::now();
    let sent = client
        .request(parts.method, &url)
        .headers(headers)
        .body(reqwest::Body::wrap_stream(BodyDataStream::new(body)))
        .send()
        .await;

    let upstream_response = match sent {
        Ok(response) => {
            handler
                .metrics
                .upstream_http_seconds
                .with_label_values(&[&upstream_label])
                .observe(upstream_started.elapsed().as_secs_f64());
            response
        }
        Err(e) => {
            warn!(url = %url, decision = %decision, error = %e, "Upstream request failed");
            return plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Server Error");
        }
    };

    debug!(
        url = %url,
        status = %upstream_response.status(),
        decision = %decision,
        "Upstream responded"
    );

    let mut builder = Response::builder().status(upstream_response.status());
    if let Some(headers) = builder.headers_mut() {
        *headers = strip_hop_by_hop(upstream_response.headers());
        headers.remove(CONTENT_LENGTH);
    }

    let metrics = Arc::clone(&handler.metrics);
    let counted = upstream_response
        .bytes_stream()
        .map_ok(move |chunk| {
            metrics.served_bytes.add(chunk.len() as i64);
            Frame::data(chunk)
        })
        .map_err(std::io::Error::other);

    handler
        .metrics
        .serve_seconds
        .with_label_values(&[&upstream_label])
        .observe(started.elapsed().as_secs_f64());

    match builder.body(StreamBody::new(counted).boxed_unsync()) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Failed to assemble relayed response");
            plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Server Error")
        }
    }
}

/// Outbound client for one request: redirects off, egress proxy per decision.
fn outbound_client(decision: &Decision) -> reqwest::Result<reqwest::Client> {
    let builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
    match decision {
        Decision::Proxy(parent) => builder
            .proxy(reqwest::Proxy::all(format!("http://{parent}"))?)
            .build(),
        Decision::Direct => builder.no_proxy().build(),
    }
}

fn strip_hop_by_hop(src: &HeaderMap) -> HeaderMap {
    let mut dst = HeaderMap::with_capacity(src.len());
    for (name, value) in src {
        if HOP_BY_HOP_HEADERS.contains(&name.as_str()) {
            continue;
        }
        dst.append(name.clone(), value.clone());
    }
    dst
}

/// Fold any existing `X-Forwarded-For` values and the connecting client's IP
/// into a single comma-space-separated header.
fn append_forwarded_for(headers: &mut HeaderMap, peer: SocketAddr) {
    let mut chain: Vec<String> = headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_owned)
        .collect();
    chain.push(peer.ip().to_string());
    let folded = chain.join(", ");

    headers.remove(X_FORWARDED_FOR);
    if let Ok(value) = folded.parse() {
        headers.insert(X_FORWARDED_FOR, value);
    }
}
