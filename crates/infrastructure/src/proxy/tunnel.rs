use super::handler::{empty_body, plain_response, ProxyBody, ProxyHandler};
use hyper::body::Incoming;
use hyper::upgrade::Upgraded;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};
use wpadproxy_domain::Decision;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REPLY_HEAD: usize = 8 * 1024;

/// Handle a CONNECT request: decide the upstream, establish the outer leg
/// (directly or by asking a parent proxy for a nested tunnel), answer 200 and
/// splice the two byte streams together.
pub(super) async fn handle_connect(
    handler: &Arc<ProxyHandler>,
    req: Request<Incoming>,
    started: Instant,
) -> Response<ProxyBody> {
    let Some(authority) = req.uri().authority().map(|a| a.to_string()) else {
        return plain_response(StatusCode::BAD_REQUEST, "CONNECT target missing");
    };

    let decision = handler.resolve.execute(&authority).await;
    let upstream_label = match &decision {
        Decision::Proxy(parent) => parent.clone(),
        Decision::Direct => authority.clone(),
    };

    let dial_started = Instant::now();
    let dialed = match &decision {
        Decision::Proxy(parent) => connect_via_parent(parent, &authority).await,
        Decision::Direct => dial_direct(&authority).await,
    };
    let upstream = match dialed {
        Ok(stream) => {
            handler
                .metrics
                .tunnel_connect_seconds
                .with_label_values(&[&upstream_label])
                .observe(dial_started.elapsed().as_secs_f64());
            stream
        }
        Err(e) => {
            warn!(authority = %authority, decision = %decision, error = %e, "Tunnel establishment failed");
            return plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    };

    debug!(authority = %authority, decision = %decision, "Tunnel established");

    let handler = Arc::clone(handler);
    tokio::spawn(async move {
        match hyper::upgrade::on(req).await {
            Ok(upgraded) => bridge(upgraded, upstream, &handler, &upstream_label, started).await,
            Err(e) => debug!(error = %e, "Client connection was not upgraded"),
        }
    });

    Response::new(empty_body())
}

async fn dial_direct(authority: &str) -> io::Result<TcpStream> {
    match timeout(CONNECT_TIMEOUT, TcpStream::connect(authority)).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("connect to {authority} timed out"),
        )),
    }
}

/// Dial the parent proxy and ask it for a nested tunnel to `target`.
async fn connect_via_parent(parent: &str, target: &str) -> io::Result<TcpStream> {
    let mut stream = dial_direct(parent).await?;
    stream
        .write_all(format!("CONNECT {target} HTTP/1.1\r\n\r\n").as_bytes())
        .await?;

    let head = read_reply_head(&mut stream).await?;
    let status = parse_connect_status(&head)
        .ok_or_else(|| io::Error::other("parent proxy sent an invalid CONNECT reply"))?;
    if !(200..300).contains(&status) {
        return Err(io::Error::other(format!(
            "parent proxy refused the tunnel with status {status}"
        )));
    }
    Ok(stream)
}

/// Read the parent's reply up to the blank line, one byte at a time so no
/// tunnel payload is consumed along with the head.
async fn read_reply_head(stream: &mut TcpStream) -> io::Result<String> {
    let mut head: Vec<u8> = Vec::with_capacity(128);
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        if head.len() >= MAX_REPLY_HEAD {
            return Err(io::Error::other("parent proxy reply head too large"));
        }
        let n = stream.read(&mut byte).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "parent proxy closed during CONNECT",
            ));
        }
        head.push(byte[0]);
    }
    Ok(String::from_utf8_lossy(&head).into_owned())
}

/// Parse `HTTP/1.x <code> <message>` out of the first reply line.
fn parse_connect_status(head: &str) -> Option<u16> {
    let line = head.lines().next()?;
    let mut parts = line.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/1.") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Copy bytes in both directions until either side closes; socket closure is
/// the only cancellation signal a tunnel has.
async fn bridge(
    upgraded: Upgraded,
    mut upstream: TcpStream,
    handler: &Arc<ProxyHandler>,
    label: &str,
    started: Instant,
) {
    let mut client = TokioIo::new(upgraded);
    match tokio::io::copy_bidirectional(&mut client, &mut upstream).await {
        Ok((from_client, from_upstream)) => {
            handler.metrics.served_bytes.add(from_upstream as i64);
            debug!(upstream = label, from_client, from_upstream, "Tunnel closed");
        }
        Err(e) => debug!(upstream = label, error = %e, "Tunnel closed with error"),
    }
    handler
        .metrics
        .serve_seconds
        .with_label_values(&[label])
        .observe(started.elapsed().as_secs_f64());
}
