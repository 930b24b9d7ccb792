use anyhow::Context as _;
use tokio::net::TcpListener;
use tracing::info;
use wpadproxy_api::{create_management_routes, AppState};

pub async fn start_management_server(bind_addr: String, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind management listener on {bind_addr}"))?;
    info!(bind_address = %bind_addr, "Management server ready");

    axum::serve(listener, create_management_routes(state)).await?;
    Ok(())
}
