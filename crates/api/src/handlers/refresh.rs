use crate::{dto::RefreshResponse, state::AppState};
use axum::{extract::State, Json};
use tracing::{info, instrument};

/// Re-discover the outbound IP and the WPAD script, swapping the proxy state
/// atomically.
#[instrument(skip(state), name = "mgmt_refresh")]
pub async fn refresh(State(state): State<AppState>) -> Json<RefreshResponse> {
    let snapshot = state.refresh.execute().await;
    info!(
        detected = snapshot.detected,
        local_ip = %snapshot.local_ip,
        "State refreshed"
    );
    Json(RefreshResponse::ok())
}
