use crate::{dto::StatusResponse, state::AppState};
use axum::{extract::State, Json};
use tracing::{debug, instrument};

#[instrument(skip(state), name = "mgmt_get_status")]
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snapshot = state.proxy_state.snapshot();
    debug!(
        detected = snapshot.detected,
        local_ip = %snapshot.local_ip,
        "Status requested"
    );
    Json(StatusResponse::from(snapshot.as_ref()))
}
