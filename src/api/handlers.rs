use axum::Json;
use axum::extract::State;

use super::models::HealthResponse;
use super::state::SharedState;

// =========================================================================
// Health
// =========================================================================

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    let connections = state.hub.connection_count().await;
    let objects = state.hub.objects().await.len();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "relay-hub".to_string(),
        uptime,
        connections,
        objects,
    })
}

// =========================================================================
// Tests
// =========================================================================
