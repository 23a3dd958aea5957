use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    price_api_base_url: String,
    price_api_timeout_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub price_api: HealthCheck,
    pub checked_at: String,
}

pub fn router(price_api_base_url: String, price_api_timeout_ms: u64) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(HealthState { price_api_base_url, price_api_timeout_ms })
}

/// Liveness only; the upstream is reported as configured, never probed.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "cryptoprice-server accepting skill requests".to_string(),
        },
        price_api: HealthCheck {
            status: "configured",
            detail: format!(
                "{} (timeout {}ms)",
                state.price_api_base_url, state.price_api_timeout_ms
            ),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}
