//! Configuration and status HTTP interface
//!
//! Every `/api` route is gated by an optional shared secret passed as the
//! `pw` query parameter.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::config::{load_config, save_config, Config};
use crate::notifier::Notifier;
use crate::pool_client::PoolClient;
use crate::status::broadcast_status;

pub const DEFAULT_PORT: u16 = 3456;

/// Server application state
#[derive(Clone)]
pub struct ServerState {
    pub config_path: PathBuf,
    pub admin_password: Arc<str>,
    pub pool: PoolClient,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Debug, Default, Deserialize)]
struct Auth {
    #[serde(default)]
    pw: String,
}

/// An empty expected secret leaves the interface open
pub fn check_password(expected: &str, supplied: &str) -> bool {
    expected.is_empty() || expected == supplied
}

fn authorize(state: &ServerState, auth: &Auth) -> Result<(), Response> {
    if check_password(&state.admin_password, &auth.pw) {
        Ok(())
    } else {
        tracing::debug!("Rejected request with invalid password");
        Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "invalid password"})),
        )
            .into_response())
    }
}

/// Build the axum router
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/api/config", get(get_config_handler).put(put_config_handler))
        .route("/api/status", post(status_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn get_config_handler(
    State(state): State<ServerState>,
    Query(auth): Query<Auth>,
) -> Response {
    if let Err(rejection) = authorize(&state, &auth) {
        return rejection;
    }
    Json(load_config(&state.config_path)).into_response()
}

async fn put_config_handler(
    State(state): State<ServerState>,
    Query(auth): Query<Auth>,
    Json(config): Json<Config>,
) -> Response {
    if let Err(rejection) = authorize(&state, &auth) {
        return rejection;
    }

    let config = config.normalized();

    match save_config(&state.config_path, &config) {
        Ok(()) => {
            tracing::info!("Configuration updated");
            Json(config).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to save configuration: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn status_handler(State(state): State<ServerState>, Query(auth): Query<Auth>) -> Response {
    if let Err(rejection) = authorize(&state, &auth) {
        return rejection;
    }

    let config = load_config(&state.config_path);
    let (chains, delivery) = broadcast_status(&config, &state.pool, state.notifier.as_ref()).await;

    match delivery {
        Ok(delivery) => Json(serde_json::json!({
            "delivery": delivery,
            "chains": chains,
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!("Status broadcast failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "chains": chains,
                })),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
