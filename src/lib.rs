pub mod config;
pub mod handler;
pub mod services;
pub mod types;

pub use config::Config;

use self::config::load_config;
use self::types::{HandlerOutcome, SnsEnvelope};

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http: reqwest::Client,
    pub stats: Arc<Stats>,
}

#[derive(Debug, Default)]
pub struct Stats {
    pub received: AtomicU64,
    pub dispatched: AtomicU64,
    pub skipped: AtomicU64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub received: u64,
    pub dispatched: u64,
    pub skipped: u64,
}

pub fn create_app() -> Result<(AppState, Router), config::ConfigError> {
    let config = load_config()?;
    let state = AppState {
        config,
        http: reqwest::Client::new(),
        stats: Arc::new(Stats::default()),
    };
    let router = build_router(state.clone());
    Ok((state, router))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/inbound/sms", post(sms_inbound))
        .route("/v1/health", get(health))
        .route("/v1/status", get(status))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse {
        received: state.stats.received.load(Ordering::Relaxed),
        dispatched: state.stats.dispatched.load(Ordering::Relaxed),
        skipped: state.stats.skipped.load(Ordering::Relaxed),
    })
}

async fn sms_inbound(
    State(state): State<AppState>,
    Json(envelope): Json<SnsEnvelope>,
) -> impl IntoResponse {
    state.stats.received.fetch_add(1, Ordering::Relaxed);

    match handler::handle_envelope(&state, &envelope).await {
        Ok(HandlerOutcome::Dispatched { contact_id }) => {
            state.stats.dispatched.fetch_add(1, Ordering::Relaxed);
            Json(json!({"status": "dispatched", "contact_id": contact_id})).into_response()
        }
        Ok(HandlerOutcome::Skipped(reason)) => {
            state.stats.skipped.fetch_add(1, Ordering::Relaxed);
            Json(json!({"status": "skipped", "reason": reason})).into_response()
        }
        Err(err) => {
            error!("inbound sms error: {err:?}");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": err.to_string()})),
            )
                .into_response()
        }
    }
}
