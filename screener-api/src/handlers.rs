//! API route handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use tracing::info;

use screener_core::error::ScreenerError;

use crate::auth::verify_api_key;
use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET / - quick guide to the available endpoints.
pub async fn service_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "OFAC Crypto Wallet Screener",
        "endpoints": {
            "check a wallet": "GET /check?address=YOUR_WALLET_ADDRESS",
            "view status":    "GET /status",
            "force refresh":  "POST /refresh",
        },
        "note": "Pass X-Api-Key header if you configured an API_KEY environment variable.",
    }))
}

/// GET /check?address=...
pub async fn check_wallet(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CheckQuery>,
) -> Result<Json<CheckResponse>> {
    verify_api_key(&state.config, &headers)?;

    let address = query.address.unwrap_or_default();
    let address = address.trim();
    if address.is_empty() {
        return Err(ApiError::bad_request(
            "The 'address' query parameter is required.",
        ));
    }

    match state.lookup.check(address) {
        Ok(result) => {
            let view = state.store.read();
            Ok(Json(CheckResponse {
                address: address.to_string(),
                is_sanctioned: result.is_sanctioned,
                record: result.record,
                list_last_updated: view.last_updated,
                total_addresses_in_list: view.snapshot.len(),
            }))
        }
        Err(ScreenerError::NotReady) => {
            let message = if state.store.read().refresh_in_progress {
                "Sanctions list is still loading - please wait ~1 minute and try again."
            } else {
                "Sanctions list has not loaded yet. Please try again shortly."
            };
            Err(ApiError::service_unavailable(message))
        }
        Err(e) => Err(ApiError::from(e)),
    }
}

/// GET /status
pub async fn status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>> {
    verify_api_key(&state.config, &headers)?;

    let report = state.coordinator.status();
    Ok(Json(StatusResponse {
        status: report.state,
        total_sanctioned_addresses: report.total_addresses,
        last_updated: report.last_updated,
        error: report.error,
        auto_refresh_every_hours: report.refresh_interval_hours,
    }))
}

/// POST /refresh - force a list refresh, running in the background.
pub async fn manual_refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>> {
    verify_api_key(&state.config, &headers)?;

    let outcome = state.coordinator.trigger();
    let message = if outcome.already_in_progress {
        "Already refreshing. Check /status for progress."
    } else {
        info!("Manual refresh triggered");
        "Refresh started. Check /status in 1-2 minutes."
    };

    Ok(Json(RefreshResponse {
        already_in_progress: outcome.already_in_progress,
        message: message.into(),
    }))
}

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(Instant::now);

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: start.elapsed().as_secs(),
        total_addresses: state.store.read().snapshot.len(),
    })
}
