//! # Screener API Server
//!
//! REST API for the OFAC crypto wallet screener.
//!
//! ## Endpoints
//!
//! - `GET /check?address=WALLET` - Check a wallet address against the SDN list
//! - `GET /status` - See how many addresses are loaded and when
//! - `POST /refresh` - Manually force a list refresh (runs in background)
//! - `GET /` - Endpoint guide
//! - `GET /health` - Liveness probe
//!
//! All data endpoints accept an optional `X-Api-Key` header; when the
//! `API_KEY` environment variable is set, the header becomes mandatory.
//!
//! ## Example
//!
//! ```rust,ignore
//! use screener_api::{ApiServer, ApiConfig};
//!
//! let server = ApiServer::new(ApiConfig::from_env());
//! let refresh_loop = server.state().start_background_refresh();
//! server.run(([0, 0, 0, 0], 8000)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod auth;
mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for the screener.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
        }
    }

    /// The shared application state (store, coordinator, config).
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Creates the router with all routes and middleware configured.
    ///
    /// CORS is wide open so browser and no-code callers can hit the API
    /// from any domain.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("Screener API server listening on {}", addr);

        axum::serve(listener, self.router()).await
    }
}
