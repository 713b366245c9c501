//! `ArborServer` — Axum HTTP server.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::debug;

use arbor_rpc::context::{RequestScope, RpcContext};
use arbor_rpc::registry::MethodRegistry;
use arbor_rpc::types::{RpcRequest, RpcResponse};

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::shutdown::ShutdownCoordinator;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// RPC method registry.
    pub registry: Arc<MethodRegistry>,
    /// Shared RPC context (pool + settings).
    pub ctx: Arc<RpcContext>,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// When the server started.
    pub start_time: Instant,
}

/// The main arbor server.
pub struct ArborServer {
    config: ServerConfig,
    registry: Arc<MethodRegistry>,
    ctx: Arc<RpcContext>,
    shutdown: Arc<ShutdownCoordinator>,
    start_time: Instant,
}

impl ArborServer {
    /// Create a new server.
    pub fn new(config: ServerConfig, registry: MethodRegistry, ctx: RpcContext) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
            ctx: Arc::new(ctx),
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            registry: self.registry.clone(),
            ctx: self.ctx.clone(),
            shutdown: self.shutdown.clone(),
            start_time: self.start_time,
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/rpc", post(rpc_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(state.start_time))
}

/// POST /rpc
///
/// The bearer token, when present and valid, becomes the request scope's
/// claims; handlers that need an authenticated user reject the rest.
async fn rpc_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RpcRequest>,
) -> Json<RpcResponse> {
    let scope = scope_from_headers(&headers, &state.ctx);
    let response = state.registry.dispatch(request, &scope, &state.ctx).await;
    Json(response)
}

fn scope_from_headers(headers: &HeaderMap, ctx: &RpcContext) -> RequestScope {
    let Some(token) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    else {
        return RequestScope::anonymous();
    };

    match arbor_auth::verify_token(token, &ctx.settings.auth) {
        Ok(claims) => RequestScope::authenticated(claims),
        Err(e) => {
            debug!("rejecting bearer token: {e}");
            RequestScope::anonymous()
        }
    }
}
