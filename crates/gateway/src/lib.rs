//! HTTP gateway for Padhai.
//!
//! Serves the JSON tutoring API, a health check, and the embedded
//! single-page UI. Built on Axum.

pub mod api;
pub mod frontend;
pub mod sessions;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, Method, header};
use axum::{Router, response::Json, routing::get};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use padhai_agent::Orchestrator;
use padhai_config::AppConfig;

pub use sessions::SessionRegistry;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: Arc<Orchestrator>,
    pub sessions: SessionRegistry,
    pub config: AppConfig,
}

impl GatewayState {
    pub fn new(orchestrator: Arc<Orchestrator>, config: AppConfig) -> Self {
        Self {
            sessions: SessionRegistry::new(
                config.agents.max_sessions,
                config.agents.session_turn_limit,
            ),
            orchestrator,
            config,
        }
    }
}

pub type SharedState = Arc<GatewayState>;

/// Build the full router: API, health, and embedded UI.
///
/// Layers applied:
/// - Request body size limit (`gateway.max_body_bytes`)
/// - CORS from `gateway.allowed_origins` (any origin when empty)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.gateway.allowed_origins);
    let body_limit = state.config.gateway.max_body_bytes;

    Router::new()
        .route("/health", get(health_handler))
        .with_state(state.clone())
        .merge(api::api_router(state))
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Start the gateway HTTP server.
///
/// Builds the provider and the store once from `config` and shares them
/// through the orchestrator.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = padhai_providers::build_from_config(&config)?;
    let store = padhai_store::open_from_config(&config.store).await?;
    info!(
        provider = provider.name(),
        store = store.name(),
        model = %config.default_model,
        "Gateway subsystems ready"
    );

    let orchestrator = Orchestrator::from_config(provider, store, &config)?;
    let state = Arc::new(GatewayState::new(Arc::new(orchestrator), config));
    let app = build_router(state);

    info!(addr = %addr, "Gateway listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    store: String,
    students: Option<usize>,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let store = state.orchestrator.store();
    let students = match store.count().await {
        Ok(n) => Some(n),
        Err(e) => {
            warn!(error = %e, "Store count failed during health check");
            None
        }
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: store.name().to_string(),
        students,
    })
}
