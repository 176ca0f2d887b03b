//! notes-api - HTTP API server for the notes AI assistant
//!
//! Exposes chat and note analysis over axum. The binary in `main.rs` only
//! loads configuration and logging; everything routable lives here so tests
//! can drive the full router with a mock gateway.

pub mod error;
pub mod handlers;
pub mod services;
pub mod state;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use uuid::Uuid;

pub use error::ApiError;
pub use state::AppState;

use handlers::{ai, health};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notes AI Assistant API",
        description = "Multi-turn chat and note analysis backed by a hosted chat-completion model"
    ),
    paths(
        ai::chat,
        ai::analyze_note,
        ai::summarize,
        ai::suggest_categories,
        ai::suggest_tags,
        ai::explain_code,
        ai::optimize,
        ai::generate_outline,
        ai::find_errors,
        ai::related_topics,
        ai::clear_session,
        ai::status,
        ai::test_connection,
        health::health_check,
    ),
    components(schemas(
        notes_core::ChatRequest,
        notes_core::ChatExchange,
        notes_core::ChatTurn,
        notes_core::Role,
        notes_core::ModelParams,
        notes_core::TokenUsage,
        notes_core::AnalysisKind,
        notes_core::AnalysisRequest,
        notes_core::AnalysisResult,
        ai::ContentBody,
        ai::ClearSessionResponse,
        ai::AiStatusResponse,
    )),
    tags(
        (name = "AI", description = "Chat and note analysis"),
        (name = "System", description = "Health and metadata"),
    )
)]
pub struct ApiDoc;

// =============================================================================
// ROUTER
// =============================================================================

/// HTTP server settings read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub allowed_origins: Vec<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: notes_core::defaults::SERVER_HOST.to_string(),
            port: notes_core::defaults::SERVER_PORT,
            max_body_bytes: notes_core::defaults::MAX_BODY_BYTES,
            allowed_origins: default_origins(),
        }
    }
}

impl ServerConfig {
    /// Load from `HOST`, `PORT`, `MAX_BODY_BYTES` and `ALLOWED_ORIGINS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .map(|v| parse_allowed_origins(&v))
                .unwrap_or(defaults.allowed_origins),
        }
    }
}

fn default_origins() -> Vec<HeaderValue> {
    vec![
        HeaderValue::from_static("http://localhost:5173"),
        HeaderValue::from_static("http://localhost:3000"),
    ]
}

/// Parse a comma-separated origin list, skipping invalid entries.
///
/// An empty list falls back to the local development origins.
pub fn parse_allowed_origins(origins_str: &str) -> Vec<HeaderValue> {
    if origins_str.trim().is_empty() {
        return default_origins();
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

/// Build the full application router with middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/openapi.json", get(health::openapi_json))
        .route("/api/ai/chat", post(ai::chat))
        .route("/api/ai/analyze-note", post(ai::analyze_note))
        .route("/api/ai/summarize", post(ai::summarize))
        .route("/api/ai/suggest-categories", post(ai::suggest_categories))
        .route("/api/ai/suggest-tags", post(ai::suggest_tags))
        .route("/api/ai/explain-code", post(ai::explain_code))
        .route("/api/ai/optimize", post(ai::optimize))
        .route("/api/ai/generate-outline", post(ai::generate_outline))
        .route("/api/ai/find-errors", post(ai::find_errors))
        .route("/api/ai/related-topics", post(ai::related_topics))
        .route("/api/ai/session/:session_id", delete(ai::clear_session))
        .route("/api/ai/status", get(ai::status))
        .route("/api/ai/test", post(ai::test_connection))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(state)
}
