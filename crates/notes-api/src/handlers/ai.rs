//! AI assistant HTTP handlers.
//!
//! Chat and analysis outcomes are always returned with status 200; callers
//! inspect `success`. Only undecodable bodies are rejected with 400.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use notes_core::{AnalysisRequest, AnalysisResult, ChatExchange, ChatRequest};

use crate::{ApiError, AppState};

/// Body for the single-kind analysis shortcuts.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContentBody {
    /// Note text or code snippet to analyze.
    pub content: String,
}

/// Response of a session clear.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearSessionResponse {
    pub success: bool,
    pub session_id: String,
}

/// Assistant status.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiStatusResponse {
    /// `运行中` when healthy, `异常` when the session store cannot be read.
    pub status: String,
    pub active_sessions: usize,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Send a chat message, continuing the session if `sessionId` is given.
#[utoipa::path(post, path = "/api/ai/chat", tag = "AI",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Chat outcome (check `success`)", body = ChatExchange),
        (status = 400, description = "Body could not be decoded"),
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatExchange>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.chat.chat(request).await))
}

/// Run one analysis kind named by `analysisType`.
#[utoipa::path(post, path = "/api/ai/analyze-note", tag = "AI",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Analysis outcome (check `success`)", body = AnalysisResult),
        (status = 400, description = "Body could not be decoded"),
    )
)]
pub async fn analyze_note(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.analysis.analyze(&request).await))
}

/// Summarize a note.
#[utoipa::path(post, path = "/api/ai/summarize", tag = "AI",
    request_body = ContentBody,
    responses(
        (status = 200, description = "Analysis outcome (check `success`)", body = AnalysisResult),
        (status = 400, description = "Missing `content`"),
    )
)]
pub async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<ContentBody>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(body) = payload?;
    Ok(Json(state.analysis.summarize(&body.content).await))
}

/// Suggest 3-5 categories.
#[utoipa::path(post, path = "/api/ai/suggest-categories", tag = "AI",
    request_body = ContentBody,
    responses(
        (status = 200, description = "Analysis outcome (check `success`)", body = AnalysisResult),
        (status = 400, description = "Missing `content`"),
    )
)]
pub async fn suggest_categories(
    State(state): State<AppState>,
    payload: Result<Json<ContentBody>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(body) = payload?;
    Ok(Json(state.analysis.suggest_categories(&body.content).await))
}

/// Suggest 5-10 tags.
#[utoipa::path(post, path = "/api/ai/suggest-tags", tag = "AI",
    request_body = ContentBody,
    responses(
        (status = 200, description = "Analysis outcome (check `success`)", body = AnalysisResult),
        (status = 400, description = "Missing `content`"),
    )
)]
pub async fn suggest_tags(
    State(state): State<AppState>,
    payload: Result<Json<ContentBody>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(body) = payload?;
    Ok(Json(state.analysis.suggest_tags(&body.content).await))
}

/// Explain a code snippet; the language is detected from the content.
#[utoipa::path(post, path = "/api/ai/explain-code", tag = "AI",
    request_body = ContentBody,
    responses(
        (status = 200, description = "Analysis outcome (check `success`)", body = AnalysisResult),
        (status = 400, description = "Missing `content`"),
    )
)]
pub async fn explain_code(
    State(state): State<AppState>,
    payload: Result<Json<ContentBody>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(body) = payload?;
    Ok(Json(state.analysis.explain_code(&body.content).await))
}

/// Rewrite a note for clarity.
#[utoipa::path(post, path = "/api/ai/optimize", tag = "AI",
    request_body = ContentBody,
    responses(
        (status = 200, description = "Analysis outcome (check `success`)", body = AnalysisResult),
        (status = 400, description = "Missing `content`"),
    )
)]
pub async fn optimize(
    State(state): State<AppState>,
    payload: Result<Json<ContentBody>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(body) = payload?;
    Ok(Json(state.analysis.optimize(&body.content).await))
}

/// Produce a section outline.
#[utoipa::path(post, path = "/api/ai/generate-outline", tag = "AI",
    request_body = ContentBody,
    responses(
        (status = 200, description = "Analysis outcome (check `success`)", body = AnalysisResult),
        (status = 400, description = "Missing `content`"),
    )
)]
pub async fn generate_outline(
    State(state): State<AppState>,
    payload: Result<Json<ContentBody>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(body) = payload?;
    Ok(Json(state.analysis.generate_outline(&body.content).await))
}

/// Point out mistakes or inaccuracies.
#[utoipa::path(post, path = "/api/ai/find-errors", tag = "AI",
    request_body = ContentBody,
    responses(
        (status = 200, description = "Analysis outcome (check `success`)", body = AnalysisResult),
        (status = 400, description = "Missing `content`"),
    )
)]
pub async fn find_errors(
    State(state): State<AppState>,
    payload: Result<Json<ContentBody>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(body) = payload?;
    Ok(Json(state.analysis.find_errors(&body.content).await))
}

/// Suggest 5-8 related topics.
#[utoipa::path(post, path = "/api/ai/related-topics", tag = "AI",
    request_body = ContentBody,
    responses(
        (status = 200, description = "Analysis outcome (check `success`)", body = AnalysisResult),
        (status = 400, description = "Missing `content`"),
    )
)]
pub async fn related_topics(
    State(state): State<AppState>,
    payload: Result<Json<ContentBody>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(body) = payload?;
    Ok(Json(state.analysis.related_topics(&body.content).await))
}

/// Forget a chat session. Clearing an unknown id succeeds.
#[utoipa::path(delete, path = "/api/ai/session/{session_id}", tag = "AI",
    params(("session_id" = String, Path, description = "Session to clear")),
    responses(
        (status = 200, description = "Session cleared", body = ClearSessionResponse),
    )
)]
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearSessionResponse>, ApiError> {
    state.chat.clear_session(&session_id).await?;
    Ok(Json(ClearSessionResponse {
        success: true,
        session_id,
    }))
}

#[utoipa::path(get, path = "/api/ai/status", tag = "AI",
    responses(
        (status = 200, description = "Assistant status", body = AiStatusResponse),
    )
)]
pub async fn status(State(state): State<AppState>) -> Json<AiStatusResponse> {
    let model = state.chat.model_name().to_string();
    let response = match state.chat.active_session_count().await {
        Ok(active_sessions) => {
            debug!(
                subsystem = "api",
                op = "status",
                session_count = active_sessions,
                "Status requested"
            );
            AiStatusResponse {
                status: "运行中".to_string(),
                active_sessions,
                model,
                error: None,
            }
        }
        Err(e) => {
            warn!(
                subsystem = "api",
                op = "status",
                error = %e,
                "Failed to count active sessions"
            );
            AiStatusResponse {
                status: "异常".to_string(),
                active_sessions: 0,
                model,
                error: Some(e.to_string()),
            }
        }
    };
    Json(response)
}

/// Probe the model with a fixed greeting. No session is stored.
#[utoipa::path(post, path = "/api/ai/test", tag = "AI",
    responses(
        (status = 200, description = "Probe outcome (check `success`)", body = ChatExchange),
    )
)]
pub async fn test_connection(State(state): State<AppState>) -> Json<ChatExchange> {
    Json(state.chat.test_connection().await)
}
