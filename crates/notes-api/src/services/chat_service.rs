//! Multi-turn chat over a model gateway.
//!
//! One `chat` call:
//! 1. Validates the message (non-blank, at most 4000 characters)
//! 2. Resolves the session id, minting a UUID v4 when absent
//! 3. Loads the stored history (client-sent `context` is ignored)
//! 4. Calls the gateway with no lock held
//! 5. On success appends the user and assistant turns, trimmed to the window
//!
//! Failures never surface as `Err`: they become a `ChatExchange` with
//! `success = false`, and the stored history is left as it was.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use notes_core::defaults;
use notes_core::{ChatExchange, ChatRequest, ChatTurn, Error, ModelGateway, SessionStore};

/// Chat orchestration over an injected gateway and session store.
#[derive(Clone)]
pub struct ChatService {
    gateway: Arc<dyn ModelGateway>,
    store: Arc<dyn SessionStore>,
    history_cap: usize,
}

impl ChatService {
    pub fn new(gateway: Arc<dyn ModelGateway>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            store,
            history_cap: defaults::SESSION_HISTORY_CAP,
        }
    }

    /// Override the number of turns kept per session.
    pub fn with_history_cap(mut self, history_cap: usize) -> Self {
        self.history_cap = history_cap;
        self
    }

    pub fn model_name(&self) -> &str {
        self.gateway.model_name()
    }

    /// Run one chat exchange.
    pub async fn chat(&self, request: ChatRequest) -> ChatExchange {
        let start = Instant::now();
        let session_id = request
            .session_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if let Err(e) = validate_message(&request.message) {
            debug!(
                subsystem = "chat",
                op = "validate",
                session_id = %session_id,
                error = %e,
                "Chat message rejected"
            );
            return ChatExchange::failure(e.to_string(), session_id);
        }

        if request.context.is_some() {
            debug!(session_id = %session_id, "Ignoring client-supplied context");
        }

        let history = match self.store.history(&session_id).await {
            Ok(history) => history,
            Err(e) => {
                warn!(
                    subsystem = "chat",
                    op = "load_history",
                    session_id = %session_id,
                    error = %e,
                    "Failed to load session history"
                );
                return ChatExchange::failure(unavailable(&e), session_id);
            }
        };

        let params = request.model_params.clone().unwrap_or_default();
        let reply = match self.gateway.send(&history, &request.message, &params).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    subsystem = "chat",
                    op = "send",
                    session_id = %session_id,
                    history_len = history.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "Model gateway call failed"
                );
                return ChatExchange::failure(unavailable(&Error::from(e)), session_id);
            }
        };

        let turns = vec![
            ChatTurn::user(request.message.as_str()),
            ChatTurn::assistant(reply.content.as_str()),
        ];
        let stored = match self
            .store
            .append_exchange(&session_id, turns, self.history_cap)
            .await
        {
            Ok(len) => len,
            Err(e) => {
                warn!(
                    subsystem = "chat",
                    op = "store",
                    session_id = %session_id,
                    error = %e,
                    "Failed to persist chat exchange"
                );
                return ChatExchange::failure(unavailable(&e), session_id);
            }
        };

        info!(
            subsystem = "chat",
            op = "chat",
            session_id = %session_id,
            model = self.gateway.model_name(),
            prompt_len = request.message.len(),
            response_len = reply.content.len(),
            history_len = stored,
            total_tokens = reply.usage.map(|u| u.total_tokens),
            duration_ms = start.elapsed().as_millis() as u64,
            "Chat completed"
        );

        ChatExchange::success(
            reply.content,
            session_id,
            self.gateway.model_name(),
            reply.usage,
        )
    }

    /// Forget a session. Unknown ids are a no-op.
    pub async fn clear_session(&self, session_id: &str) -> notes_core::Result<()> {
        self.store.clear(session_id).await?;
        info!(subsystem = "chat", op = "clear", session_id, "Session cleared");
        Ok(())
    }

    pub async fn active_session_count(&self) -> notes_core::Result<usize> {
        self.store.count().await
    }

    /// Probe the gateway with a fixed greeting. Nothing is stored.
    pub async fn test_connection(&self) -> ChatExchange {
        let start = Instant::now();
        let session_id = format!("probe-{}", Uuid::new_v4());
        let params = notes_core::ModelParams::default();

        match self
            .gateway
            .send(&[], defaults::PROBE_MESSAGE, &params)
            .await
        {
            Ok(reply) => {
                info!(
                    subsystem = "chat",
                    op = "probe",
                    model = self.gateway.model_name(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    success = true,
                    "Gateway probe succeeded"
                );
                ChatExchange::success(
                    reply.content,
                    session_id,
                    self.gateway.model_name(),
                    reply.usage,
                )
            }
            Err(e) => {
                warn!(
                    subsystem = "chat",
                    op = "probe",
                    duration_ms = start.elapsed().as_millis() as u64,
                    success = false,
                    error = %e,
                    "Gateway probe failed"
                );
                ChatExchange::failure(unavailable(&Error::from(e)), session_id)
            }
        }
    }
}

fn validate_message(message: &str) -> notes_core::Result<()> {
    if message.trim().is_empty() {
        return Err(Error::InvalidInput("消息内容不能为空".to_string()));
    }
    if message.chars().count() > defaults::MAX_MESSAGE_CHARS {
        return Err(Error::InvalidInput(format!(
            "消息内容不能超过{}字符",
            defaults::MAX_MESSAGE_CHARS
        )));
    }
    Ok(())
}

fn unavailable(e: &Error) -> String {
    format!("AI服务暂时不可用: {}", e)
}
