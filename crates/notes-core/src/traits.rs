//! Core traits for the assistant's collaborators.
//!
//! These traits define the seams that concrete implementations must
//! satisfy, so the chat and analysis services can run against fakes in
//! tests and against durable backends in production.

use async_trait::async_trait;

use crate::error::{GatewayError, Result};
use crate::models::{ChatTurn, GatewayReply, ModelParams};

// =============================================================================
// MODEL GATEWAY
// =============================================================================

/// Client for an externally hosted chat-completion model.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send one user message on top of `history`.
    ///
    /// Implementations prepend exactly one system message and pass `history`
    /// through unmodified. Each call yields at most one reply or one error.
    async fn send(
        &self,
        history: &[ChatTurn],
        user_message: &str,
        params: &ModelParams,
    ) -> std::result::Result<GatewayReply, GatewayError>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

// =============================================================================
// SESSION STORE
// =============================================================================

/// Keyed storage for bounded chat histories.
///
/// Operations on different session ids must not block one another.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stored turns for `session_id`, oldest first. Empty when unknown.
    async fn history(&self, session_id: &str) -> Result<Vec<ChatTurn>>;

    /// Replace the stored turns for `session_id`.
    async fn put_history(&self, session_id: &str, turns: Vec<ChatTurn>) -> Result<()>;

    /// Append `turns` and keep only the most recent `cap` entries.
    ///
    /// Must be atomic with respect to other operations on the same id.
    /// Returns the stored length after trimming.
    async fn append_exchange(
        &self,
        session_id: &str,
        turns: Vec<ChatTurn>,
        cap: usize,
    ) -> Result<usize>;

    /// Remove all history for `session_id`. Unknown ids are a no-op.
    async fn clear(&self, session_id: &str) -> Result<()>;

    /// Number of tracked sessions.
    async fn count(&self) -> Result<usize>;
}

/// Drop the oldest entries so that at most `cap` remain.
pub fn trim_to_window(turns: &mut Vec<ChatTurn>, cap: usize) {
    if turns.len() > cap {
        let excess = turns.len() - cap;
        turns.drain(..excess);
    }
}
