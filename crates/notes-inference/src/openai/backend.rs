//! OpenAI-compatible model gateway implementation.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument, trace, warn};

use notes_core::{ChatTurn, GatewayError, GatewayReply, ModelGateway, ModelParams, TokenUsage};

use super::error::{classify_transport_error, UpstreamErrorCode};
use super::types::{ChatCompletionRequest, ChatMessage, ChatUsage};
use crate::config::GatewayConfig;

/// Gateway to a chat-completion endpoint speaking the OpenAI wire format.
pub struct OpenAIGateway {
    client: Client,
    config: GatewayConfig,
}

impl OpenAIGateway {
    /// Create a new gateway with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "gateway",
            op = "init",
            base_url = %config.base_url,
            model = %config.model,
            connect_timeout_secs = config.connect_timeout_secs,
            read_timeout_secs = config.read_timeout_secs,
            write_timeout_secs = config.write_timeout_secs,
            "Initializing model gateway"
        );

        if config.api_key.is_none() {
            warn!("No AI_API_KEY configured; requests are sent without Authorization");
        }

        // Configured for compatibility, not wired: calls are never retried.
        debug!(
            max_retries = config.max_retries,
            "max_retries is recognized but not applied"
        );

        Ok(Self { client, config })
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self, GatewayError> {
        Self::new(GatewayConfig::default())
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(GatewayConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Wire messages: persona, then history verbatim, then the new message.
    pub fn build_messages(&self, history: &[ChatTurn], user_message: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(self.config.system_prompt.as_str()));
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(user_message));
        messages
    }

    /// Build a POST with authentication if configured.
    fn build_request(&self) -> reqwest::RequestBuilder {
        let mut req = self.client.post(self.config.completions_url());

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req.header("Content-Type", "application/json")
    }
}

/// Extract the reply from a 2xx completion body.
///
/// Requires `choices[0].message.content` to be a string; `usage` is optional.
pub fn parse_completion_body(body: &str) -> Result<GatewayReply, GatewayError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

    let content = value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            GatewayError::MalformedResponse(
                "response has no choices[0].message.content".to_string(),
            )
        })?;

    let usage = value
        .get("usage")
        .cloned()
        .and_then(|u| serde_json::from_value::<ChatUsage>(u).ok())
        .map(TokenUsage::from);

    Ok(GatewayReply {
        content: content.to_string(),
        usage,
    })
}

#[async_trait]
impl ModelGateway for OpenAIGateway {
    #[instrument(skip_all, fields(
        subsystem = "gateway",
        op = "send",
        model = %self.config.model,
        history_len = history.len(),
        prompt_len = user_message.len(),
    ))]
    async fn send(
        &self,
        history: &[ChatTurn],
        user_message: &str,
        params: &ModelParams,
    ) -> Result<GatewayReply, GatewayError> {
        let start = Instant::now();

        debug!(
            top_p = params.top_p_or_default(),
            "top_p is accepted but not forwarded upstream"
        );

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: self.build_messages(history, user_message),
            temperature: params.temperature.unwrap_or(self.config.temperature),
            max_tokens: params.max_tokens.unwrap_or(self.config.max_tokens),
        };
        trace!(?request, "Sending completion request");

        let response = self
            .build_request()
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        if !status.is_success() {
            let code = UpstreamErrorCode::from_status(status.as_u16());
            warn!(
                status = status.as_u16(),
                ?code,
                retryable = code.is_retryable(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Upstream rejected completion request"
            );
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        trace!(%body, "Completion response body");
        let reply = parse_completion_body(&body)?;

        debug!(
            response_len = reply.content.len(),
            total_tokens = reply.usage.map(|u| u.total_tokens),
            duration_ms = start.elapsed().as_millis() as u64,
            "Completion received"
        );
        Ok(reply)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
