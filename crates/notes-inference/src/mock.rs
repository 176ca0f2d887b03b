//! Mock model gateway for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notes_inference::mock::MockGateway;
//!
//! let gateway = MockGateway::new().with_fixed_response("Test response");
//! assert_eq!(gateway.call_count(), 0);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use notes_core::{ChatTurn, GatewayError, GatewayReply, ModelGateway, ModelParams, TokenUsage};

/// Mock gateway that records every call it receives.
#[derive(Clone)]
pub struct MockGateway {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    model: String,
    fixed_responses: HashMap<String, String>,
    default_response: String,
    echo: bool,
    usage: Option<TokenUsage>,
    latency_ms: u64,
    failure: Option<GatewayError>,
}

/// One recorded `send` invocation.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub history: Vec<ChatTurn>,
    pub user_message: String,
    pub params: ModelParams,
    pub timestamp: std::time::Instant,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            model: "mock-model".to_string(),
            fixed_responses: HashMap::new(),
            default_response: "Mock response".to_string(),
            echo: false,
            usage: None,
            latency_ms: 0,
            failure: None,
        }
    }
}

impl MockGateway {
    /// Create a new mock gateway with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).model = model.into();
        self
    }

    /// Set the reply returned for every call.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Reply with `output` when the user message equals `input`.
    pub fn with_response_mapping(
        mut self,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_responses
            .insert(input.into(), output.into());
        self
    }

    /// Reply with `echo: {user_message}` instead of the fixed response.
    pub fn with_echo(mut self) -> Self {
        Arc::make_mut(&mut self.config).echo = true;
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        Arc::make_mut(&mut self.config).usage = Some(usage);
        self
    }

    /// Set simulated latency for every call.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Fail every call with `error`.
    pub fn fail_with(mut self, error: GatewayError) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(error);
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<MockCall> {
        self.call_log.lock().unwrap().last().cloned()
    }

    fn log_call(&self, history: &[ChatTurn], user_message: &str, params: &ModelParams) {
        self.call_log.lock().unwrap().push(MockCall {
            history: history.to_vec(),
            user_message: user_message.to_string(),
            params: params.clone(),
            timestamp: std::time::Instant::now(),
        });
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn send(
        &self,
        history: &[ChatTurn],
        user_message: &str,
        params: &ModelParams,
    ) -> Result<GatewayReply, GatewayError> {
        self.log_call(history, user_message, params);
        self.simulate_latency().await;

        if let Some(ref error) = self.config.failure {
            return Err(error.clone());
        }

        let content = if let Some(response) = self.config.fixed_responses.get(user_message) {
            response.clone()
        } else if self.config.echo {
            format!("echo: {}", user_message)
        } else {
            self.config.default_response.clone()
        };

        Ok(GatewayReply {
            content,
            usage: self.config.usage,
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
