//! Model gateway configuration.
//!
//! Loaded from `AI_*` environment variables, falling back to the defaults in
//! [`notes_core::defaults`].
//!
//! # Example
//!
//! ```rust,no_run
//! use notes_inference::config::GatewayConfig;
//!
//! let config = GatewayConfig::from_env();
//! config.validate().expect("invalid gateway configuration");
//! ```

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use notes_core::defaults;
use notes_core::GatewayError;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for GatewayError {
    fn from(e: ConfigError) -> Self {
        GatewayError::Config(e.to_string())
    }
}

/// Settings for the OpenAI-compatible model gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Bearer token. No Authorization header is sent when absent.
    pub api_key: Option<String>,
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Persona sent as the leading system message.
    pub system_prompt: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
    /// Recognized but never consulted: the gateway does not retry.
    pub max_retries: u32,
    /// Temperature used when a request does not set one.
    pub temperature: f32,
    /// Max tokens used when a request does not set one.
    pub max_tokens: u32,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .field("write_timeout_secs", &self.write_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::AI_BASE_URL.to_string(),
            model: defaults::AI_MODEL.to_string(),
            system_prompt: defaults::SYSTEM_PROMPT.to_string(),
            connect_timeout_secs: defaults::CONNECT_TIMEOUT_SECS,
            read_timeout_secs: defaults::READ_TIMEOUT_SECS,
            write_timeout_secs: defaults::WRITE_TIMEOUT_SECS,
            max_retries: defaults::MAX_RETRIES,
            temperature: defaults::TEMPERATURE,
            max_tokens: defaults::MAX_TOKENS,
        }
    }
}

fn env_or<T: FromStr>(key: &str, fallback: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(fallback)
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `AI_API_KEY`, `AI_BASE_URL`, `AI_MODEL`, `AI_SYSTEM_PROMPT`,
    /// `AI_CONNECT_TIMEOUT`, `AI_READ_TIMEOUT`, `AI_WRITE_TIMEOUT`,
    /// `AI_MAX_RETRIES`, `AI_TEMPERATURE` and `AI_MAX_TOKENS`.
    pub fn from_env() -> Self {
        let base = Self::default();
        let config = Self {
            api_key: env::var("AI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            base_url: env::var("AI_BASE_URL").unwrap_or(base.base_url),
            model: env::var("AI_MODEL").unwrap_or(base.model),
            system_prompt: env::var("AI_SYSTEM_PROMPT").unwrap_or(base.system_prompt),
            connect_timeout_secs: env_or("AI_CONNECT_TIMEOUT", base.connect_timeout_secs),
            read_timeout_secs: env_or("AI_READ_TIMEOUT", base.read_timeout_secs),
            write_timeout_secs: env_or("AI_WRITE_TIMEOUT", base.write_timeout_secs),
            max_retries: env_or("AI_MAX_RETRIES", base.max_retries),
            temperature: env_or("AI_TEMPERATURE", base.temperature),
            max_tokens: env_or("AI_MAX_TOKENS", base.max_tokens),
        };
        debug!(?config, "Loaded gateway configuration from environment");
        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::Validation("model cannot be empty".to_string()));
        }

        if self.connect_timeout_secs == 0
            || self.read_timeout_secs == 0
            || self.write_timeout_secs == 0
        {
            return Err(ConfigError::Validation(
                "timeouts must be at least one second".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Validation(format!(
                "temperature must be within 0.0..=2.0, got: {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::Validation(
                "max_tokens must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Full chat-completions endpoint URL.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Overall per-request deadline. reqwest exposes no write-phase timeout,
    /// so the write budget is enforced as part of the whole-request bound.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_secs + self.write_timeout_secs + self.read_timeout_secs,
        )
    }
}
