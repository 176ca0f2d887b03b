//! Centralized default constants for the notes AI assistant.
//!
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// MODEL PROVIDER
// =============================================================================

/// Default chat-completion base URL (Zhipu open platform, OpenAI-compatible).
pub const AI_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

/// Default chat model.
pub const AI_MODEL: &str = "glm-4-air";

/// Persona sent as the single system message of every gateway call.
pub const SYSTEM_PROMPT: &str =
    "你是一个专业的技术助手，专门帮助程序员解答技术问题、分析代码、优化笔记内容。请用中文回答。";

/// Connect timeout in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Read timeout in seconds.
pub const READ_TIMEOUT_SECS: u64 = 60;

/// Write timeout in seconds.
pub const WRITE_TIMEOUT_SECS: u64 = 60;

/// Configured retry count. Recognized but never consulted by the call path.
pub const MAX_RETRIES: u32 = 3;

// =============================================================================
// SAMPLING
// =============================================================================

/// Default sampling temperature.
pub const TEMPERATURE: f32 = 0.7;

/// Default completion length cap.
pub const MAX_TOKENS: u32 = 1000;

/// Default nucleus-sampling value. Accepted on requests, not sent upstream.
pub const TOP_P: f32 = 0.9;

// =============================================================================
// CHAT SESSIONS
// =============================================================================

/// Maximum number of turns retained per session (10 user/assistant pairs).
pub const SESSION_HISTORY_CAP: usize = 20;

/// Maximum length of a chat message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Message sent by the connection probe.
pub const PROBE_MESSAGE: &str = "你好，请简单介绍一下你自己";

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const SERVER_PORT: u16 = 3000;

/// Default request body limit in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;
