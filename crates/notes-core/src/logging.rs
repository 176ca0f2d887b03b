//! Structured logging schema and field name constants.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, failure converted into a failure response |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | High-volume data (full request bodies) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the HTTP layer.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "chat", "analysis", "gateway", "session_store"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "chat", "analyze", "dispatch", "clear", "append", "send", "probe"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Chat session identifier.
pub const SESSION_ID: &str = "session_id";

/// Analysis kind being dispatched.
pub const ANALYSIS_KIND: &str = "analysis_kind";

/// Note identifier passed through on analysis requests.
pub const NOTE_ID: &str = "note_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Number of stored turns for a session.
pub const HISTORY_LEN: &str = "history_len";

/// Number of sessions currently tracked.
pub const SESSION_COUNT: &str = "session_count";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

/// HTTP status returned by the upstream model provider.
pub const STATUS: &str = "status";

/// Total tokens reported by the upstream.
pub const TOTAL_TOKENS: &str = "total_tokens";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
