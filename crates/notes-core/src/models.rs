//! Core data models for the notes AI assistant.
//!
//! These types are shared across all crates: chat turns and exchanges,
//! analysis requests and results, and the gateway reply envelope. Wire
//! names are camelCase to match the notes frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::defaults;
use crate::error::Error;

// =============================================================================
// CHAT TYPES
// =============================================================================

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used by chat-completion APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Optional per-request sampling parameters.
///
/// Unset fields fall back to the gateway's configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelParams {
    /// Sampling temperature (default 0.7)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Completion length cap (default 1000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Nucleus sampling (default [`defaults::TOP_P`]). Accepted but not sent upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl ModelParams {
    /// Requested top-p, or the configured default when unset.
    ///
    /// Only reported in logs; the gateway never forwards it.
    pub fn top_p_or_default(&self) -> f32 {
        self.top_p.unwrap_or(defaults::TOP_P)
    }
}

/// Token accounting reported by the upstream model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Inbound chat request.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// User message text.
    pub message: String,
    /// Client-side context. Accepted for compatibility and ignored: the
    /// server-stored session history is authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<ChatTurn>>,
    /// Session to continue. A new id is minted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_params: Option<ModelParams>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            session_id: None,
            model_params: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_model_params(mut self, params: ModelParams) -> Self {
        self.model_params = Some(params);
        self
    }
}

/// Outcome of one chat call. Built once per call and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatExchange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ChatExchange {
    pub fn success(
        content: impl Into<String>,
        session_id: impl Into<String>,
        model: impl Into<String>,
        token_usage: Option<TokenUsage>,
    ) -> Self {
        Self {
            content: Some(content.into()),
            session_id: session_id.into(),
            timestamp: Utc::now(),
            model: Some(model.into()),
            token_usage,
            success: true,
            error_message: None,
        }
    }

    pub fn failure(error_message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            content: None,
            session_id: session_id.into(),
            timestamp: Utc::now(),
            model: None,
            token_usage: None,
            success: false,
            error_message: Some(error_message.into()),
        }
    }
}

/// Successful reply from a model gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayReply {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

impl GatewayReply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }
}

// =============================================================================
// ANALYSIS TYPES
// =============================================================================

/// The fixed set of note analysis operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisKind {
    Summary,
    Category,
    Tags,
    Optimize,
    ExplainCode,
    GenerateOutline,
    FindErrors,
    RelatedTopics,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 8] = [
        AnalysisKind::Summary,
        AnalysisKind::Category,
        AnalysisKind::Tags,
        AnalysisKind::Optimize,
        AnalysisKind::ExplainCode,
        AnalysisKind::GenerateOutline,
        AnalysisKind::FindErrors,
        AnalysisKind::RelatedTopics,
    ];

    /// Wire name, e.g. `EXPLAIN_CODE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Summary => "SUMMARY",
            AnalysisKind::Category => "CATEGORY",
            AnalysisKind::Tags => "TAGS",
            AnalysisKind::Optimize => "OPTIMIZE",
            AnalysisKind::ExplainCode => "EXPLAIN_CODE",
            AnalysisKind::GenerateOutline => "GENERATE_OUTLINE",
            AnalysisKind::FindErrors => "FIND_ERRORS",
            AnalysisKind::RelatedTopics => "RELATED_TOPICS",
        }
    }

    /// Human-readable label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::Summary => "生成摘要",
            AnalysisKind::Category => "分类建议",
            AnalysisKind::Tags => "标签建议",
            AnalysisKind::Optimize => "内容优化",
            AnalysisKind::ExplainCode => "代码解释",
            AnalysisKind::GenerateOutline => "生成大纲",
            AnalysisKind::FindErrors => "发现错误",
            AnalysisKind::RelatedTopics => "相关主题",
        }
    }

    /// Kinds whose answer is parsed into a comma-separated list.
    pub fn yields_list(&self) -> bool {
        matches!(
            self,
            AnalysisKind::Category | AnalysisKind::Tags | AnalysisKind::RelatedTopics
        )
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AnalysisKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnsupportedAnalysisKind(s.to_string()))
    }
}

/// Inbound analysis request.
///
/// `analysis_type` stays a string so an unknown kind reaches the dispatcher
/// and is reported there instead of failing request decoding.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub analysis_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<i64>,
}

impl AnalysisRequest {
    pub fn new(kind: AnalysisKind, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: None,
            analysis_type: kind.as_str().to_string(),
            user_id: None,
            note_id: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Outcome of one analysis call.
///
/// Exactly one of `result` (success) or `error_message` (failure) is set.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<AnalysisKind>,
    /// Set only for CATEGORY.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_categories: Option<Vec<String>>,
    /// Set only for TAGS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_tags: Option<Vec<String>>,
    /// Set only for RELATED_TOPICS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_topics: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AnalysisResult {
    /// Successful result carrying the raw model answer.
    pub fn success(kind: AnalysisKind, result: impl Into<String>) -> Self {
        Self {
            result: Some(result.into()),
            analysis_type: Some(kind),
            suggested_categories: None,
            suggested_tags: None,
            related_topics: None,
            timestamp: Utc::now(),
            success: true,
            error_message: None,
        }
    }

    /// Attach a parsed list to the field that belongs to this result's kind.
    /// Kinds that do not yield a list ignore it.
    pub fn with_items(mut self, items: Vec<String>) -> Self {
        match self.analysis_type {
            Some(AnalysisKind::Category) => self.suggested_categories = Some(items),
            Some(AnalysisKind::Tags) => self.suggested_tags = Some(items),
            Some(AnalysisKind::RelatedTopics) => self.related_topics = Some(items),
            _ => {}
        }
        self
    }

    pub fn failure(kind: Option<AnalysisKind>, error_message: impl Into<String>) -> Self {
        Self {
            result: None,
            analysis_type: kind,
            suggested_categories: None,
            suggested_tags: None,
            related_topics: None,
            timestamp: Utc::now(),
            success: false,
            error_message: Some(error_message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let turn = ChatTurn::assistant("hi");
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_chat_request_camel_case() {
        let json = r#"{
            "message": "hello",
            "sessionId": "abc",
            "context": [{"role": "user", "content": "earlier"}],
            "modelParams": {"temperature": 0.2, "maxTokens": 256, "topP": 0.5}
        }"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.message, "hello");
        assert_eq!(req.session_id.as_deref(), Some("abc"));
        assert_eq!(req.context.as_ref().map(Vec::len), Some(1));
        let params = req.model_params.unwrap();
        assert_eq!(params.temperature, Some(0.2));
        assert_eq!(params.max_tokens, Some(256));
        assert_eq!(params.top_p, Some(0.5));
    }

    #[test]
    fn test_top_p_falls_back_to_default() {
        assert_eq!(ModelParams::default().top_p_or_default(), defaults::TOP_P);
        let params = ModelParams {
            top_p: Some(0.5),
            ..ModelParams::default()
        };
        assert_eq!(params.top_p_or_default(), 0.5);
    }

    #[test]
    fn test_chat_request_minimal() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert!(req.session_id.is_none());
        assert!(req.context.is_none());
        assert!(req.model_params.is_none());
    }

    #[test]
    fn test_chat_exchange_success_shape() {
        let usage = TokenUsage {
            prompt_tokens: 3,
            completion_tokens: 4,
            total_tokens: 7,
        };
        let exchange = ChatExchange::success("reply", "s-1", "glm-4-air", Some(usage));
        let value = serde_json::to_value(&exchange).unwrap();
        assert_eq!(value["content"], "reply");
        assert_eq!(value["sessionId"], "s-1");
        assert_eq!(value["model"], "glm-4-air");
        assert_eq!(value["tokenUsage"]["totalTokens"], 7);
        assert_eq!(value["success"], true);
        assert!(value.get("errorMessage").is_none());
    }

    #[test]
    fn test_chat_exchange_failure_shape() {
        let exchange = ChatExchange::failure("boom", "s-2");
        let value = serde_json::to_value(&exchange).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["errorMessage"], "boom");
        assert_eq!(value["sessionId"], "s-2");
        assert!(value.get("content").is_none());
    }

    #[test]
    fn test_analysis_kind_parse() {
        assert_eq!(
            "EXPLAIN_CODE".parse::<AnalysisKind>().unwrap(),
            AnalysisKind::ExplainCode
        );
        assert_eq!(
            "related_topics".parse::<AnalysisKind>().unwrap(),
            AnalysisKind::RelatedTopics
        );
    }

    #[test]
    fn test_analysis_kind_parse_unknown() {
        let err = "TRANSLATE".parse::<AnalysisKind>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedAnalysisKind(ref s) if s == "TRANSLATE"));
    }

    #[test]
    fn test_analysis_kind_wire_name_matches_serde() {
        for kind in AnalysisKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_yields_list() {
        let list_kinds: Vec<_> = AnalysisKind::ALL
            .into_iter()
            .filter(AnalysisKind::yields_list)
            .collect();
        assert_eq!(
            list_kinds,
            vec![
                AnalysisKind::Category,
                AnalysisKind::Tags,
                AnalysisKind::RelatedTopics
            ]
        );
    }

    #[test]
    fn test_with_items_routes_by_kind() {
        let items = vec!["a".to_string(), "b".to_string()];

        let tags = AnalysisResult::success(AnalysisKind::Tags, "a,b").with_items(items.clone());
        assert_eq!(tags.suggested_tags, Some(items.clone()));
        assert!(tags.suggested_categories.is_none());

        let cats =
            AnalysisResult::success(AnalysisKind::Category, "a,b").with_items(items.clone());
        assert_eq!(cats.suggested_categories, Some(items.clone()));

        let topics =
            AnalysisResult::success(AnalysisKind::RelatedTopics, "a,b").with_items(items.clone());
        assert_eq!(topics.related_topics, Some(items.clone()));

        let summary = AnalysisResult::success(AnalysisKind::Summary, "a,b").with_items(items);
        assert!(summary.suggested_tags.is_none());
        assert!(summary.related_topics.is_none());
    }

    #[test]
    fn test_analysis_result_exclusive_outcome() {
        let ok = AnalysisResult::success(AnalysisKind::Summary, "short");
        assert!(ok.success && ok.result.is_some() && ok.error_message.is_none());

        let err = AnalysisResult::failure(Some(AnalysisKind::Summary), "bad");
        assert!(!err.success && err.result.is_none() && err.error_message.is_some());
    }

    #[test]
    fn test_analysis_request_decodes_with_missing_content() {
        let req: AnalysisRequest =
            serde_json::from_str(r#"{"analysisType":"TAGS","noteId":7}"#).unwrap();
        assert_eq!(req.content, "");
        assert_eq!(req.analysis_type, "TAGS");
        assert_eq!(req.note_id, Some(7));
    }
}
