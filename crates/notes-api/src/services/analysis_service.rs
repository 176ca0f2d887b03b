//! Note analysis dispatcher.
//!
//! Maps each analysis kind to its prompt template, sends one single-shot
//! gateway call (no history), and shapes the answer into an
//! `AnalysisResult`. List kinds (CATEGORY, TAGS, RELATED_TOPICS) also get the
//! answer split into items.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use notes_core::{AnalysisKind, AnalysisRequest, AnalysisResult, Error, ModelGateway, ModelParams};
use notes_inference::prompts;

#[derive(Clone)]
pub struct AnalysisService {
    gateway: Arc<dyn ModelGateway>,
}

impl AnalysisService {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Run one analysis. Every failure is reported in the returned result.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let kind = match request.analysis_type.parse::<AnalysisKind>() {
            Ok(kind) => kind,
            Err(e) => {
                debug!(
                    subsystem = "analysis",
                    op = "dispatch",
                    analysis_kind = %request.analysis_type,
                    "Unsupported analysis kind"
                );
                return AnalysisResult::failure(None, failed(&e));
            }
        };

        if request.content.trim().is_empty() {
            let e = Error::InvalidInput(format!("{}的笔记内容不能为空", kind.label()));
            debug!(
                subsystem = "analysis",
                op = "validate",
                analysis_kind = %kind,
                "Blank content rejected"
            );
            return AnalysisResult::failure(Some(kind), failed(&e));
        }

        let prompt = build_prompt(kind, &request.content);
        let start = Instant::now();

        let reply = match self
            .gateway
            .send(&[], &prompt, &ModelParams::default())
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    subsystem = "analysis",
                    op = "analyze",
                    analysis_kind = %kind,
                    note_id = request.note_id,
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "Note analysis failed"
                );
                return AnalysisResult::failure(Some(kind), failed(&Error::from(e)));
            }
        };

        info!(
            subsystem = "analysis",
            op = "analyze",
            analysis_kind = %kind,
            note_id = request.note_id,
            prompt_len = prompt.len(),
            response_len = reply.content.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Note analysis completed"
        );

        let result = AnalysisResult::success(kind, reply.content.as_str());
        if kind.yields_list() {
            result.with_items(prompts::split_list_answer(&reply.content))
        } else {
            result
        }
    }

    pub async fn summarize(&self, content: &str) -> AnalysisResult {
        self.analyze_as(AnalysisKind::Summary, content).await
    }

    pub async fn suggest_categories(&self, content: &str) -> AnalysisResult {
        self.analyze_as(AnalysisKind::Category, content).await
    }

    pub async fn suggest_tags(&self, content: &str) -> AnalysisResult {
        self.analyze_as(AnalysisKind::Tags, content).await
    }

    pub async fn explain_code(&self, code: &str) -> AnalysisResult {
        self.analyze_as(AnalysisKind::ExplainCode, code).await
    }

    pub async fn optimize(&self, content: &str) -> AnalysisResult {
        self.analyze_as(AnalysisKind::Optimize, content).await
    }

    pub async fn generate_outline(&self, content: &str) -> AnalysisResult {
        self.analyze_as(AnalysisKind::GenerateOutline, content).await
    }

    pub async fn find_errors(&self, content: &str) -> AnalysisResult {
        self.analyze_as(AnalysisKind::FindErrors, content).await
    }

    pub async fn related_topics(&self, content: &str) -> AnalysisResult {
        self.analyze_as(AnalysisKind::RelatedTopics, content).await
    }

    async fn analyze_as(&self, kind: AnalysisKind, content: &str) -> AnalysisResult {
        self.analyze(&AnalysisRequest::new(kind, content)).await
    }
}

/// Prompt text sent to the gateway for `kind`.
pub fn build_prompt(kind: AnalysisKind, content: &str) -> String {
    match kind {
        AnalysisKind::Summary => prompts::summary_prompt(content),
        AnalysisKind::Category => prompts::category_prompt(content),
        AnalysisKind::Tags => prompts::tags_prompt(content),
        AnalysisKind::Optimize => prompts::optimize_prompt(content),
        AnalysisKind::ExplainCode => {
            let language = prompts::detect_code_language(content);
            debug!(language = %language, "Detected code language");
            prompts::explain_code_prompt(content, language)
        }
        AnalysisKind::GenerateOutline => prompts::outline_prompt(content),
        AnalysisKind::FindErrors => prompts::find_errors_prompt(content),
        AnalysisKind::RelatedTopics => prompts::related_topics_prompt(content),
    }
}

fn failed(e: &Error) -> String {
    format!("分析失败: {}", e)
}
