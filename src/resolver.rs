use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::catalog::ResponseCatalog;
use crate::fallback::fallback_response;
use crate::model::ModelGateway;

pub const DEFAULT_CONTEXT: &str = "General Construction Site";

/// A validated safety question, created per request.
#[derive(Debug, Clone)]
pub struct Question {
    pub text: String,
    pub context: String,
}

impl Question {
    pub fn new(text: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: context.into(),
        }
    }
}

/// Which path actually produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    Ai,
    Offline,
}

/// The per-request result, serialized straight to the response body.
#[derive(Debug, Serialize)]
pub struct AnswerResult {
    pub answer: String,
    pub timestamp: String,
    pub context: String,
    pub mode: AnswerMode,
}

/// Selects and executes the answer path: model inference when the
/// gateway is available, the keyword catalog otherwise or on any
/// inference failure. Always produces an `AnswerResult`.
#[derive(Clone)]
pub struct Resolver {
    catalog: Arc<ResponseCatalog>,
    gateway: Arc<ModelGateway>,
}

impl Resolver {
    pub fn new(catalog: Arc<ResponseCatalog>, gateway: Arc<ModelGateway>) -> Self {
        Self { catalog, gateway }
    }

    pub fn model_available(&self) -> bool {
        self.gateway.is_available()
    }

    pub async fn resolve(&self, question: &Question) -> AnswerResult {
        if !self.gateway.is_available() {
            return self.offline_answer(question);
        }

        let prompt = build_prompt(question);
        match self.gateway.generate(&prompt).await {
            Ok(raw) => self.answer(
                extract_answer(&raw).to_string(),
                question,
                AnswerMode::Ai,
            ),
            Err(err) => {
                // No retry; one failure resolves by fallback.
                warn!(error = %err, "model inference failed, using fallback");
                self.offline_answer(question)
            }
        }
    }

    fn offline_answer(&self, question: &Question) -> AnswerResult {
        let answer = fallback_response(&question.text, &self.catalog).to_string();
        self.answer(answer, question, AnswerMode::Offline)
    }

    fn answer(&self, answer: String, question: &Question, mode: AnswerMode) -> AnswerResult {
        AnswerResult {
            answer,
            timestamp: Utc::now().to_rfc3339(),
            context: question.context.clone(),
            mode,
        }
    }
}

fn build_prompt(question: &Question) -> String {
    format!(
        "Context: {}\nQuestion: {}\nAnswer:",
        question.context, question.text
    )
}

/// Text after the LAST "Answer:" marker, trimmed; the whole trimmed
/// output when the marker never appears.
fn extract_answer(raw: &str) -> &str {
    raw.rsplit("Answer:").next().unwrap_or(raw).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelHandle;

    fn catalog() -> Arc<ResponseCatalog> {
        Arc::new(
            ResponseCatalog::parse(
                r#"{
                    "rules": [
                        {"keywords": "fall_protection", "response": "Use harnesses."},
                        {"keywords": "electrical_hazard", "response": "De-energize circuits."}
                    ],
                    "default": "Ask supervisor."
                }"#,
            )
            .unwrap(),
        )
    }

    fn resolver_with(gateway: ModelGateway) -> Resolver {
        Resolver::new(catalog(), Arc::new(gateway))
    }

    fn question(text: &str) -> Question {
        Question::new(text, DEFAULT_CONTEXT)
    }

    #[test]
    fn prompt_follows_the_fixed_template() {
        let q = Question::new("Is this ladder safe?", "Roofing site");
        assert_eq!(
            build_prompt(&q),
            "Context: Roofing site\nQuestion: Is this ladder safe?\nAnswer:"
        );
    }

    #[test]
    fn extracts_text_after_last_answer_marker() {
        let raw = "Context: Site\nQuestion: Q\nAnswer: Wear a harness at all times.";
        assert_eq!(extract_answer(raw), "Wear a harness at all times.");

        let nested = "Answer: first\nAnswer:  second  ";
        assert_eq!(extract_answer(nested), "second");
    }

    #[test]
    fn extraction_without_marker_uses_whole_output() {
        assert_eq!(extract_answer("  plain text  "), "plain text");
    }

    #[tokio::test]
    async fn unavailable_model_always_answers_offline() {
        let resolver = resolver_with(ModelGateway::offline());

        let result = resolver
            .resolve(&question("What about falling hazards on scaffolding?"))
            .await;

        assert_eq!(result.mode, AnswerMode::Offline);
        assert_eq!(result.answer, "Use harnesses.");
        assert_eq!(result.context, DEFAULT_CONTEXT);
        assert!(!result.timestamp.is_empty());
    }

    #[tokio::test]
    async fn successful_generation_is_tagged_ai() {
        let resolver = resolver_with(ModelGateway::new(Some(ModelHandle::new(
            r#"printf 'Context: Site\nQuestion: Q\nAnswer: Wear a harness at all times.'"#,
            5_000,
        ))));

        let result = resolver.resolve(&question("Do I need a harness?")).await;

        assert_eq!(result.mode, AnswerMode::Ai);
        assert_eq!(result.answer, "Wear a harness at all times.");
    }

    #[tokio::test]
    async fn inference_failure_falls_back_offline() {
        let resolver = resolver_with(ModelGateway::new(Some(ModelHandle::new("exit 1", 5_000))));

        let result = resolver
            .resolve(&question("Is it safe to use extension cords in rain?"))
            .await;

        assert_eq!(result.mode, AnswerMode::Offline);
        assert_eq!(result.answer, "Ask supervisor.");
    }
}
