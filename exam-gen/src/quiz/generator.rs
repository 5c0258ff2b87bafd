//! Question generation against an LLM provider.

use llm_client::{LlmProvider, LlmRequest};

use super::prompt::{SYSTEM_PROMPT, build_prompt};
use super::{Difficulty, QuestionRecord, QuestionType, parse};
use crate::error::{ExamError, Result};

const GENERATION_TEMPERATURE: f32 = 0.4;

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizRequest {
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub count: usize,
}

impl QuizRequest {
    /// Scale a per-chapter count by the number of selected chapters.
    ///
    /// An empty selection (the whole document) counts as one unit.
    pub fn per_chapter(mut self, selected_chapters: usize) -> Self {
        self.count *= selected_chapters.max(1);
        self
    }
}

pub struct QuestionGenerator<'a> {
    provider: &'a dyn LlmProvider,
    max_source_chars: usize,
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(provider: &'a dyn LlmProvider, max_source_chars: usize) -> Self {
        Self {
            provider,
            max_source_chars,
        }
    }

    /// Generate a fresh batch of questions from `source_text`.
    ///
    /// Empty source text is refused before the model is called. Provider
    /// failures become [`ExamError::GenerationFailure`]; a reply with no
    /// usable questions becomes [`ExamError::ParseYieldedNothing`].
    pub async fn generate(
        &self,
        source_text: &str,
        request: &QuizRequest,
    ) -> Result<Vec<QuestionRecord>> {
        if source_text.trim().is_empty() {
            return Err(ExamError::ExtractionEmpty {
                source_name: "selected text".to_string(),
            });
        }

        let prompt = build_prompt(source_text, request, self.max_source_chars);
        let llm_request = LlmRequest::new(prompt)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_temperature(GENERATION_TEMPERATURE);

        log::info!(
            "Requesting {} {} {} questions from {}",
            request.count,
            request.difficulty,
            request.question_type,
            self.provider.name()
        );

        let response = self.provider.complete(llm_request).await?;

        if let Some(usage) = &response.usage {
            log::debug!(
                "Tokens: {} in, {} out ({})",
                usage.input_tokens,
                usage.output_tokens,
                response.model
            );
        }

        if response.content.trim().is_empty() {
            return Err(ExamError::GenerationFailure {
                reason: format!("{} returned no content", self.provider.name()),
                rate_limited: false,
            });
        }

        let records = parse(&response.content, request.question_type);
        if records.is_empty() {
            log::warn!("Model output had no parseable questions");
            log::debug!("Raw model output:\n{}", response.content);
            return Err(ExamError::ParseYieldedNothing);
        }

        if records.len() != request.count {
            log::info!(
                "Asked for {} questions, parsed {}",
                request.count,
                records.len()
            );
        }

        Ok(records)
    }
}
