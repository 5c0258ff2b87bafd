//! Error conditions surfaced by the quiz pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExamError {
    #[error("No extractable text found in {source_name} (scanned pages or an empty document?)")]
    ExtractionEmpty { source_name: String },

    #[error("Question generation failed: {reason}")]
    GenerationFailure { reason: String, rate_limited: bool },

    #[error("The model responded, but no well-formed questions could be parsed from it")]
    ParseYieldedNothing,

    #[error("A name is required to submit answers")]
    MissingAnswerInput,

    #[error("Examiner password rejected")]
    Unauthorized,

    #[error("No quiz has been published yet")]
    NoPublishedQuiz,

    #[error("No chapter {0} in this document")]
    UnknownChapter(u64),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<llm_client::LlmError> for ExamError {
    fn from(err: llm_client::LlmError) -> Self {
        Self::GenerationFailure {
            rate_limited: err.is_rate_limit(),
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExamError>;

#[cfg(test)]
mod tests {
    use super::*;
    use llm_client::LlmError;

    #[test]
    fn test_rate_limit_flag_survives_conversion() {
        let err: ExamError = LlmError::RateLimited {
            retry_after: Some(5),
        }
        .into();
        match err {
            ExamError::GenerationFailure {
                rate_limited,
                reason,
            } => {
                assert!(rate_limited);
                assert!(reason.contains("Retry after 5"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_is_not_rate_limited() {
        let err: ExamError = LlmError::ApiError {
            message: "bad key".into(),
            status_code: Some(401),
        }
        .into();
        assert!(matches!(
            err,
            ExamError::GenerationFailure {
                rate_limited: false,
                ..
            }
        ));
    }
}
