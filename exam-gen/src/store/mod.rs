//! Persistence of the published quiz and the submission log.

mod file;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExamError, Result};
use crate::quiz::{Difficulty, QuestionRecord, QuestionType, ScoreReport};

pub use file::FileStore;

/// The quiz students currently take
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedQuiz {
    pub quiz_id: String,
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub source_name: String,
    pub source_hash: String,
    pub questions: Vec<QuestionRecord>,
    pub published_at: DateTime<Utc>,
}

impl PublishedQuiz {
    pub fn new(
        question_type: QuestionType,
        difficulty: Difficulty,
        source_name: &str,
        source_hash: &str,
        questions: Vec<QuestionRecord>,
    ) -> Self {
        let published_at = Utc::now();
        Self {
            quiz_id: format!("{}_{}", source_hash, published_at.format("%Y%m%d_%H%M%S")),
            question_type,
            difficulty,
            source_name: source_name.to_string(),
            source_hash: source_hash.to_string(),
            questions,
            published_at,
        }
    }
}

/// One completed attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub name: String,
    pub score: usize,
    pub total: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<String>,
}

impl Submission {
    /// Record a scored attempt. A blank name is rejected.
    pub fn new(name: &str, report: &ScoreReport, quiz_id: Option<&str>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ExamError::MissingAnswerInput);
        }

        Ok(Self {
            name: name.to_string(),
            score: report.correct,
            total: report.total,
            timestamp: Utc::now(),
            quiz_id: quiz_id.map(str::to_string),
        })
    }
}

/// Storage for the current quiz and the submission log
pub trait QuizStore {
    /// Replace the current quiz
    fn publish(&self, quiz: &PublishedQuiz) -> Result<()>;

    fn current(&self) -> Result<Option<PublishedQuiz>>;

    /// Append one record to the submission log
    fn append_submission(&self, submission: &Submission) -> Result<()>;

    /// All submissions in the order they were stored
    fn submissions(&self) -> Result<Vec<Submission>>;
}
