//! Quiz generation: prompts, model-output parsing, rendering and scoring.

pub mod generator;
pub mod parser;
pub mod prompt;
pub mod render;
pub mod scoring;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use generator::{QuestionGenerator, QuizRequest};
pub use parser::parse;
pub use scoring::{ScoreReport, score};

/// Kind of question to ask the model for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    /// Multiple choice with options A-D
    #[value(name = "mcq")]
    Mcq,
    /// True or False statements
    #[value(name = "true-false", alias = "tf")]
    TrueFalse,
    /// Fill in the blanks
    #[value(name = "fill-blank", alias = "fill")]
    FillBlank,
    /// Short free-text answers
    #[value(name = "short-answer", alias = "short")]
    ShortAnswer,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mcq => "MCQ",
            Self::TrueFalse => "True/False",
            Self::FillBlank => "Fill in the blanks",
            Self::ShortAnswer => "Short Answer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        };
        f.write_str(name)
    }
}

/// A parsed question with its canonical answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// A letter for MCQ, "True"/"False" for True/False, free text otherwise
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_display() {
        assert_eq!(QuestionType::Mcq.to_string(), "MCQ");
        assert_eq!(QuestionType::FillBlank.to_string(), "Fill in the blanks");
    }

    #[test]
    fn test_question_type_cli_names() {
        assert_eq!(QuestionType::from_str("tf", true).unwrap(), QuestionType::TrueFalse);
        assert_eq!(QuestionType::from_str("short", true).unwrap(), QuestionType::ShortAnswer);
        assert_eq!(QuestionType::from_str("MCQ", true).unwrap(), QuestionType::Mcq);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&QuestionType::TrueFalse).unwrap();
        assert_eq!(json, "\"true-false\"");
        let parsed: Difficulty = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(parsed, Difficulty::Hard);
    }
}
