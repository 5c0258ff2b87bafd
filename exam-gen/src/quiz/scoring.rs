//! Scoring user responses against parsed answers.

use serde::{Deserialize, Serialize};

use super::parser::{answer_letter, true_false_verdict};
use super::{QuestionRecord, QuestionType};

/// Result for a single question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub given: Option<String>,
    pub expected: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub correct: usize,
    pub total: usize,
    pub outcomes: Vec<Outcome>,
}

impl ScoreReport {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }
}

/// Score responses in question order. Missing or blank responses are wrong.
pub fn score(
    records: &[QuestionRecord],
    question_type: QuestionType,
    responses: &[Option<String>],
) -> ScoreReport {
    let outcomes: Vec<Outcome> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let given = responses
                .get(i)
                .and_then(|r| r.as_deref())
                .map(str::trim)
                .filter(|r| !r.is_empty());
            let correct = given
                .map(|g| is_correct(g, &record.answer, question_type))
                .unwrap_or(false);
            Outcome {
                given: given.map(str::to_string),
                expected: record.answer.clone(),
                correct,
            }
        })
        .collect();

    ScoreReport {
        correct: outcomes.iter().filter(|o| o.correct).count(),
        total: records.len(),
        outcomes,
    }
}

fn is_correct(given: &str, expected: &str, question_type: QuestionType) -> bool {
    match question_type {
        // A fallback answer that is not a letter is compared as text
        QuestionType::Mcq if matches!(expected, "A" | "B" | "C" | "D") => {
            answer_letter(given).is_some_and(|letter| letter.eq_ignore_ascii_case(expected))
        }
        QuestionType::TrueFalse => {
            let verdict = match given.to_lowercase().as_str() {
                "t" => Some("True"),
                "f" => Some("False"),
                other => true_false_verdict(other),
            };
            verdict.is_some_and(|v| v.eq_ignore_ascii_case(expected))
        }
        _ => normalize_free_text(given) == normalize_free_text(expected),
    }
}

fn normalize_free_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches('.')
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(answer: &str) -> QuestionRecord {
        QuestionRecord {
            question: "q".into(),
            options: vec![],
            answer: answer.into(),
        }
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_mcq_single_char_fallback_compared_as_text() {
        let records = vec![record("4")];
        let report = score(&records, QuestionType::Mcq, &[Some("4".into())]);
        assert_eq!(report.correct, 1);

        let report = score(&records, QuestionType::Mcq, &[Some("B".into())]);
        assert_eq!(report.correct, 0);
    }

    #[test]
    fn test_mcq_accepts_letter_forms() {
        let records = vec![record("B"), record("B"), record("B"), record("C")];
        let report = score(
            &records,
            QuestionType::Mcq,
            &[some("b"), some("B) 4"), some("A"), some(" c ")],
        );
        assert_eq!(report.correct, 3);
        assert_eq!(report.total, 4);
        assert!(!report.outcomes[2].correct);
        assert_eq!(report.outcomes[3].given.as_deref(), Some("c"));
    }

    #[test]
    fn test_mcq_fallback_answer_compares_text() {
        let records = vec![record("none of these")];
        let report = score(&records, QuestionType::Mcq, &[some("None of  these")]);
        assert_eq!(report.correct, 1);
    }

    #[test]
    fn test_true_false() {
        let records = vec![record("True"), record("False"), record("True")];
        let report = score(
            &records,
            QuestionType::TrueFalse,
            &[some("true"), some("F"), some("False")],
        );
        assert_eq!(report.correct, 2);
    }

    #[test]
    fn test_free_text_normalization() {
        let records = vec![record("Mitochondria"), record("Carbon dioxide")];
        let report = score(
            &records,
            QuestionType::FillBlank,
            &[some("mitochondria."), some("carbon  monoxide")],
        );
        assert_eq!(report.correct, 1);
    }

    #[test]
    fn test_missing_responses_are_wrong() {
        let records = vec![record("A"), record("B"), record("C")];
        let report = score(&records, QuestionType::Mcq, &[some("A"), None]);
        assert_eq!(report.correct, 1);
        assert_eq!(report.total, 3);
        assert_eq!(report.outcomes[1].given, None);
        assert_eq!(report.outcomes[2].given, None);
        assert!((report.percentage() - 100.0 / 3.0).abs() < 0.001);
    }

    #[test]
    fn test_blank_response_counts_as_missing() {
        let report = score(&[record("A")], QuestionType::Mcq, &[some("   ")]);
        assert_eq!(report.outcomes[0].given, None);
        assert_eq!(report.correct, 0);
    }

    #[test]
    fn test_empty_quiz() {
        let report = score(&[], QuestionType::Mcq, &[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.percentage(), 0.0);
    }
}
