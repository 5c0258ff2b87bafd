//! Plain-text question paper and answer key.

use super::QuestionRecord;

/// Numbered questions with their options and no answers.
pub fn question_paper(records: &[QuestionRecord]) -> String {
    let mut paper = String::new();

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            paper.push('\n');
        }
        paper.push_str(&format!("Q{}. {}\n", i + 1, record.question));
        for option in &record.options {
            paper.push_str(&format!("   {}\n", option));
        }
    }

    paper
}

/// One "Answer N: ..." line per question.
pub fn answer_key(records: &[QuestionRecord]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| format!("Answer {}: {}\n", i + 1, r.answer))
        .collect()
}
