//! Parsing of model output into question records.
//!
//! The model is asked for a fixed layout but drifts from it: markers change
//! ("Q1." vs "Q:"), answer labels vary ("Answer:" vs "Correct:"), options go
//! missing and commentary appears around the questions. The parser works
//! block by block and drops anything it cannot make sense of.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{QuestionRecord, QuestionType};

/// "Q:", "Q1.", "Q12:" at the start of a line, optionally after markdown
/// emphasis, quoting or indentation
static QUESTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t>#*]*Q[ \t]*\d*[ \t]*[:.]").expect("question marker pattern"));

/// A second marker left on the question line, e.g. "Question 1:" or "1. "
static RESIDUAL_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:question|q)[ \t]*\d*[ \t]*[:.)]|\d+[.)][ \t])[ \t]*")
        .expect("residual marker pattern")
});

static OPTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Da-d][.)]").expect("option line pattern"));

static STANDALONE_LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([A-D])\b").expect("answer letter pattern"));

static TRUE_OR_FALSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(true|false)\b").expect("true/false pattern"));

static ANSWER_INDICATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)answer:|correct:").expect("answer indicator pattern"));

/// Extract question records from raw model output.
///
/// Never fails: blocks missing a question or an answer are skipped, and an
/// output with nothing usable yields an empty vector.
pub fn parse(raw_model_output: &str, question_type: QuestionType) -> Vec<QuestionRecord> {
    let markers: Vec<_> = QUESTION_MARKER.find_iter(raw_model_output).collect();

    let mut records = Vec::new();
    for (i, marker) in markers.iter().enumerate() {
        let end = markers
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(raw_model_output.len());
        let block = &raw_model_output[marker.end()..end];

        match parse_block(block, question_type) {
            Some(record) => records.push(record),
            None => log::debug!("Skipping question block {}: {:?}", i + 1, preview(block)),
        }
    }

    log::debug!(
        "Parsed {} of {} question blocks as {}",
        records.len(),
        markers.len(),
        question_type
    );
    records
}

fn parse_block(block: &str, question_type: QuestionType) -> Option<QuestionRecord> {
    if indicator_position(block).is_none() {
        return None;
    }

    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let answer_index = lines.iter().position(|l| is_answer_line(l))?;
    let answer_line = lines[answer_index];

    let first = *lines.first()?;
    let question = if answer_index == 0 {
        // Question and answer on one line: "Q1. Capital of France? Answer: Paris"
        let cut = indicator_position(first)?;
        clean_question(first.get(..cut)?)
    } else {
        clean_question(first)
    };

    let mut options: Vec<String> = lines
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(i, _)| *i != answer_index)
        .filter_map(|(_, line)| option_from_line(line, question_type))
        .collect();

    let raw_answer = raw_answer(answer_line);
    let answer = match question_type {
        QuestionType::Mcq => answer_letter(&raw_answer).unwrap_or(raw_answer),
        QuestionType::TrueFalse => true_false_verdict(&raw_answer)
            .map(str::to_string)
            .unwrap_or_default(),
        QuestionType::FillBlank | QuestionType::ShortAnswer => raw_answer,
    };

    if question_type == QuestionType::TrueFalse && options.is_empty() {
        options = vec!["True".to_string(), "False".to_string()];
    }

    if question.is_empty() || answer.is_empty() {
        return None;
    }

    Some(QuestionRecord {
        question,
        options,
        answer,
    })
}

/// First standalone letter A-D, uppercased
pub(crate) fn answer_letter(text: &str) -> Option<String> {
    STANDALONE_LETTER
        .captures(text)
        .map(|caps| caps[1].to_uppercase())
}

/// First whole-word "true" or "false", title cased
pub(crate) fn true_false_verdict(text: &str) -> Option<&'static str> {
    TRUE_OR_FALSE
        .captures(text)
        .map(|caps| title_case_bool(&caps[1]))
}

/// Byte offset of the first answer indicator in `text`
fn indicator_position(text: &str) -> Option<usize> {
    ANSWER_INDICATOR.find(text).map(|m| m.start())
}

fn is_answer_line(line: &str) -> bool {
    indicator_position(line).is_some()
}

/// Everything after the last colon, without markdown emphasis
fn raw_answer(line: &str) -> String {
    line.rsplit(':')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('*')
        .trim()
        .to_string()
}

fn clean_question(line: &str) -> String {
    let line = line.trim_start_matches(|c: char| c == '*' || c == '#' || c.is_whitespace());
    let line = RESIDUAL_MARKER.replace(line, "");
    line.trim_matches(|c: char| c == '*' || c.is_whitespace())
        .to_string()
}

fn option_from_line(line: &str, question_type: QuestionType) -> Option<String> {
    if OPTION_LINE.is_match(line) {
        return Some(line.to_string());
    }
    if question_type == QuestionType::TrueFalse
        && (line.eq_ignore_ascii_case("true") || line.eq_ignore_ascii_case("false"))
    {
        return Some(title_case_bool(line).to_string());
    }
    None
}

fn title_case_bool(word: &str) -> &'static str {
    if word.eq_ignore_ascii_case("true") {
        "True"
    } else {
        "False"
    }
}

fn preview(block: &str) -> String {
    block.trim().chars().take(60).collect()
}
