//! Prompt construction for question generation.

use super::{QuestionType, QuizRequest};

pub const SYSTEM_PROMPT: &str = "You are a question paper generator. \
Follow the requested output format exactly and do not add commentary.";

/// Default cap on how much source text is sent to the model.
pub const DEFAULT_MAX_SOURCE_CHARS: usize = 12_000;

/// Keep at most `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_source(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Build the generation prompt for a (bounded) source text.
pub fn build_prompt(source_text: &str, request: &QuizRequest, max_source_chars: usize) -> String {
    let text = truncate_source(source_text, max_source_chars);
    if text.len() < source_text.len() {
        log::info!(
            "Source text truncated to {} characters for the model",
            max_source_chars
        );
    }

    let count = request.count;
    let difficulty = request.difficulty;

    match request.question_type {
        QuestionType::Mcq => format!(
            "Given the following study material, generate {count} {difficulty} level **MCQ questions** \
with **four options** each (A, B, C, D) and clearly indicate the **correct option** for each question.

---CONTENT START---
{text}
---CONTENT END---

Provide output in the following format (with spacing between lines):

Q1. <Question text>

A. Option A
B. Option B
C. Option C
D. Option D

Answer: <Correct Option Letter>

Q2. ..."
        ),
        QuestionType::TrueFalse => format!(
            "From the following content, generate {count} {difficulty} level **True/False** questions \
and clearly indicate the **correct option** for each question.

Each question should be followed by the options:

True
False

---CONTENT START---
{text}
---CONTENT END---

Provide output in the following format (with spacing between lines):

Q1. <Question text>

True
False

Answer: <True or False>

Q2. ..."
        ),
        QuestionType::FillBlank | QuestionType::ShortAnswer => {
            let kind = request.question_type;
            format!(
                "From the following content, generate {count} {difficulty} level questions of type \"{kind}\".

---CONTENT START---
{text}
---CONTENT END---

Provide output in the following format (with spacing between lines):

Q1. <Question text>

Answer: <Answer>

Q2. ..."
            )
        }
    }
}
