//! Text cleanup for PDF extraction output.

use once_cell::sync::Lazy;
use regex::Regex;

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("newline pattern"));
static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern"));

/// Glyphs PDF extractors commonly emit and their plain replacements.
const EXTRACTION_ARTIFACTS: &[(char, &str)] = &[
    ('\u{fb00}', "ff"),  // Latin small ligature ff
    ('\u{fb01}', "fi"),  // Latin small ligature fi
    ('\u{fb02}', "fl"),  // Latin small ligature fl
    ('\u{fb03}', "ffi"), // Latin small ligature ffi
    ('\u{fb04}', "ffl"), // Latin small ligature ffl
    ('\u{00ad}', ""),    // Soft hyphen
    ('\u{00a0}', " "),   // Non-breaking space
    ('\u{200b}', ""),    // Zero-width space
    ('\u{200c}', ""),    // Zero-width non-joiner
    ('\u{200d}', ""),    // Zero-width joiner
    ('\u{feff}', ""),    // BOM
];

/// Collapse whitespace the way the segmenter expects.
///
/// Runs of newlines become one newline, any remaining run of two or more
/// whitespace characters becomes a single space, and the ends are trimmed.
/// Applying it twice gives the same result as applying it once.
pub fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let text = NEWLINE_RUNS.replace_all(&text, "\n");
    let text = WHITESPACE_RUNS.replace_all(&text, " ");
    text.trim().to_string()
}

/// Replace ligatures and invisible characters left behind by PDF extraction.
pub fn repair_extracted(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match EXTRACTION_ARTIFACTS.iter().find(|(ch, _)| *ch == c) {
            Some((_, replacement)) => result.push_str(replacement),
            None => result.push(c),
        }
    }

    result
}
