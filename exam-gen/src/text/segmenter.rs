//! Chapter segmentation of extracted document text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use super::cleaner::normalize_whitespace;
use crate::error::{ExamError, Result};

/// Label used when a document has no recognisable chapter headings.
pub const FULL_CONTENT_LABEL: &str = "Full Content";

static CHAPTER_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bchapter\s+(\d+)\b").expect("chapter heading pattern"));

/// One chapter of a segmented document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter number from the heading (`None` for the full-content fallback)
    pub number: Option<u64>,
    /// Heading text as it appeared, e.g. "Chapter 3"
    pub label: String,
    /// Chapter body, starting at the heading
    pub text: String,
}

/// Chapters ordered by chapter number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterMap {
    chapters: Vec<Chapter>,
}

impl ChapterMap {
    /// Body text for a label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.chapters
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.text.as_str())
    }

    pub fn by_number(&self, number: u64) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.number == Some(number))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.chapters.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.iter()
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }
}

/// Result of segmenting a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedDocument {
    pub chapters: ChapterMap,
    /// The whole document after whitespace normalization
    pub full_text: String,
}

impl SegmentedDocument {
    /// Text for a chapter selection.
    ///
    /// Bodies are joined with a blank line in chapter order. An empty
    /// selection means the whole document.
    pub fn select(&self, numbers: &[u64]) -> Result<String> {
        if numbers.is_empty() {
            return Ok(self.full_text.clone());
        }

        let mut wanted = numbers.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let bodies = wanted
            .iter()
            .map(|&n| {
                self.chapters
                    .by_number(n)
                    .map(|c| c.text.as_str())
                    .ok_or(ExamError::UnknownChapter(n))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(bodies.join("\n\n"))
    }
}

struct Heading {
    start: usize,
    number: u64,
    label: String,
}

/// Split raw extracted text into chapters.
///
/// Headings are "Chapter <n>" anywhere in the text, matched
/// case-insensitively on word boundaries. Each chapter runs from its heading
/// to the next heading. When the same number appears twice the first
/// occurrence is kept. A document without headings becomes a single
/// [`FULL_CONTENT_LABEL`] chapter.
pub fn segment(raw_text: &str) -> SegmentedDocument {
    let full_text = normalize_whitespace(raw_text);

    let headings: Vec<Heading> = CHAPTER_HEADING
        .captures_iter(&full_text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = match caps[1].parse::<u64>() {
                Ok(n) => n,
                Err(_) => {
                    log::debug!("Ignoring heading with oversized number: {}", whole.as_str());
                    return None;
                }
            };
            Some(Heading {
                start: whole.start(),
                number,
                label: whole.as_str().split_whitespace().collect::<Vec<_>>().join(" "),
            })
        })
        .collect();

    if headings.is_empty() {
        let chapters = ChapterMap {
            chapters: vec![Chapter {
                number: None,
                label: FULL_CONTENT_LABEL.to_string(),
                text: full_text.clone(),
            }],
        };
        return SegmentedDocument {
            chapters,
            full_text,
        };
    }

    let mut by_number: BTreeMap<u64, Chapter> = BTreeMap::new();

    for (i, heading) in headings.iter().enumerate() {
        let end = headings
            .get(i + 1)
            .map(|next| next.start)
            .unwrap_or(full_text.len());
        let body = full_text[heading.start..end].trim();

        match by_number.entry(heading.number) {
            Entry::Vacant(slot) => {
                slot.insert(Chapter {
                    number: Some(heading.number),
                    label: heading.label.clone(),
                    text: body.to_string(),
                });
            }
            Entry::Occupied(existing) => {
                log::warn!(
                    "Duplicate heading \"{}\" at byte {}; keeping the earlier \"{}\"",
                    heading.label,
                    heading.start,
                    existing.get().label
                );
            }
        }
    }

    SegmentedDocument {
        chapters: ChapterMap {
            chapters: by_number.into_values().collect(),
        },
        full_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_headings_gives_full_content() {
        let doc = segment("Some   intro text.\n\n\nMore text.");
        assert_eq!(doc.chapters.len(), 1);
        assert_eq!(doc.chapters.labels(), vec![FULL_CONTENT_LABEL]);
        assert_eq!(doc.chapters.get(FULL_CONTENT_LABEL), Some("Some intro text.\nMore text."));
        assert_eq!(doc.full_text, "Some intro text.\nMore text.");
    }

    #[test]
    fn test_empty_text_still_has_one_unit() {
        let doc = segment("   \n  ");
        assert_eq!(doc.chapters.len(), 1);
        assert_eq!(doc.chapters.get(FULL_CONTENT_LABEL), Some(""));
    }

    #[test]
    fn test_headings_in_order() {
        let doc = segment("Chapter 1 Cells divide.\nChapter 2 Atoms bond.\nChapter 3 Stars burn.");
        assert_eq!(doc.chapters.labels(), vec!["Chapter 1", "Chapter 2", "Chapter 3"]);
        assert_eq!(doc.chapters.get("Chapter 2"), Some("Chapter 2 Atoms bond."));
        assert_eq!(doc.chapters.get("Chapter 3"), Some("Chapter 3 Stars burn."));
    }

    #[test]
    fn test_reverse_order_is_sorted_numerically() {
        let doc = segment("Chapter 2: ...content2... Chapter 1: ...content1...");
        assert_eq!(doc.chapters.labels(), vec!["Chapter 1", "Chapter 2"]);
        assert_eq!(doc.chapters.get("Chapter 1"), Some("Chapter 1: ...content1..."));
        assert_eq!(doc.chapters.get("Chapter 2"), Some("Chapter 2: ...content2..."));
    }

    #[test]
    fn test_numeric_not_textual_order() {
        let doc = segment("Chapter 10 ten. Chapter 9 nine. Chapter 2 two.");
        assert_eq!(doc.chapters.labels(), vec!["Chapter 2", "Chapter 9", "Chapter 10"]);
    }

    #[test]
    fn test_word_boundary() {
        let doc = segment("See Chapter 10x for details.");
        assert_eq!(doc.chapters.labels(), vec![FULL_CONTENT_LABEL]);

        let doc = segment("See Chapter 10.");
        assert_eq!(doc.chapters.labels(), vec!["Chapter 10"]);
        assert_eq!(doc.chapters.get("Chapter 10"), Some("Chapter 10."));

        let doc = segment("A subchapter 4 mention");
        assert_eq!(doc.chapters.labels(), vec![FULL_CONTENT_LABEL]);
    }

    #[test]
    fn test_case_insensitive_and_split_heading() {
        let doc = segment("CHAPTER\n4 Loud heading. chapter 5 quiet one.");
        assert_eq!(doc.chapters.labels(), vec!["CHAPTER 4", "chapter 5"]);
        assert_eq!(doc.chapters.by_number(4).unwrap().text, "CHAPTER\n4 Loud heading.");
    }

    #[test]
    fn test_duplicate_number_keeps_first() {
        let doc = segment("Chapter 3 first body. Chapter 4 middle. Chapter 3 second body.");
        assert_eq!(doc.chapters.labels(), vec!["Chapter 3", "Chapter 4"]);
        assert_eq!(doc.chapters.get("Chapter 3"), Some("Chapter 3 first body."));
        assert_eq!(doc.chapters.get("Chapter 4"), Some("Chapter 4 middle."));
    }

    #[test]
    fn test_preamble_before_first_heading_is_not_a_chapter() {
        let doc = segment("Table of contents. Chapter 1 Start.");
        assert_eq!(doc.chapters.len(), 1);
        assert_eq!(doc.chapters.get("Chapter 1"), Some("Chapter 1 Start."));
        assert_eq!(doc.full_text, "Table of contents. Chapter 1 Start.");
    }

    #[test]
    fn test_bodies_are_contiguous_spans() {
        let raw = "Chapter 1 alpha beta.\n\nChapter 2   gamma.\nChapter 3 delta epsilon.";
        let doc = segment(raw);
        assert_eq!(doc.chapters.len(), 3);

        let mut cursor = doc.full_text.find("Chapter 1").unwrap();
        for chapter in doc.chapters.iter() {
            let rest = &doc.full_text[cursor..];
            let gap = rest.find(&chapter.text).unwrap();
            assert!(rest[..gap].trim().is_empty(), "non-whitespace between chapters");
            cursor += gap + chapter.text.len();
        }
        assert!(doc.full_text[cursor..].trim().is_empty());
    }

    #[test]
    fn test_select_chapters() {
        let doc = segment("Chapter 1 one. Chapter 2 two. Chapter 3 three.");
        assert_eq!(doc.select(&[3, 1]).unwrap(), "Chapter 1 one.\n\nChapter 3 three.");
        assert_eq!(doc.select(&[]).unwrap(), doc.full_text);
        assert!(matches!(doc.select(&[7]), Err(ExamError::UnknownChapter(7))));
    }

    #[test]
    fn test_oversized_number_is_not_a_heading() {
        let doc = segment("Chapter 99999999999999999999999 huge");
        assert_eq!(doc.chapters.labels(), vec![FULL_CONTENT_LABEL]);
    }

    proptest! {
        #[test]
        fn segment_is_idempotent(
            parts in proptest::collection::vec(("[a-z ]{0,12}", 0u64..20), 0..6)
        ) {
            let raw: String = parts
                .iter()
                .map(|(filler, n)| format!("{filler}\nChapter {n} {filler}\n\n"))
                .collect();
            let first = segment(&raw);
            let second = segment(&first.full_text);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first, segment(&raw));
        }

        #[test]
        fn increasing_headings_yield_one_entry_each(count in 1usize..12) {
            let raw: String = (1..=count)
                .map(|n| format!("Chapter {n} body of number {n}.\n"))
                .collect();
            let doc = segment(&raw);
            prop_assert_eq!(doc.chapters.len(), count);
            let numbers: Vec<u64> = doc.chapters.iter().filter_map(|c| c.number).collect();
            let expected: Vec<u64> = (1..=count as u64).collect();
            prop_assert_eq!(numbers, expected);
        }
    }
}
