//! Per-run study state: the loaded document and the latest question batch.

use crate::pdf::ExtractedPdf;
use crate::quiz::QuestionRecord;
use crate::text::{SegmentedDocument, segment};

/// Identity of the loaded document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub name: String,
    pub hash: String,
}

#[derive(Debug, Default)]
pub struct StudySession {
    source: Option<SourceInfo>,
    document: Option<SegmentedDocument>,
    batch: Vec<QuestionRecord>,
}

impl StudySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment and install a newly extracted document.
    ///
    /// Chapters and questions from the previous document are discarded.
    pub fn load_document(&mut self, pdf: ExtractedPdf) -> &SegmentedDocument {
        let document = segment(&pdf.text);
        log::info!(
            "Loaded {} with {} chapter(s)",
            pdf.source_name,
            document.chapters.len()
        );

        self.source = Some(SourceInfo {
            name: pdf.source_name,
            hash: pdf.source_hash,
        });
        self.batch.clear();
        self.document.insert(document)
    }

    pub fn document(&self) -> Option<&SegmentedDocument> {
        self.document.as_ref()
    }

    pub fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }

    /// Swap in a fresh batch; nothing from the old batch survives
    pub fn replace_batch(&mut self, batch: Vec<QuestionRecord>) {
        self.batch = batch;
    }

    pub fn batch(&self) -> &[QuestionRecord] {
        &self.batch
    }
}
