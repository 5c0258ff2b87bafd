// PDF loading and text extraction

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::error::{ExamError, Result};
use crate::text::repair_extracted;

const HASH_PREFIX_BYTES: usize = 1024 * 1024;

/// Text pulled out of a PDF file
#[derive(Debug, Clone)]
pub struct ExtractedPdf {
    /// File name for display and persistence
    pub source_name: String,
    /// Short content hash identifying the document
    pub source_hash: String,
    pub text: String,
}

/// Read a PDF from disk and extract its text
pub fn extract_pdf(path: &Path) -> Result<ExtractedPdf> {
    let bytes = std::fs::read(path)?;
    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let text = extract_text(&bytes, &source_name)?;

    Ok(ExtractedPdf {
        source_hash: document_hash(&bytes),
        source_name,
        text,
    })
}

/// Extract text from PDF bytes.
///
/// A document that parses but has no text (typically scanned pages) is
/// reported as `ExtractionEmpty` rather than returned as an empty string.
pub fn extract_text(bytes: &[u8], source_name: &str) -> Result<String> {
    let raw =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExamError::Pdf(e.to_string()))?;
    finish_extraction(&raw, source_name)
}

/// Repair raw extractor output; nothing left but whitespace is an error
fn finish_extraction(raw: &str, source_name: &str) -> Result<String> {
    let text = repair_extracted(raw);

    if text.trim().is_empty() {
        return Err(ExamError::ExtractionEmpty {
            source_name: source_name.to_string(),
        });
    }

    log::debug!("Extracted {} characters from {}", text.len(), source_name);
    Ok(text)
}

/// First 16 hex characters of the SHA-256 of the first MB.
pub fn document_hash(bytes: &[u8]) -> String {
    let prefix = &bytes[..bytes.len().min(HASH_PREFIX_BYTES)];
    let digest = Sha256::digest(prefix);
    format!("{:x}", digest)[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_document_hash_shape() {
        let hash = document_hash(b"some pdf bytes");
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, document_hash(b"some pdf bytes"));
        assert_ne!(hash, document_hash(b"other pdf bytes"));
    }

    #[test]
    fn test_hash_ignores_bytes_past_prefix() {
        let mut a = vec![7u8; HASH_PREFIX_BYTES];
        let mut b = a.clone();
        a.push(1);
        b.push(2);
        assert_eq!(document_hash(&a), document_hash(&b));
    }

    #[test]
    fn test_textless_extraction_is_empty_error() {
        let err = finish_extraction("  \u{200b}\n\u{feff}\t", "scan.pdf").unwrap_err();
        match err {
            ExamError::ExtractionEmpty { source_name } => assert_eq!(source_name, "scan.pdf"),
            other => panic!("expected ExtractionEmpty, got {other:?}"),
        }
    }

    #[test]
    fn test_extraction_keeps_repaired_text() {
        let text = finish_extraction("Chapter 1\n\u{fb01}sh live in water", "bio.pdf").unwrap();
        assert_eq!(text, "Chapter 1\nfish live in water");
    }

    #[test]
    fn test_garbage_is_pdf_error() {
        let err = extract_text(b"definitely not a pdf", "junk.pdf").unwrap_err();
        assert!(matches!(err, ExamError::Pdf(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = extract_pdf(&dir.path().join("absent.pdf")).unwrap_err();
        assert!(matches!(err, ExamError::Io(_)));
    }
}
