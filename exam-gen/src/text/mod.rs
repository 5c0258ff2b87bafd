//! Text processing for extracted documents: cleanup and chapter segmentation.

mod cleaner;
mod segmenter;

pub use cleaner::repair_extracted;
pub use segmenter::{SegmentedDocument, segment};
