pub mod chunker;
pub mod heading;
pub mod normalize;
mod pdf;

use thiserror::Error;

pub use chunker::extract_chunks;
pub use heading::is_heading;
pub use normalize::normalize;
pub use pdf::extract_pages;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("page range {start}..{end} outside document ({total} pages)")]
    PageRange {
        start: usize,
        end: usize,
        total: usize,
    },
}
