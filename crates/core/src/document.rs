use serde::{Deserialize, Serialize};

/// A single page of plain text extracted from the manual.
#[derive(Debug, Clone)]
pub struct PageText {
    /// 1-based page number as printed/stored (extraction works 0-indexed).
    pub page_number: usize,
    /// Raw extracted text for this page.
    pub text: String,
}

/// A contiguous span of manual text selected as troubleshooting-relevant.
///
/// Produced by the chunker when a flush boundary is reached (heading change,
/// word-count limit, or end of input) and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Accumulated words joined with single spaces.
    pub content: String,
    /// Lowest contributing page number.
    pub page_start: usize,
    /// Highest contributing page number.
    pub page_end: usize,
    /// Most recent heading line seen before this content.
    pub section: String,
}

/// Section tag for content that appears before any recognized heading.
pub const UNKNOWN_SECTION: &str = "Unknown Section";
