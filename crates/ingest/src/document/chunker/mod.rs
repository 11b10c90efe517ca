//! Streaming, heading-aware chunk extraction.
//!
//! Single pass over normalized page text. An explicit accumulator collects
//! words and contributing page numbers; it is flushed on a heading change, on
//! reaching the word limit, and at end of input. Flush output is filtered by
//! length and keyword relevance — this is a lossy, relevance-first
//! segmentation, not a lossless one.

#[cfg(test)]
mod tests;

use troubledesk_core::config::ChunkingConfig;
use troubledesk_core::{Chunk, PageText, UNKNOWN_SECTION};

use super::heading::is_heading;
use super::normalize::normalize;

/// Pending chunk state carried through the segmentation loop.
#[derive(Debug, Default)]
struct Accumulator {
    words: Vec<String>,
    /// One entry per contributing line, duplicates allowed; page_start and
    /// page_end derive from min/max.
    pages: Vec<usize>,
}

impl Accumulator {
    fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Finalize pending words into a candidate chunk and reset. Candidates
    /// below the length floor or without a relevant keyword are dropped.
    fn flush(&mut self, section: &str, cfg: &ChunkingConfig) -> Option<Chunk> {
        let words = std::mem::take(&mut self.words);
        let pages = std::mem::take(&mut self.pages);

        let content = words.join(" ");
        if content.len() < cfg.min_chars {
            return None;
        }
        let lower = content.to_lowercase();
        if !cfg.keywords.iter().any(|k| lower.contains(k.as_str())) {
            return None;
        }

        let page_start = pages.iter().copied().min()?;
        let page_end = pages.iter().copied().max()?;
        Some(Chunk {
            content,
            page_start,
            page_end,
            section: section.to_string(),
        })
    }
}

/// Extract relevance-filtered chunks from pages, in ascending page order.
pub fn extract_chunks(pages: &[PageText], cfg: &ChunkingConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut acc = Accumulator::default();
    let mut section = UNKNOWN_SECTION.to_string();

    for page in pages {
        let cleaned = normalize(&page.text);
        for line in cleaned.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if is_heading(line) {
                // Content gathered so far belongs to the previous section.
                if !acc.is_empty() {
                    chunks.extend(acc.flush(&section, cfg));
                }
                section = line.to_string();
                // The heading itself is a tag, not chunk content.
                continue;
            }

            let words: Vec<&str> = line.split_whitespace().collect();
            if acc.words.len() + words.len() >= cfg.max_words {
                chunks.extend(acc.flush(&section, cfg));
            }

            acc.words.extend(words.iter().map(|w| w.to_string()));
            acc.pages.push(page.page_number);
        }
    }

    if !acc.is_empty() {
        chunks.extend(acc.flush(&section, cfg));
    }

    chunks
}
