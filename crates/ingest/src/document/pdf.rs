use troubledesk_core::PageText;

use super::ExtractionError;

/// Extract the pages in `[start_page, end_page)` (0-indexed) as plain text.
///
/// pdf-extract returns the whole document as one string with form feed
/// characters (`\x0C`) separating pages. Stored page numbers are 1-based.
pub fn extract_pages(
    bytes: &[u8],
    start_page: usize,
    end_page: usize,
) -> Result<Vec<PageText>, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;
    select_range(&text, start_page, end_page)
}

fn select_range(
    text: &str,
    start_page: usize,
    end_page: usize,
) -> Result<Vec<PageText>, ExtractionError> {
    let all_pages: Vec<&str> = if text.contains('\x0C') {
        text.split('\x0C').collect()
    } else {
        // No page breaks found — treat as a single page.
        vec![text]
    };

    if start_page >= all_pages.len() {
        return Err(ExtractionError::PageRange {
            start: start_page,
            end: end_page,
            total: all_pages.len(),
        });
    }

    let end = end_page.min(all_pages.len());
    let pages = all_pages[start_page..end]
        .iter()
        .enumerate()
        .map(|(i, page_text)| PageText {
            page_number: start_page + i + 1,
            text: page_text.to_string(),
        })
        .collect();

    Ok(pages)
}
