use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Extract the text of every page of a PDF file
///
/// Pages without text are skipped; the rest are labelled with their
/// one-based page number and separated by a blank line.
pub fn extract_text(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::Input(format!("PDF file not found: {}", path.display())));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| Error::Input(format!("Failed to read PDF file {}: {}", path.display(), e)))?;

    // pdf-extract panics on some malformed documents
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    }))
    .map_err(|_| {
        Error::Input(format!(
            "Failed to extract text from PDF: {} (parser crashed)",
            path.display()
        ))
    })?
    .map_err(|e| {
        Error::Input(format!(
            "Failed to extract text from PDF {}: {}",
            path.display(),
            e
        ))
    })?;

    let page_count = pages.len();
    let text = pages_to_text(pages)?;

    info!(
        "Extracted {} characters from {} pages of {}",
        text.chars().count(),
        page_count,
        path.display()
    );
    Ok(text)
}

/// Join the page texts, failing when no page has any text
fn pages_to_text(pages: Vec<String>) -> Result<String> {
    let text = join_pages(pages);
    if text.is_empty() {
        return Err(Error::Input(
            "Could not extract any text from the PDF.".to_string(),
        ));
    }
    Ok(text)
}

fn join_pages(pages: Vec<String>) -> String {
    pages
        .iter()
        .enumerate()
        .filter_map(|(idx, page)| {
            let cleaned = clean_pdf_text(page);
            if cleaned.is_empty() {
                debug!("Page {} has no extractable text", idx + 1);
                None
            } else {
                Some(format!("--- Page {} ---\n{}", idx + 1, cleaned))
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Clean up extracted PDF text
///
/// Lines are trimmed and runs of blank lines collapse to a single blank
/// line, so paragraph breaks survive for the chunker.
fn clean_pdf_text(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && lines.last().is_none_or(|last| last.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }

    lines
        .join("\n")
        // Remove common PDF artifacts
        .replace('\u{0}', "")
        .replace('\u{FEFF}', "")
}
