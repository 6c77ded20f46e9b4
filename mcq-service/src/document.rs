//! Page text assembly.
//!
//! PDF parsing happens upstream; this module only decides which page texts
//! reach the generator.

/// Join the text of the first `max_pages` pages, skipping blank ones.
///
/// Pages are separated by a blank line. Returns an empty string when no
/// page within the limit carries text.
///
/// ```
/// use mcq_service::document::assemble_pages;
///
/// let pages = ["Intro", "   ", "Body", "Appendix"];
/// assert_eq!(assemble_pages(&pages, 3), "Intro\n\nBody");
/// ```
#[must_use]
pub fn assemble_pages<S: AsRef<str>>(pages: &[S], max_pages: usize) -> String {
    pages
        .iter()
        .take(max_pages)
        .map(AsRef::as_ref)
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split a plain-text export into pages on form feeds.
///
/// Text without form feeds is a single page.
#[must_use]
pub fn split_pages(text: &str) -> Vec<&str> {
    text.split('\u{c}').collect()
}
