//! Plain-text rendering of records and file pages.
//!
//! All functions return `String`s so the CLI and the interactive browser can
//! print them and tests can inspect them.

use std::fmt::Write;

use archive_viewer_core::models::ArchiveDocument;
use archive_viewer_core::view::{FilePage, PageControls};

const UNKNOWN: &str = "(unknown)";

/// Title line plus the summary fields shown above the file list.
pub fn render_header(doc: &ArchiveDocument) -> String {
    let meta = &doc.metadata;
    let title = meta.title.as_deref().unwrap_or(doc.identifier());
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count().max(1)));
    for (label, value) in [
        ("Creator", &meta.creator),
        ("Year", &meta.year),
        ("Publisher", &meta.publisher),
        ("Language", &meta.language),
    ] {
        let _ = writeln!(out, "{:<11} {}", format!("{}:", label), value.as_deref().unwrap_or(UNKNOWN));
    }
    if let Some(desc) = &meta.description {
        let _ = writeln!(out, "{:<11} {}", "Description:", desc);
    }
    out
}

/// Every known metadata field plus the file count.
pub fn render_info(doc: &ArchiveDocument) -> String {
    let mut out = String::new();
    for (key, value) in doc.metadata.fields() {
        let _ = writeln!(out, "{:<12} {}", format!("{}:", key), value.unwrap_or(UNKNOWN));
    }
    let _ = writeln!(out, "{:<12} {}", "files:", doc.files.len());
    out
}

/// The visible rows, a match summary and the page controls.
pub fn render_page(page: &FilePage<'_>) -> String {
    let mut out = String::new();

    if page.search_term.is_empty() {
        let _ = writeln!(out, "Files ({})", page.total_files);
    } else {
        let _ = writeln!(
            out,
            "Files matching \"{}\" ({} of {})",
            page.search_term, page.total_matches, page.total_files
        );
    }

    if page.is_empty_result() {
        if page.search_term.is_empty() {
            let _ = writeln!(out, "  This record has no files.");
        } else {
            let _ = writeln!(out, "  No files match \"{}\".", page.search_term);
        }
        return out;
    }

    let first_row = (page.current_page - 1) * page.page_size + 1;
    let width = (first_row + page.rows.len()).to_string().len();
    for (i, row) in page.rows.iter().enumerate() {
        let _ = writeln!(out, "  {:>width$}. {}", first_row + i, row.name, width = width);
        let _ = writeln!(out, "  {:>width$}  {}", "", row.download_url, width = width);
    }

    if let Some(controls) = render_controls(&page.controls, page.current_page) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", controls);
    }
    out
}

/// `< prev  1 [2] 3  next >`, or `None` when there are no pages.
pub fn render_controls(controls: &PageControls, current_page: usize) -> Option<String> {
    if controls.is_empty() {
        return None;
    }
    let mut parts = Vec::with_capacity(controls.numbered.len() + 2);
    if controls.previous.is_some() {
        parts.push("< prev".to_string());
    }
    for n in &controls.numbered {
        if *n == current_page {
            parts.push(format!("[{}]", n));
        } else {
            parts.push(n.to_string());
        }
    }
    if controls.next.is_some() {
        parts.push("next >".to_string());
    }
    Some(parts.join("  "))
}

pub fn render_loading(identifier: &str) -> String {
    format!("Loading metadata for '{}'...", identifier)
}

pub fn render_failure(identifier: &str, cause: &str) -> String {
    format!("Failed to load metadata for '{}': {}", identifier, cause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archive_viewer_core::models::{ArchiveMetadata, FileEntry};
    use archive_viewer_core::view::ViewState;

    fn doc(count: usize) -> ArchiveDocument {
        ArchiveDocument {
            metadata: ArchiveMetadata {
                identifier: Some("principleofrelat00eins".into()),
                title: Some("The principle of relativity".into()),
                creator: Some("Einstein, Albert".into()),
                year: Some("1920".into()),
                ..Default::default()
            },
            files: (1..=count)
                .map(|i| FileEntry::new(format!("a{}.pdf", i)))
                .collect(),
        }
    }

    #[test]
    fn header_shows_known_and_unknown_fields() {
        let out = render_header(&doc(0));
        assert!(out.starts_with("The principle of relativity\n"));
        assert!(out.contains("Creator:    Einstein, Albert"));
        assert!(out.contains("Publisher:  (unknown)"));
        assert!(!out.contains("Description:"));
    }

    #[test]
    fn header_falls_back_to_identifier() {
        let mut d = doc(0);
        d.metadata.title = None;
        assert!(render_header(&d).starts_with("principleofrelat00eins\n"));
    }

    #[test]
    fn info_lists_every_field() {
        let out = render_info(&doc(3));
        assert!(out.contains("identifier:  principleofrelat00eins"));
        assert!(out.contains("language:    (unknown)"));
        assert!(out.contains("files:       3"));
    }

    #[test]
    fn page_rows_are_numbered_absolutely() {
        let d = doc(25);
        let mut state = ViewState::default();
        assert!(state.set_page(&d, 3));
        let out = render_page(&state.page(&d, "https://archive.org"));
        assert!(out.contains("Files (25)"));
        assert!(out.contains("21. a21.pdf"));
        assert!(out.contains("https://archive.org/download/principleofrelat00eins/a25.pdf"));
        assert!(!out.contains("a20.pdf"));
        assert!(out.contains("< prev  1  2  [3]"));
        assert!(!out.contains("next >"));
    }

    #[test]
    fn no_match_state_has_no_controls() {
        let d = doc(5);
        let mut state = ViewState::default();
        state.set_search_term("mp3");
        let out = render_page(&state.page(&d, "https://archive.org"));
        assert!(out.contains("Files matching \"mp3\" (0 of 5)"));
        assert!(out.contains("No files match \"mp3\"."));
        assert!(!out.contains("[1]"));
    }

    #[test]
    fn empty_record() {
        let d = doc(0);
        let state = ViewState::default();
        let out = render_page(&state.page(&d, "https://archive.org"));
        assert!(out.contains("This record has no files."));
    }

    #[test]
    fn controls_layout() {
        let c = PageControls::new(2, 3);
        assert_eq!(render_controls(&c, 2).unwrap(), "< prev  1  [2]  3  next >");
        assert_eq!(render_controls(&PageControls::new(1, 0), 1), None);
    }

    #[test]
    fn failure_message_names_record() {
        let out = render_failure("rec", "provider answered HTTP 404 Not Found");
        assert_eq!(
            out,
            "Failed to load metadata for 'rec': provider answered HTTP 404 Not Found"
        );
    }
}
