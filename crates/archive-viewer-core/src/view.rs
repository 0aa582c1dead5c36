//! File-list view-model: search filtering, pagination and page controls.
//!
//! Everything here is a pure function of an [`ArchiveDocument`] and a
//! [`ViewState`]. Derivations are cheap and are recomputed on every input
//! change rather than cached.
//!
//! # Page numbering
//!
//! Pages are 1-based. A search with zero matches has **zero pages**: page
//! controls are suppressed and every slice is empty, while
//! [`ViewState::current_page`] stays at 1.

use serde::Serialize;

use crate::links;
use crate::models::{ArchiveDocument, FileEntry};

/// Entries shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Entries whose name contains `search_term`, ignoring case, in document order.
///
/// An empty term matches every entry. Duplicate names are kept.
pub fn filtered_files<'a>(document: &'a ArchiveDocument, search_term: &str) -> Vec<&'a FileEntry> {
    matching(document, search_term).map(|(_, file)| file).collect()
}

/// Number of pages needed for `filtered` at `page_size` entries per page.
///
/// Zero when `filtered` is empty.
pub fn page_count<T>(filtered: &[T], page_size: usize) -> usize {
    filtered.len().div_ceil(page_size.max(1))
}

/// The window of `filtered` shown on `current_page`.
///
/// Out-of-range pages (including 0) yield an empty slice.
pub fn visible_slice<T>(filtered: &[T], current_page: usize, page_size: usize) -> &[T] {
    if current_page == 0 || page_size == 0 {
        return &[];
    }
    let start = (current_page - 1).saturating_mul(page_size);
    if start >= filtered.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(filtered.len());
    &filtered[start..end]
}

/// Matching entries paired with their position in `document.files`.
fn matching<'a>(
    document: &'a ArchiveDocument,
    search_term: &str,
) -> impl Iterator<Item = (usize, &'a FileEntry)> + 'a {
    let needle = search_term.to_lowercase();
    document
        .files
        .iter()
        .enumerate()
        .filter(move |(_, file)| needle.is_empty() || file.name.to_lowercase().contains(&needle))
}

/// A user input that changes the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Search(String),
    ClearSearch,
    Page(usize),
    Next,
    Previous,
}

/// Search and page selection for one session.
///
/// Owned by the presentation layer and passed explicitly to every
/// derivation. `current_page` is kept within `[1, max(1, page_count)]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    search_term: String,
    current_page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    /// Fresh state on page 1 with an empty search. A `page_size` of 0 is
    /// raised to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the search term and return to page 1.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.current_page = 1;
    }

    /// Jump to page `n` if it exists for the current search.
    ///
    /// Returns `false` and leaves the state untouched otherwise.
    pub fn set_page(&mut self, document: &ArchiveDocument, n: usize) -> bool {
        if n < 1 || n > self.page_count(document) {
            return false;
        }
        self.current_page = n;
        true
    }

    pub fn next_page(&mut self, document: &ArchiveDocument) -> bool {
        self.set_page(document, self.current_page.saturating_add(1))
    }

    pub fn previous_page(&mut self, document: &ArchiveDocument) -> bool {
        self.set_page(document, self.current_page.saturating_sub(1))
    }

    /// Pull `current_page` back into range after the document changed.
    pub fn clamp_page(&mut self, document: &ArchiveDocument) {
        let pages = self.page_count(document);
        self.current_page = self.current_page.clamp(1, pages.max(1));
    }

    /// Apply one input event. Returns whether the state changed.
    pub fn apply(&mut self, document: &ArchiveDocument, event: ViewEvent) -> bool {
        match event {
            ViewEvent::Search(term) => {
                let changed = term != self.search_term || self.current_page != 1;
                self.set_search_term(term);
                changed
            }
            ViewEvent::ClearSearch => {
                let changed = !self.search_term.is_empty() || self.current_page != 1;
                self.set_search_term(String::new());
                changed
            }
            ViewEvent::Page(n) => {
                let before = self.current_page;
                self.set_page(document, n) && before != n
            }
            ViewEvent::Next => self.next_page(document),
            ViewEvent::Previous => self.previous_page(document),
        }
    }

    pub fn filtered<'a>(&self, document: &'a ArchiveDocument) -> Vec<&'a FileEntry> {
        filtered_files(document, &self.search_term)
    }

    pub fn page_count(&self, document: &ArchiveDocument) -> usize {
        page_count(&self.filtered(document), self.page_size)
    }

    /// Derive everything needed to display the current page.
    ///
    /// `base_url` is the provider root used for download links.
    pub fn page<'a>(&'a self, document: &'a ArchiveDocument, base_url: &str) -> FilePage<'a> {
        let matches: Vec<(usize, &FileEntry)> = matching(document, &self.search_term).collect();
        let pages = page_count(&matches, self.page_size);
        let identifier = document.identifier();

        let rows = visible_slice(&matches, self.current_page, self.page_size)
            .iter()
            .map(|(position, file)| FileRow {
                position: *position,
                name: &file.name,
                download_url: links::download_url(base_url, identifier, &file.name),
            })
            .collect();

        FilePage {
            search_term: &self.search_term,
            current_page: self.current_page,
            page_count: pages,
            page_size: self.page_size,
            total_files: document.files.len(),
            total_matches: matches.len(),
            rows,
            controls: PageControls::new(self.current_page, pages),
        }
    }
}

/// One visible row of the file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRow<'a> {
    /// Index of the entry in `document.files`.
    pub position: usize,
    pub name: &'a str,
    pub download_url: String,
}

/// Pagination buttons for the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageControls {
    pub previous: Option<usize>,
    pub next: Option<usize>,
    pub numbered: Vec<usize>,
}

impl PageControls {
    pub fn new(current_page: usize, page_count: usize) -> Self {
        if page_count == 0 {
            return Self::default();
        }
        Self {
            previous: (current_page > 1).then(|| current_page - 1),
            next: (current_page < page_count).then(|| current_page + 1),
            numbered: (1..=page_count).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.numbered.is_empty()
    }
}

/// Snapshot of the file list as the user currently sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePage<'a> {
    pub search_term: &'a str,
    pub current_page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_files: usize,
    pub total_matches: usize,
    pub rows: Vec<FileRow<'a>>,
    pub controls: PageControls,
}

impl FilePage<'_> {
    /// True when the search matched nothing. Not an error.
    pub fn is_empty_result(&self) -> bool {
        self.total_matches == 0
    }
}
