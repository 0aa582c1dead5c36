//! # Archive Viewer Core
//!
//! Pure logic for Archive Viewer: the record data model, the file-list
//! view-model (search, pagination, page controls) and download-link
//! derivation.
//!
//! This crate performs no I/O and has no async runtime dependency. The
//! application crate fetches the record and hands the parsed
//! [`models::ArchiveDocument`] to [`view::ViewState`].

pub mod links;
pub mod models;
pub mod view;
