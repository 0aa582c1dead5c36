//! # Archive Viewer
//!
//! Browse the file listing of a single remote archive record: fetch its
//! metadata document once, then search file names and page through the
//! results.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────┐   ┌──────────────┐
//! │   Loader     │──▶│   View-model    │──▶│  Render /    │
//! │ GET metadata │   │ filter + pages  │   │  browse loop │
//! └──────────────┘   └─────────────────┘   └──────────────┘
//!   (this crate)    (archive-viewer-core)     (this crate)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! arcv info                       # record metadata
//! arcv files --search pdf         # first page of matching files
//! arcv files --page 2 --json      # page 2 as JSON
//! arcv url book.pdf               # download link for one file
//! arcv browse                     # interactive search and paging
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`loader`] | One-shot metadata fetch and load state machine |
//! | [`session`] | Presentation context: loader, document, view state |
//! | [`render`] | Plain-text output |
//! | [`browse`] | Interactive command loop |

pub mod browse;
pub mod config;
pub mod loader;
pub mod render;
pub mod session;
