//! Presentation context for one viewing session.
//!
//! A [`Session`] owns the loader, the loaded document (once available) and
//! the [`ViewState`]. Front ends (the one-shot CLI commands and the
//! interactive browser) drive it with [`ViewEvent`]s and read back a
//! [`FilePage`].

use std::sync::Arc;

use anyhow::Result;
use archive_viewer_core::models::ArchiveDocument;
use archive_viewer_core::view::{FilePage, ViewEvent, ViewState};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::loader::{LoadError, LoadState, MetadataLoader};

pub struct Session {
    identifier: String,
    loader: Arc<MetadataLoader>,
    document: Option<Arc<ArchiveDocument>>,
    view: ViewState,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            identifier: config.record.identifier.clone(),
            loader: Arc::new(MetadataLoader::new(&config.provider)?),
            document: None,
            view: ViewState::new(config.view.page_size),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn base_url(&self) -> &str {
        self.loader.base_url()
    }

    pub fn load_state(&self) -> LoadState {
        self.loader.state()
    }

    /// Load inline and keep the document on success.
    pub async fn load(&mut self) -> Result<Arc<ArchiveDocument>, LoadError> {
        let doc = self.loader.load(&self.identifier).await?;
        self.adopt(LoadState::Loaded(Arc::clone(&doc)));
        Ok(doc)
    }

    /// Start loading in the background. Pair with [`subscribe`](Self::subscribe)
    /// and [`adopt`](Self::adopt).
    pub fn start(&self) -> JoinHandle<Result<Arc<ArchiveDocument>, LoadError>> {
        Arc::clone(&self.loader).spawn(self.identifier.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.loader.subscribe()
    }

    /// Take the document out of a settled state.
    ///
    /// The document is set at most once. The page is re-clamped against it.
    pub fn adopt(&mut self, state: LoadState) {
        if self.document.is_some() {
            return;
        }
        if let Some(doc) = state.document() {
            self.view.clamp_page(&doc);
            self.document = Some(doc);
        }
    }

    pub fn document(&self) -> Option<&ArchiveDocument> {
        self.document.as_deref()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Apply an input event. Ignored until a document is loaded.
    pub fn apply(&mut self, event: ViewEvent) -> bool {
        match &self.document {
            Some(doc) => self.view.apply(doc, event),
            None => {
                tracing::debug!(?event, "no document loaded; ignoring view event");
                false
            }
        }
    }

    /// The current page, or `None` before the document is loaded.
    pub fn page(&self) -> Option<FilePage<'_>> {
        let doc = self.document.as_deref()?;
        Some(self.view.page(doc, self.loader.base_url()))
    }
}
