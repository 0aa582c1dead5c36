//! One-shot metadata loader.
//!
//! Fetches `<base_url>/metadata/<identifier>` once per session and publishes
//! the outcome on a [`watch`] channel. The state machine is
//!
//! ```text
//! Idle ──load()──▶ Loading ──┬──▶ Loaded(document)
//!                            └──▶ Failed(cause)
//! ```
//!
//! `Loaded` and `Failed` are terminal. There is no retry and no refresh: a
//! second [`MetadataLoader::load`] call is rejected without touching the
//! network. No timeout is applied unless `provider.timeout_secs` is set, so a
//! hung provider leaves the loader in `Loading`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use archive_viewer_core::links;
use archive_viewer_core::models::ArchiveDocument;
use reqwest::StatusCode;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ProviderConfig;

/// Where the loader is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded(Arc<ArchiveDocument>),
    /// Human-readable cause of the failure.
    Failed(String),
}

impl LoadState {
    /// True for the terminal states.
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Loaded(_) | LoadState::Failed(_))
    }

    pub fn document(&self) -> Option<Arc<ArchiveDocument>> {
        match self {
            LoadState::Loaded(doc) => Some(Arc::clone(doc)),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("record identifier must not be empty")]
    EmptyIdentifier,

    #[error("metadata load was already started for this session")]
    AlreadyStarted,

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("provider answered HTTP {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("malformed metadata document from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Fetches one record's metadata document.
pub struct MetadataLoader {
    client: reqwest::Client,
    base_url: String,
    state: watch::Sender<LoadState>,
}

impl MetadataLoader {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("arcv/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        let (state, _) = watch::channel(LoadState::Idle);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            state,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    /// Run the single load attempt for this session.
    ///
    /// Moves `Idle → Loading` before anything else, so an invalid identifier
    /// still consumes the attempt and ends in `Failed`.
    pub async fn load(&self, identifier: &str) -> Result<Arc<ArchiveDocument>, LoadError> {
        let claimed = self.state.send_if_modified(|state| {
            if *state == LoadState::Idle {
                *state = LoadState::Loading;
                true
            } else {
                false
            }
        });
        if !claimed {
            tracing::warn!(identifier, "ignoring repeated metadata load");
            return Err(LoadError::AlreadyStarted);
        }

        tracing::info!(identifier, "loading record metadata");
        let result = self.fetch(identifier.trim()).await;

        match &result {
            Ok(doc) => {
                tracing::info!(
                    identifier = doc.identifier(),
                    files = doc.files.len(),
                    "record metadata loaded"
                );
                self.state.send_replace(LoadState::Loaded(Arc::clone(doc)));
            }
            Err(e) => {
                tracing::warn!(identifier, error = %e, "record metadata load failed");
                self.state.send_replace(LoadState::Failed(e.to_string()));
            }
        }
        result
    }

    /// Run [`load`](Self::load) as a background task.
    pub fn spawn(
        self: Arc<Self>,
        identifier: String,
    ) -> JoinHandle<Result<Arc<ArchiveDocument>, LoadError>> {
        tokio::spawn(async move { self.load(&identifier).await })
    }

    async fn fetch(&self, identifier: &str) -> Result<Arc<ArchiveDocument>, LoadError> {
        if identifier.is_empty() {
            return Err(LoadError::EmptyIdentifier);
        }

        let url = links::metadata_url(&self.base_url, identifier);
        tracing::debug!(%url, "GET metadata");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| LoadError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status { status, url });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| LoadError::Transport {
                url: url.clone(),
                source,
            })?;
        tracing::debug!(bytes = body.len(), "metadata response received");

        let document = ArchiveDocument::from_slice(&body)
            .map_err(|source| LoadError::Malformed { url, source })?
            .with_identifier_fallback(identifier);

        Ok(Arc::new(document))
    }
}

/// Wait until the loader reaches a terminal state.
///
/// Returns the last observed state if the loader is dropped first.
pub async fn wait_settled(rx: &mut watch::Receiver<LoadState>) -> LoadState {
    if rx.wait_for(LoadState::is_settled).await.is_err() {
        tracing::debug!("loader dropped before settling");
    }
    rx.borrow().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> MetadataLoader {
        MetadataLoader::new(&ProviderConfig::default()).unwrap()
    }

    #[test]
    fn starts_idle() {
        let l = loader();
        assert_eq!(l.state(), LoadState::Idle);
        assert!(!l.state().is_settled());
        assert_eq!(l.base_url(), "https://archive.org");
    }

    #[tokio::test]
    async fn blank_identifier_fails_and_consumes_attempt() {
        let l = loader();
        let mut rx = l.subscribe();

        let err = l.load("   ").await.unwrap_err();
        assert!(matches!(err, LoadError::EmptyIdentifier));
        assert!(matches!(l.state(), LoadState::Failed(_)));
        assert!(matches!(wait_settled(&mut rx).await, LoadState::Failed(_)));

        let err = l.load("principleofrelat00eins").await.unwrap_err();
        assert!(matches!(err, LoadError::AlreadyStarted));
        assert!(matches!(l.state(), LoadState::Failed(_)));
    }

    #[test]
    fn settled_states() {
        assert!(!LoadState::Idle.is_settled());
        assert!(!LoadState::Loading.is_settled());
        assert!(LoadState::Failed("x".into()).is_settled());
        assert_eq!(LoadState::Failed("x".into()).document(), None);
    }
}
