//! Fake metadata provider for integration tests.
//!
//! Serves `/metadata/{identifier}` on an ephemeral local port. The
//! identifier picks the behaviour:
//!
//! | Identifier | Response |
//! |------------|----------|
//! | `principleofrelat00eins` | 200, 25 files (22 pdf, 2 mp3, 1 txt) |
//! | `noident` | 200, metadata without `identifier` |
//! | `empty` | 200, `{}` |
//! | `garbled` | 200, HTML body |
//! | `broken` | 500 |
//! | `slow` | 200 after 3 seconds |
//! | anything else | 404 |

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

pub const RECORD: &str = "principleofrelat00eins";

#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn sample_files() -> Vec<String> {
    let mut names: Vec<String> = (1..=22).map(|i| format!("a{}.pdf", i)).collect();
    names.push("lecture1.mp3".to_string());
    names.push("lecture2.MP3".to_string());
    names.push("notes.txt".to_string());
    names
}

fn sample_document(identifier: Option<&str>) -> serde_json::Value {
    let files: Vec<serde_json::Value> = sample_files()
        .into_iter()
        .map(|name| json!({ "name": name, "source": "original", "size": "1024" }))
        .collect();
    let mut metadata = json!({
        "title": "The principle of relativity",
        "creator": ["Einstein, Albert", "Minkowski, H."],
        "year": "1920",
        "publisher": "Calcutta University",
        "language": "eng",
        "description": "Original papers on the special theory of relativity",
        "mediatype": "texts"
    });
    if let Some(id) = identifier {
        metadata["identifier"] = json!(id);
    }
    json!({
        "created": 1700000000,
        "d1": "ia600000.us.archive.org",
        "metadata": metadata,
        "files": files
    })
}

async fn metadata(State(hits): State<Hits>, Path(identifier): Path<String>) -> Response {
    hits.0.fetch_add(1, Ordering::SeqCst);
    match identifier.as_str() {
        RECORD => Json(sample_document(Some(RECORD))).into_response(),
        "noident" => Json(sample_document(None)).into_response(),
        "empty" => Json(json!({})).into_response(),
        "garbled" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(sample_document(Some("slow"))).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Start the provider; returns its base URL and a request counter.
pub async fn spawn_provider() -> (String, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/metadata/{identifier}", get(metadata))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), hits)
}

/// A base URL nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
