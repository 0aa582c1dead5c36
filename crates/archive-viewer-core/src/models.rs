//! Record data model.
//!
//! These types mirror the subset of the provider's metadata document that the
//! viewer consumes. Everything else in the payload is ignored on parse.

use serde::{Deserialize, Deserializer, Serialize};

/// Metadata keys the viewer reads, in display order.
pub const METADATA_FIELDS: [&str; 7] = [
    "title",
    "creator",
    "year",
    "publisher",
    "language",
    "description",
    "identifier",
];

/// The full metadata payload for one remote record.
///
/// Built once per successful load and never mutated afterwards. A payload
/// without both `metadata` and `files` does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveDocument {
    pub metadata: ArchiveMetadata,
    pub files: Vec<FileEntry>,
}

impl ArchiveDocument {
    /// Parse a provider response body.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Fill in `metadata.identifier` when the payload left it out.
    pub fn with_identifier_fallback(mut self, identifier: &str) -> Self {
        if self.metadata.identifier.is_none() {
            self.metadata.identifier = Some(identifier.to_string());
        }
        self
    }

    /// Record identifier, or `""` if the payload carried none.
    pub fn identifier(&self) -> &str {
        self.metadata.identifier.as_deref().unwrap_or("")
    }
}

/// Descriptive fields of a record.
///
/// The provider sends most of these as plain strings but some records carry
/// arrays (several creators, multi-paragraph descriptions) or bare numbers
/// (`year`). All of them are flattened to a single string here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    #[serde(default, deserialize_with = "text_field")]
    pub identifier: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub publisher: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub description: Option<String>,
}

impl ArchiveMetadata {
    /// Look up a field by its wire name.
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "identifier" => &self.identifier,
            "title" => &self.title,
            "creator" => &self.creator,
            "year" => &self.year,
            "publisher" => &self.publisher,
            "language" => &self.language,
            "description" => &self.description,
            _ => return None,
        };
        value.as_deref()
    }

    /// All known fields as `(key, value)` pairs in [`METADATA_FIELDS`] order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        METADATA_FIELDS.iter().map(move |key| (*key, self.get(key)))
    }
}

/// One downloadable item of a record.
///
/// Only `name` is consumed. Two entries with the same name stay distinct;
/// callers key them by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
}

impl FileEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    List(Vec<TextValue>),
}

impl TextValue {
    fn into_text(self) -> Option<String> {
        match self {
            TextValue::Text(s) => Some(s),
            TextValue::Number(n) => Some(n.to_string()),
            TextValue::Bool(b) => Some(b.to_string()),
            TextValue::List(items) => {
                let parts: Vec<String> = items.into_iter().filter_map(TextValue::into_text).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("; "))
                }
            }
        }
    }
}

fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextValue>::deserialize(deserializer)?.and_then(TextValue::into_text))
}
