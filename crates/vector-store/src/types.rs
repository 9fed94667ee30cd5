use retrieval_text_chunker::Metadata;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A stored vector and its metadata; the key lives in the owning map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub vector: Vec<f32>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredEntry {
    pub entry: Entry,
    /// Order of the first insertion of this key, used to break score ties
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub key: String,
    pub score: f32,
    pub metadata: Metadata,
}

/// Ranked output of a text query: full results, or keys only
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchOutput {
    Results(Vec<SearchResult>),
    Texts(Vec<String>),
}

impl SearchOutput {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Results(results) => results.len(),
            Self::Texts(texts) => texts.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ranked keys regardless of shape
    #[must_use]
    pub fn into_texts(self) -> Vec<String> {
        match self {
            Self::Results(results) => results.into_iter().map(|r| r.key).collect(),
            Self::Texts(texts) => texts,
        }
    }
}

/// Exact-match predicate over entry metadata
///
/// An entry passes when every required field is present with an equal value.
/// An empty filter accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    required: HashMap<String, String>,
}

impl MetadataFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: require `field == value`
    #[must_use]
    pub fn field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.required.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    #[must_use]
    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.required
            .iter()
            .all(|(field, value)| metadata.get(field) == Some(value))
    }
}

impl From<HashMap<String, String>> for MetadataFilter {
    fn from(required: HashMap<String, String>) -> Self {
        Self { required }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetadataFilter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            required: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
