use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Free-form string metadata attached to a chunk
pub type Metadata = HashMap<String, String>;

/// Metadata field that records which document a chunk came from
pub const SOURCE_KEY: &str = "source";

/// A loaded document awaiting splitting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Full document text
    pub text: String,

    /// Name the document is attributed to (usually the file name)
    pub source: String,
}

impl Document {
    #[must_use]
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// A bounded fragment of a document together with its metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextChunk {
    /// The chunk text (also used as the store key)
    pub text: String,

    /// Attribution and any caller-supplied fields
    #[serde(default)]
    pub metadata: Metadata,
}

impl TextChunk {
    /// Create a chunk without metadata
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Builder: set a metadata field
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(field.into(), value.into());
        self
    }

    /// Source the chunk was split from, if stamped
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }

    /// Length in characters
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl From<(String, Metadata)> for TextChunk {
    fn from((text, metadata): (String, Metadata)) -> Self {
        Self { text, metadata }
    }
}

impl From<&str> for TextChunk {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Metadata map carrying only the source attribution
#[must_use]
pub fn source_metadata(source: &str) -> Metadata {
    let mut metadata = Metadata::with_capacity(1);
    metadata.insert(SOURCE_KEY.to_string(), source.to_string());
    metadata
}
