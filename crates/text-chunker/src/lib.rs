//! # Retrieval Text Chunker
//!
//! Splits long documents into overlapping, source-attributed fragments ready
//! for embedding.
//!
//! ## Strategies
//!
//! - **character**: fixed window of `chunk_size` characters advancing by
//!   `chunk_size - chunk_overlap`
//! - **paragraph**: paragraphs (delimited by `" \n"`) greedily packed up to
//!   `chunk_size`, each new chunk seeded with the trailing `chunk_overlap`
//!   characters of the previous one
//!
//! ## Architecture
//!
//! ```text
//! .txt files
//!     │
//!     ├──> TextFileLoader → Document { text, source }
//!     │
//!     ├──> Chunker (validated ChunkerConfig)
//!     │      └─> StrategyExecutor (character | paragraph)
//!     │
//!     └──> TextChunk { text, metadata: {"source": ...} }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use retrieval_text_chunker::{Chunker, ChunkerConfig, SplitMode};
//!
//! let chunker = Chunker::new(ChunkerConfig::new(10, 3, SplitMode::Character)).unwrap();
//! let (chunks, metadata) =
//!     chunker.split_texts_with_metadata(&[("a fairly short document", "doc1.txt")]);
//!
//! assert_eq!(chunks[0], "a fairly s");
//! assert_eq!(metadata[0]["source"], "doc1.txt");
//! ```

mod chunker;
mod config;
mod error;
mod loader;
mod strategy;
mod types;

pub use chunker::Chunker;
pub use config::{ChunkerConfig, SplitMode};
pub use error::{ChunkerError, Result};
pub use loader::TextFileLoader;
pub use strategy::PARAGRAPH_DELIMITER;
pub use types::{source_metadata, Document, Metadata, TextChunk, SOURCE_KEY};
