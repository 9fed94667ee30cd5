//! # Retrieval Vector Store
//!
//! In-memory, exact nearest-neighbour storage for text embeddings.
//!
//! ## Features
//!
//! - **Exact k-NN search** over every stored entry
//! - **Pluggable metrics**: Pearson correlation (default), cosine similarity,
//!   or any closure via [`FnMetric`]
//! - **Metadata filtering** by exact field matches before ranking
//! - **Batch ingestion**: one embedding call per batch, embed-then-insert
//!
//! ## Architecture
//!
//! ```text
//! TextChunk[]
//!     │
//!     ├──> EmbeddingProvider::embed_many (one call, order preserved)
//!     │      └─> Vec<f32>[d]
//!     │
//!     └──> VectorStore (key = chunk text)
//!            └─> search: filter → score → sort desc → top k
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use retrieval_vector_store::{HashEmbedder, Metric, VectorStore};
//! use retrieval_text_chunker::TextChunk;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> retrieval_vector_store::Result<()> {
//!     let chunks = vec![TextChunk::new("I like to eat broccoli and bananas.")];
//!     let store = VectorStore::build_from_chunks(chunks, Arc::new(HashEmbedder::new(64))).await?;
//!
//!     let hits = store
//!         .search_by_text("I think fruit is awesome!", 2, &Metric::Pearson, true, None)
//!         .await?;
//!     println!("{:?}", hits.into_texts());
//!     Ok(())
//! }
//! ```

mod embeddings;
mod error;
mod metric;
mod shared;
mod store;
mod types;

pub use embeddings::{BlockingEmbedder, EmbeddingProvider, HashEmbedder, SpawnBlocking};
pub use error::{Result, VectorStoreError};
pub use metric::{CosineSimilarity, DistanceMetric, FnMetric, Metric, PearsonCorrelation};
pub use shared::SharedVectorStore;
pub use store::VectorStore;
pub use types::{Entry, MetadataFilter, SearchOutput, SearchResult};

// Re-export chunker types for convenience
pub use retrieval_text_chunker::{Metadata, TextChunk};
