use crate::embeddings::EmbeddingProvider;
use crate::error::Result;
use crate::metric::DistanceMetric;
use crate::store::{EmbeddedBatch, VectorStore};
use crate::types::{Entry, MetadataFilter, SearchOutput, SearchResult};
use retrieval_text_chunker::{Metadata, TextChunk};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable, lock-protected handle to a [`VectorStore`]
///
/// Searches share a read lock. Writers embed outside the lock and then insert
/// the whole batch under one write lock, so readers never observe half a batch.
#[derive(Clone)]
pub struct SharedVectorStore {
    inner: Arc<RwLock<VectorStore>>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SharedVectorStore {
    pub fn new(store: VectorStore) -> Self {
        let embedder = store.embedder().clone();
        Self {
            inner: Arc::new(RwLock::new(store)),
            embedder,
        }
    }

    pub async fn add_chunks(&self, chunks: Vec<TextChunk>) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        let batch = EmbeddedBatch::embed(self.embedder.as_ref(), chunks).await?;
        self.inner.write().await.insert_batch(batch);
        Ok(())
    }

    pub async fn insert(
        &self,
        key: impl Into<String>,
        vector: Vec<f32>,
        metadata: Metadata,
    ) -> Result<()> {
        self.inner.write().await.insert(key, vector, metadata)
    }

    pub async fn search(
        &self,
        query: &[f32],
        k: usize,
        metric: &dyn DistanceMetric,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>> {
        self.inner.read().await.search(query, k, metric, filter)
    }

    pub async fn search_by_text(
        &self,
        query_text: &str,
        k: usize,
        metric: &dyn DistanceMetric,
        return_as_text: bool,
        filter: Option<&MetadataFilter>,
    ) -> Result<SearchOutput> {
        // Embed before locking so slow providers don't block writers
        let query_vector = self.embedder.embed_one(query_text).await?;
        let results = self.search(&query_vector, k, metric, filter).await?;
        Ok(if return_as_text {
            SearchOutput::Texts(results.into_iter().map(|r| r.key).collect())
        } else {
            SearchOutput::Results(results)
        })
    }

    pub async fn get_unique_metadata_values(&self, field: &str) -> HashSet<String> {
        self.inner.read().await.get_unique_metadata_values(field)
    }

    /// Snapshot of the entry, cloned out of the lock
    pub async fn retrieve_from_key(&self, key: &str) -> Option<Entry> {
        self.inner.read().await.retrieve_from_key(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
