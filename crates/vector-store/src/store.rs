use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, VectorStoreError};
use crate::metric::{DistanceMetric, Metric};
use crate::types::{Entry, MetadataFilter, SearchOutput, SearchResult, StoredEntry};
use retrieval_text_chunker::{Metadata, TextChunk};
use std::cmp::Ordering;
use std::collections::hash_map::Entry as MapEntry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Exact nearest-neighbour store keyed by chunk text
///
/// Not internally synchronized; see [`crate::SharedVectorStore`] for a locked wrapper.
pub struct VectorStore {
    entries: HashMap<String, StoredEntry>,
    embedder: Arc<dyn EmbeddingProvider>,
    next_seq: u64,
}

/// Chunks paired with their embeddings, validated and ready to insert
pub(crate) struct EmbeddedBatch {
    chunks: Vec<TextChunk>,
    vectors: Vec<Vec<f32>>,
}

impl EmbeddedBatch {
    /// Embed all chunk texts in one provider call
    ///
    /// Fails before returning anything if a key is empty or the provider
    /// returns the wrong number of vectors, so nothing partial reaches a store.
    pub(crate) async fn embed(
        embedder: &dyn EmbeddingProvider,
        chunks: Vec<TextChunk>,
    ) -> Result<Self> {
        if chunks.iter().any(|chunk| chunk.text.is_empty()) {
            return Err(VectorStoreError::EmptyKey);
        }

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let vectors = embedder.embed_many(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(VectorStoreError::BatchMismatch {
                expected: chunks.len(),
                actual: vectors.len(),
            });
        }

        Ok(Self { chunks, vectors })
    }

    pub(crate) fn len(&self) -> usize {
        self.chunks.len()
    }
}

impl VectorStore {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            entries: HashMap::new(),
            embedder,
            next_seq: 0,
        }
    }

    /// Build a store from chunks with a single batch embedding call
    pub async fn build_from_chunks(
        chunks: Vec<TextChunk>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let mut store = Self::new(embedder);
        store.add_chunks(chunks).await?;
        Ok(store)
    }

    /// Add chunks with batch embedding; either every chunk is inserted or none is
    pub async fn add_chunks(&mut self, chunks: Vec<TextChunk>) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        log::info!("Embedding {} chunks", chunks.len());
        let batch = EmbeddedBatch::embed(self.embedder.as_ref(), chunks).await?;
        self.insert_batch(batch);
        Ok(())
    }

    pub(crate) fn insert_batch(&mut self, batch: EmbeddedBatch) {
        let count = batch.len();
        for (chunk, vector) in batch.chunks.into_iter().zip(batch.vectors) {
            self.upsert(chunk.text, vector, chunk.metadata);
        }
        log::info!("Inserted {count} chunks. Total: {}", self.entries.len());
    }

    /// Insert or replace the entry for `key`
    ///
    /// Vector dimensions are not checked here; a mismatch surfaces when searching.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        vector: Vec<f32>,
        metadata: Metadata,
    ) -> Result<()> {
        let key = key.into();
        if key.is_empty() {
            return Err(VectorStoreError::EmptyKey);
        }
        self.upsert(key, vector, metadata);
        Ok(())
    }

    fn upsert(&mut self, key: String, vector: Vec<f32>, metadata: Metadata) {
        let entry = Entry { vector, metadata };
        match self.entries.entry(key) {
            MapEntry::Occupied(mut occupied) => {
                // Overwrite keeps the original position for tie-breaking
                occupied.get_mut().entry = entry;
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(StoredEntry {
                    entry,
                    seq: self.next_seq,
                });
                self.next_seq += 1;
            }
        }
    }

    /// Top-`k` entries by descending score under `metric`, restricted by `filter`
    ///
    /// Equal scores keep first-insertion order. `NaN` scores rank after all others.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        metric: &dyn DistanceMetric,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>> {
        if k == 0 || self.entries.is_empty() {
            return Ok(vec![]);
        }

        let mut scored: Vec<(&str, &StoredEntry, f32)> = Vec::new();
        for (key, stored) in &self.entries {
            if filter.is_some_and(|f| !f.matches(&stored.entry.metadata)) {
                continue;
            }
            let score = metric.score(query, &stored.entry.vector)?;
            scored.push((key.as_str(), stored, score));
        }

        let degenerate = scored.iter().filter(|(_, _, score)| score.is_nan()).count();
        if degenerate > 0 {
            log::warn!(
                "{degenerate} entries produced an undefined {} score and were ranked last",
                metric.name()
            );
        }

        scored.sort_by(|a, b| rank_order(a.2, b.2).then_with(|| a.1.seq.cmp(&b.1.seq)));
        scored.truncate(k);

        log::debug!(
            "Search ({}, k={k}) returned {} results",
            metric.name(),
            scored.len()
        );

        Ok(scored
            .into_iter()
            .map(|(key, stored, score)| SearchResult {
                key: key.to_string(),
                score,
                metadata: stored.entry.metadata.clone(),
            })
            .collect())
    }

    /// [`Self::search`] with Pearson correlation and no filter
    pub fn search_default(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        self.search(query, k, &Metric::default(), None)
    }

    /// Embed `query_text` and search; `return_as_text` keeps only the ranked keys
    pub async fn search_by_text(
        &self,
        query_text: &str,
        k: usize,
        metric: &dyn DistanceMetric,
        return_as_text: bool,
        filter: Option<&MetadataFilter>,
    ) -> Result<SearchOutput> {
        log::debug!("Searching for: '{query_text}' (k: {k})");
        let query_vector = self.embedder.embed_one(query_text).await?;
        let results = self.search(&query_vector, k, metric, filter)?;

        Ok(if return_as_text {
            SearchOutput::Texts(results.into_iter().map(|r| r.key).collect())
        } else {
            SearchOutput::Results(results)
        })
    }

    /// Distinct values of a metadata field across all entries
    pub fn get_unique_metadata_values(&self, field: &str) -> HashSet<String> {
        self.entries
            .values()
            .filter_map(|stored| stored.entry.metadata.get(field))
            .cloned()
            .collect()
    }

    /// Direct lookup; `None` when the key was never inserted
    pub fn retrieve_from_key(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key).map(|stored| &stored.entry)
    }

    /// Keys in first-insertion order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<(&str, u64)> = self
            .entries
            .iter()
            .map(|(key, stored)| (key.as_str(), stored.seq))
            .collect();
        keys.sort_by_key(|(_, seq)| *seq);
        keys.into_iter().map(|(key, _)| key).collect()
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Get total number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Descending by score, `NaN` last
fn rank_order(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
