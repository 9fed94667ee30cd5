use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::strategy::StrategyExecutor;
use crate::types::{source_metadata, Document, Metadata, TextChunk};

/// Main chunker interface for splitting documents
pub struct Chunker {
    config: ChunkerConfig,
    executor: StrategyExecutor,
}

impl Chunker {
    /// Create a new chunker, rejecting invalid sizes up front
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        let executor = StrategyExecutor::new(config.clone());
        Ok(Self { config, executor })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split a single text with the configured mode
    pub fn split(&self, text: &str) -> Vec<String> {
        let chunks = self.executor.execute(text);
        log::debug!(
            "Split {} chars into {} {} chunks",
            text.len(),
            chunks.len(),
            self.config.split_mode
        );
        chunks
    }

    /// Split several texts, concatenating the chunks in input order
    pub fn split_texts<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts
            .iter()
            .flat_map(|text| self.split(text.as_ref()))
            .collect()
    }

    /// Split `(text, source)` pairs, returning chunks and a parallel metadata list
    ///
    /// Every chunk is stamped with `{"source": source}`; `chunks[i]` belongs with `metadata[i]`.
    pub fn split_texts_with_metadata<T, S>(&self, texts: &[(T, S)]) -> (Vec<String>, Vec<Metadata>)
    where
        T: AsRef<str>,
        S: AsRef<str>,
    {
        let mut chunks = Vec::new();
        let mut metadata = Vec::new();
        for (text, source) in texts {
            let text_chunks = self.split(text.as_ref());
            metadata.extend(
                std::iter::repeat_with(|| source_metadata(source.as_ref())).take(text_chunks.len()),
            );
            chunks.extend(text_chunks);
        }
        (chunks, metadata)
    }

    /// Split loaded documents into source-attributed chunks
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<TextChunk> {
        let chunks: Vec<TextChunk> = documents
            .iter()
            .flat_map(|doc| {
                self.split(&doc.text)
                    .into_iter()
                    .map(|text| TextChunk::from((text, source_metadata(&doc.source))))
            })
            .collect();
        log::info!(
            "Chunked {} documents into {} chunks",
            documents.len(),
            chunks.len()
        );
        chunks
    }
}
