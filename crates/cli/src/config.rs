use anyhow::{ensure, Context, Result};
use retrieval_text_chunker::ChunkerConfig;
use retrieval_vector_store::Metric;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk configuration; every section and field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrievalConfig {
    pub chunker: ChunkerConfig,
    pub search: SearchConfig,
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub k: usize,
    /// Metric name, resolved through [`Metric`]'s parser so unknown names fail loudly
    pub metric: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k: 4,
            metric: Metric::default().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingConfig {
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { dimension: 384 }
    }
}

impl RetrievalConfig {
    /// Load from a TOML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.chunker.validate()?;
        self.metric()?;
        ensure!(
            self.embedding.dimension > 0,
            "embedding.dimension must be > 0"
        );
        Ok(())
    }

    pub fn metric(&self) -> Result<Metric> {
        Ok(self.search.metric.parse::<Metric>()?)
    }
}
