use crate::error::{Result, VectorStoreError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::spawn_blocking;

/// Maps text to fixed-dimension vectors
///
/// `embed_many` must return exactly one vector per input, in input order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Length of every vector this provider produces
    fn dimension(&self) -> usize;

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_many(&[text.to_string()]).await?;
        if embeddings.len() != 1 {
            return Err(VectorStoreError::BatchMismatch {
                expected: 1,
                actual: embeddings.len(),
            });
        }
        embeddings
            .pop()
            .ok_or_else(|| VectorStoreError::EmbeddingError("Empty embedding result".to_string()))
    }
}

#[async_trait]
impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<P> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_many(texts).await
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed_one(text).await
    }
}

/// Synchronous embedder, e.g. a local model that occupies the calling thread
pub trait BlockingEmbedder: Send + Sync + 'static {
    fn dimension(&self) -> usize;

    fn embed_many_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Runs a [`BlockingEmbedder`] on tokio's blocking pool
pub struct SpawnBlocking<E> {
    inner: Arc<E>,
}

impl<E: BlockingEmbedder> SpawnBlocking<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

#[async_trait]
impl<E: BlockingEmbedder> EmbeddingProvider for SpawnBlocking<E> {
    fn dimension(&self) -> usize {
        BlockingEmbedder::dimension(&*self.inner)
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let inner = self.inner.clone();
        let owned = texts.to_vec();
        spawn_blocking(move || inner.embed_many_blocking(&owned))
            .await
            .map_err(|e| VectorStoreError::EmbeddingError(format!("Join error: {e}")))?
    }
}

/// Deterministic embedder seeded by a hash of the text
///
/// Produces unit-length vectors with no model download; equal texts always map
/// to equal vectors. Useful for tests and offline runs, not for semantic quality.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl BlockingEmbedder for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_many_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| hash_embed(text, self.dimension))
            .collect())
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed_many_blocking(texts)
    }
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

fn hash_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut state =
        fnv1a_64(text.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut vec = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let bits = splitmix64(&mut state);
        let high = (bits >> 32) as u32;
        let mantissa = high >> 9;
        let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
        vec.push(unit.mul_add(2.0, -1.0));
    }
    normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: Arc<AtomicUsize>,
    }

    impl BlockingEmbedder for CountingEmbedder {
        fn dimension(&self) -> usize {
            1
        }

        fn embed_many_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(texts.iter().map(|t| vec![t.len() as f32]).collect())
        }
    }

    #[test]
    fn test_hash_embed_deterministic_unit_vectors() {
        let a = hash_embed("hello", 16);
        let b = hash_embed("hello", 16);
        let c = hash_embed("goodbye", 16);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    /// Returns one vector per input plus a stray trailing one
    struct ExtraVectorEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ExtraVectorEmbedder {
        fn dimension(&self) -> usize {
            1
        }

        async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out: Vec<Vec<f32>> = texts.iter().map(|_| vec![1.0]).collect();
            out.push(vec![-1.0]);
            Ok(out)
        }
    }

    #[tokio::test]
    async fn test_embed_one_rejects_wrong_vector_count() {
        let err = ExtraVectorEmbedder.embed_one("query").await.unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::BatchMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_embed_one_matches_batch() {
        let embedder = HashEmbedder::new(8);
        let texts = vec!["alpha".to_string(), "beta".to_string()];
        let batch = embedder.embed_many(&texts).await.unwrap();
        let single = embedder.embed_one("beta").await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1], single);
        assert_eq!(EmbeddingProvider::dimension(&embedder), 8);
    }

    #[tokio::test]
    async fn test_spawn_blocking_preserves_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = SpawnBlocking::new(CountingEmbedder {
            calls: calls.clone(),
        });

        let texts: Vec<String> = ["a", "bbb", "cc"].iter().map(ToString::to_string).collect();
        let vectors = provider.embed_many(&texts).await.unwrap();
        assert_eq!(vectors, vec![vec![1.0], vec![3.0], vec![2.0]]);
        assert_eq!(calls.load(Ordering::Relaxed), 1);

        assert!(provider.embed_many(&[]).await.unwrap().is_empty());
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_arc_provider_delegates() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(4));
        let vector = provider.embed_one("x").await.unwrap();
        assert_eq!(vector, hash_embed("x", 4));
    }
}
