use async_trait::async_trait;
use atlas_rag_kernel::error::{RagError, RagResult, ServiceKind};
use atlas_rag_kernel::rag::EmbeddingProvider;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Bag-of-words embedder: every lowercase word is hashed into one of
/// `dimensions` buckets.
///
/// Texts sharing words get similar vectors, so cosine ranking behaves
/// sensibly on small corpora. Output is stable across runs.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];
        if self.dimensions == 0 {
            return vector;
        }
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn model(&self) -> &str {
        "hashing"
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        Ok(self.vector(text))
    }
}

/// Returns the same vector for every text.
#[derive(Debug, Clone)]
pub struct FixedEmbedder {
    vector: Vec<f32>,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    fn model(&self) -> &str {
        "fixed"
    }

    async fn embed(&self, _text: &str) -> RagResult<Vec<f32>> {
        Ok(self.vector.clone())
    }
}

/// Fails with a transport error for texts containing any of the given
/// markers and delegates the rest to a [`HashingEmbedder`].
#[derive(Debug, Clone)]
pub struct FailingEmbedder {
    inner: HashingEmbedder,
    markers: Vec<String>,
    fail_all: bool,
}

impl FailingEmbedder {
    /// Fail every call.
    pub fn always() -> Self {
        Self {
            inner: HashingEmbedder::new(8),
            markers: Vec::new(),
            fail_all: true,
        }
    }

    /// Fail calls whose text contains one of `markers`.
    pub fn on<I, S>(dimensions: usize, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: HashingEmbedder::new(dimensions),
            markers: markers.into_iter().map(Into::into).collect(),
            fail_all: false,
        }
    }

    fn should_fail(&self, text: &str) -> bool {
        self.fail_all || self.markers.iter().any(|m| text.contains(m.as_str()))
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    fn model(&self) -> &str {
        "failing"
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        if self.should_fail(text) {
            return Err(RagError::transport(
                ServiceKind::Embedding,
                "connection refused",
            ));
        }
        self.inner.embed(text).await
    }
}
