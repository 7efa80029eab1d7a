//! Ingestion pipeline: embed a corpus and batch-write it to the store.

use crate::error::RagResult;
use crate::rag::provider::EmbeddingProvider;
use crate::rag::types::{DEFAULT_SOURCE, KnowledgeRecord};
use crate::rag::vector_store::VectorStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A corpus entry that did not make it into the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestFailure {
    /// Position of the entry in the corpus
    pub index: usize,
    pub reason: String,
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// Corpus entries processed
    pub attempted: usize,
    /// Entries embedded with the configured dimension
    pub succeeded: usize,
    /// Records the store reported as written
    pub inserted: usize,
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    /// A non-empty corpus where every entry failed to embed.
    ///
    /// The run still returns `Ok`; callers that want to treat this as a
    /// failure check it here.
    pub fn nothing_inserted(&self) -> bool {
        self.attempted > 0 && self.succeeded == 0
    }
}

/// Embeds each corpus entry sequentially and writes the successes in a
/// single batch.
pub struct Ingestor {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    dimensions: usize,
    source: Option<String>,
}

impl Ingestor {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        dimensions: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            dimensions,
            source: Some(DEFAULT_SOURCE.to_string()),
        }
    }

    /// Override the provenance label, `None` leaves it off the records.
    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    pub async fn ingest<S: AsRef<str>>(&self, corpus: &[S]) -> RagResult<IngestReport> {
        let mut report = IngestReport {
            attempted: corpus.len(),
            ..IngestReport::default()
        };

        info!("Processing {} documents...", corpus.len());

        let mut records = Vec::with_capacity(corpus.len());
        for (index, text) in corpus.iter().enumerate() {
            let text = text.as_ref();
            debug!("Embedding doc {}/{}", index + 1, corpus.len());

            let embedding = match self.embedder.embed(text).await {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!("Error getting embedding for doc {}: {}", index + 1, e);
                    report.failures.push(IngestFailure {
                        index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if embedding.len() != self.dimensions {
                warn!(
                    "Skipping doc {}: embedding has {} dimensions, index expects {}",
                    index + 1,
                    embedding.len(),
                    self.dimensions
                );
                report.failures.push(IngestFailure {
                    index,
                    reason: format!(
                        "dimension mismatch: expected {}, got {}",
                        self.dimensions,
                        embedding.len()
                    ),
                });
                continue;
            }

            let mut record = KnowledgeRecord::new(text, embedding);
            record.source = self.source.clone();
            records.push(record);
        }

        report.succeeded = records.len();

        if records.is_empty() {
            if report.nothing_inserted() {
                warn!(
                    "No documents were prepared for insertion ({} of {} failed)",
                    report.failures.len(),
                    report.attempted
                );
            } else {
                info!("Empty corpus, nothing to insert");
            }
            return Ok(report);
        }

        info!("Inserting {} documents...", records.len());
        report.inserted = self.store.insert_many(records).await?;
        info!("Inserted {} documents", report.inserted);

        Ok(report)
    }
}
