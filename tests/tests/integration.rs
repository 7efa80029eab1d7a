use atlas_rag_foundation::rag::compute_similarity;
use atlas_rag_foundation::{DEFAULT_QUESTION, InMemoryVectorStore, KNOWLEDGE_BASE, ResourceManager};
use atlas_rag_kernel::admin::{AdminOutcome, StoreAdmin};
use atlas_rag_kernel::error::RagError;
use atlas_rag_kernel::rag::{
    Ingestor, KnowledgeRecord, RagPipeline, RetrievalOptions, SimilarityMetric, VectorIndexSpec,
    VectorRetriever, VectorStore,
};
use atlas_rag_testing::{FailingEmbedder, FixedEmbedder, HashingEmbedder, RecordingGenerator};
use std::sync::Arc;

const DIMS: usize = 64;
const CANNED: &str = "RAG grounds answers in retrieved facts.";

fn store(dimensions: usize) -> Arc<InMemoryVectorStore> {
    Arc::new(InMemoryVectorStore::new(VectorIndexSpec::new(
        "vector_index",
        "embedding",
        dimensions,
        SimilarityMetric::Cosine,
    )))
}

async fn seeded() -> (Arc<HashingEmbedder>, Arc<InMemoryVectorStore>) {
    let embedder = Arc::new(HashingEmbedder::new(DIMS));
    let store = store(DIMS);
    let report = Ingestor::new(embedder.clone(), store.clone(), DIMS)
        .ingest(&KNOWLEDGE_BASE)
        .await
        .unwrap();
    assert_eq!(report.inserted, KNOWLEDGE_BASE.len());
    (embedder, store)
}

#[tokio::test]
async fn test_ingest_then_answer_default_question() {
    let (embedder, store) = seeded().await;
    let generator = Arc::new(RecordingGenerator::new(CANNED));

    let retriever = VectorRetriever::new(embedder, store)
        .with_options(RetrievalOptions::default())
        .with_dimensions(DIMS);
    let pipeline = RagPipeline::new(Arc::new(retriever), generator.clone(), "llama3");

    let answer = pipeline.run(DEFAULT_QUESTION).await.unwrap();

    assert_eq!(answer.answer, CANNED);
    assert!(!answer.passages.is_empty());
    assert!(answer.passages.iter().any(|p| p.contains("RAG")));
    for passage in &answer.passages {
        assert!(answer.prompt.contains(passage.as_str()));
    }
    assert!(answer.prompt.contains(DEFAULT_QUESTION));

    atlas_rag_testing::assert_generation_calls!(generator, 1);
    let history = generator.history().await;
    assert_eq!(history[0].model, "llama3");
    assert!(!history[0].stream);
    assert_eq!(history[0].prompt, answer.prompt);
}

#[tokio::test]
async fn test_one_record_per_successful_embedding() {
    let embedder = Arc::new(FailingEmbedder::on(DIMS, ["hallucinations"]));
    let store = store(DIMS);

    let report = Ingestor::new(embedder, store.clone(), DIMS)
        .ingest(&KNOWLEDGE_BASE)
        .await
        .unwrap();

    assert_eq!(report.attempted, 4);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 1);
    assert!(!report.nothing_inserted());

    let records = store.records();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| !r.content.contains("hallucinations")));
    assert!(records.iter().all(|r| r.embedding.len() == DIMS));
}

#[tokio::test]
async fn test_empty_corpus_writes_nothing() {
    let store = store(DIMS);
    let corpus: [&str; 0] = [];

    let report = Ingestor::new(Arc::new(HashingEmbedder::new(DIMS)), store.clone(), DIMS)
        .ingest(&corpus)
        .await
        .unwrap();

    assert_eq!(report.attempted, 0);
    assert_eq!(report.inserted, 0);
    assert!(!report.nothing_inserted());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_all_embeddings_failing_is_reported() {
    let store = store(DIMS);

    let report = Ingestor::new(Arc::new(FailingEmbedder::always()), store.clone(), DIMS)
        .ingest(&KNOWLEDGE_BASE)
        .await
        .unwrap();

    assert!(report.nothing_inserted());
    assert_eq!(report.failures.len(), 4);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_mismatched_dimensions_are_skipped() {
    let store = store(768);

    let report = Ingestor::new(Arc::new(HashingEmbedder::new(DIMS)), store.clone(), 768)
        .ingest(&KNOWLEDGE_BASE)
        .await
        .unwrap();

    assert!(report.nothing_inserted());
    assert!(report.failures.iter().all(|f| f.reason.contains("dimension")));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_passage_retrieves_itself_first() {
    let (embedder, store) = seeded().await;
    let retriever = VectorRetriever::new(embedder, store);

    for passage in KNOWLEDGE_BASE {
        let found = retriever.retrieve_with(passage, 10, 1).await.unwrap();
        assert_eq!(found, vec![passage.to_string()]);
    }
}

#[tokio::test]
async fn test_small_store_returns_everything_ranked() {
    let (embedder, store) = seeded().await;
    let retriever = VectorRetriever::new(embedder.clone(), store).with_dimensions(DIMS);

    let found = retriever.retrieve_with(DEFAULT_QUESTION, 50, 10).await.unwrap();

    let query = embedder.vector(DEFAULT_QUESTION);
    let mut expected: Vec<(f32, &str)> = KNOWLEDGE_BASE
        .iter()
        .map(|p| {
            let score = compute_similarity(&embedder.vector(p), &query, SimilarityMetric::Cosine);
            (score, *p)
        })
        .collect();
    expected.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    let expected: Vec<String> = expected.into_iter().map(|(_, p)| p.to_string()).collect();

    assert_eq!(found.len(), KNOWLEDGE_BASE.len());
    assert_eq!(found, expected);
}

#[tokio::test]
async fn test_identical_vector_ranks_first() {
    let target: Vec<f32> = (0..768).map(|i| ((i % 7) as f32 + 1.0) * 0.1).collect();
    let reversed: Vec<f32> = target.iter().rev().copied().collect();
    let store = store(768);
    store
        .insert_many(vec![
            KnowledgeRecord::new("constant", vec![0.1; 768]),
            KnowledgeRecord::new("target", target.clone()),
            KnowledgeRecord::new("reversed", reversed),
        ])
        .await
        .unwrap();

    let results = store.similarity_search(&target, 50, 3).await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].content, "target");
    assert!((results[0].score - 1.0).abs() < 1e-5);
    assert!(results[1].score < 0.999);

    let retriever = VectorRetriever::new(Arc::new(FixedEmbedder::new(target)), store)
        .with_dimensions(768);
    let found = retriever.retrieve_with("anything", 50, 1).await.unwrap();
    assert_eq!(found, vec!["target".to_string()]);
}

#[tokio::test]
async fn test_empty_store_never_reaches_generator() {
    let embedder = Arc::new(HashingEmbedder::new(DIMS));
    let generator = Arc::new(RecordingGenerator::new(CANNED));
    let retriever = VectorRetriever::new(embedder, store(DIMS)).with_dimensions(DIMS);
    let pipeline = RagPipeline::new(Arc::new(retriever), generator.clone(), "llama3");

    let err = pipeline.answer(DEFAULT_QUESTION).await.unwrap_err();

    assert!(err.is_empty_retrieval());
    assert!(matches!(err, RagError::EmptyRetrieval { index } if index == "vector_index"));
    atlas_rag_testing::assert_generation_calls!(generator, 0);
}

#[tokio::test]
async fn test_declined_confirmations_leave_store_intact() {
    let (_embedder, store) = seeded().await;
    let manager = ResourceManager::new(store.clone());

    assert_eq!(manager.clear_collection("no").await.unwrap(), AdminOutcome::Cancelled);
    assert_eq!(manager.drop_collection("delete").await.unwrap(), AdminOutcome::Cancelled);
    assert_eq!(manager.drop_database("yes").await.unwrap(), AdminOutcome::Cancelled);
    assert_eq!(
        manager.drop_vector_index("vector_index", "").await.unwrap(),
        AdminOutcome::Cancelled
    );

    assert_eq!(store.count().await.unwrap(), KNOWLEDGE_BASE.len() as u64);
    assert!(store.collection_exists());
    assert_eq!(store.list_vector_indexes().await.unwrap(), vec!["vector_index"]);
}
