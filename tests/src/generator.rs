use async_trait::async_trait;
use atlas_rag_kernel::error::RagResult;
use atlas_rag_kernel::rag::{GenerationProvider, GenerationRequest};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A generation double returning a canned completion.
///
/// Every request is recorded so tests can assert on the prompt that was
/// sent and on how often the service was called.
#[derive(Clone)]
pub struct RecordingGenerator {
    response: String,
    /// Track all requests passed to this generator
    pub call_history: Arc<RwLock<Vec<GenerationRequest>>>,
}

impl RecordingGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            call_history: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Retrieve the history of requests made to this generator
    pub async fn history(&self) -> Vec<GenerationRequest> {
        self.call_history.read().await.clone()
    }

    /// Check the total number of times this generator was called
    pub async fn call_count(&self) -> usize {
        self.call_history.read().await.len()
    }
}

#[async_trait]
impl GenerationProvider for RecordingGenerator {
    async fn generate(&self, request: &GenerationRequest) -> RagResult<String> {
        self.call_history.write().await.push(request.clone());
        Ok(self.response.clone())
    }
}

#[macro_export]
macro_rules! assert_generation_calls {
    ($generator:expr, $expected_count:expr) => {
        let count = $generator.call_count().await;
        assert_eq!(
            count, $expected_count,
            "Expected the generator to be called {} times, but it was called {} times",
            $expected_count, count
        );
    };
}
