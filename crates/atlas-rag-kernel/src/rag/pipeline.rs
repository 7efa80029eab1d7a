//! RAG orchestration: retrieval output → prompt → generation.

use crate::error::RagResult;
use crate::rag::provider::GenerationProvider;
use crate::rag::retrieve::Retriever;
use crate::rag::types::GenerationRequest;
use std::sync::Arc;
use tracing::info;

/// Fixed prompt layout wrapping the context block and the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    instruction: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            instruction: "Use ONLY the context below to answer the question.".to_string(),
        }
    }
}

impl PromptTemplate {
    pub fn with_instruction(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
        }
    }

    pub fn render(&self, context: &str, question: &str) -> String {
        format!(
            "{}\nContext:\n{}\n\nQuestion: {}\n",
            self.instruction, context, question
        )
    }
}

/// Join passages into the context block, one per line.
pub fn build_context<S: AsRef<str>>(passages: &[S]) -> String {
    passages
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone)]
pub struct RagAnswer {
    /// Completion returned verbatim by the generation service
    pub answer: String,
    pub passages: Vec<String>,
    /// Prompt that was sent
    pub prompt: String,
}

#[derive(Clone)]
pub struct RagPipeline {
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn GenerationProvider>,
    model: String,
    template: PromptTemplate,
}

impl RagPipeline {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn GenerationProvider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            retriever,
            generator,
            model: model.into(),
            template: PromptTemplate::default(),
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Answer a question and return only the completion.
    pub async fn answer(&self, query: &str) -> RagResult<String> {
        Ok(self.run(query).await?.answer)
    }

    /// Answer a question, keeping the passages and prompt used.
    ///
    /// Retrieval errors, including an empty retrieval, are returned before
    /// the generation service is contacted.
    pub async fn run(&self, query: &str) -> RagResult<RagAnswer> {
        let passages = self.retriever.retrieve(query).await?;

        let context = build_context(&passages);
        let prompt = self.template.render(&context, query);

        info!("Generating answer with {}...", self.model);
        let request = GenerationRequest::new(&self.model, &prompt);
        let answer = self.generator.generate(&request).await?;

        Ok(RagAnswer {
            answer,
            passages,
            prompt,
        })
    }
}
