//! Application context
//!
//! One `AppState` is constructed at startup and handed to the surrounding
//! service layer; all components hang off it explicitly, with no ambient
//! global state. Cloning is cheap (shared inner).

use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::embeddings::{EmbeddingProvider, HashedEmbedder};
use crate::error::Result;
use crate::generation::GenerationClient;
use crate::grading::GradingEngine;
use crate::ingestion::DocumentExtractor;
use crate::quiz::QuizGenerator;
use crate::retrieval::SemanticIndex;
use crate::tutoring::{ChatSession, TutorEngine};
use crate::types::{
    AskResponse, ExtractedDocument, GradeResult, McqAnswer, McqItem, McqSetGrade, UploadReceipt,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Semantic index over ingested documents
    index: Arc<SemanticIndex>,
    /// Generation backend
    llm: Arc<GenerationClient>,
    /// Retrieval-augmented tutor
    tutor: TutorEngine,
    /// Quiz and summary generator
    quiz: QuizGenerator,
    /// Grading engine
    grading: GradingEngine,
    /// Registry of ingested documents
    documents: DashMap<Uuid, ExtractedDocument>,
}

impl AppState {
    /// Construct the application context.
    ///
    /// Fails only when the semantic index cannot be opened after its one
    /// recreation attempt; the generation backend starting degraded is not
    /// an error.
    pub fn new(config: AppConfig) -> Result<Self> {
        tracing::info!("Initializing tutoring application state");

        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(HashedEmbedder::new(config.embedding.dimensions));

        let index = Arc::new(SemanticIndex::open(
            &config.index,
            &config.chunking,
            embedder,
        )?);

        let llm = Arc::new(GenerationClient::new(&config.llm));

        let tutor = TutorEngine::new(Arc::clone(&index), Arc::clone(&llm));
        let quiz = QuizGenerator::new(Arc::clone(&llm));
        let grading = GradingEngine::new(Arc::clone(&llm));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                index,
                llm,
                tutor,
                quiz,
                grading,
                documents: DashMap::new(),
            }),
        })
    }

    /// Extract a file, index its content and register the document.
    ///
    /// The upload boundary has already enforced the extension whitelist and
    /// size cap; dispatch is still validated here and unknown extensions
    /// are rejected.
    pub async fn upload(&self, path: &Path) -> Result<UploadReceipt> {
        let doc = DocumentExtractor::extract(path)?;
        let content_length = doc.content.chars().count();

        let chunks = self.inner.index.add(&doc).await?;
        tracing::info!(
            "Uploaded '{}': {} characters, {} chunks",
            doc.file_name,
            content_length,
            chunks
        );

        let filename = doc.file_name.clone();
        self.inner.documents.insert(doc.id, doc);

        Ok(UploadReceipt {
            message: "Document uploaded and processed successfully".to_string(),
            filename,
            content_length,
        })
    }

    /// Answer a question grounded in the uploaded documents
    pub async fn ask(&self, question: &str) -> AskResponse {
        self.inner.tutor.ask(question).await
    }

    /// Generate a five-question multiple-choice quiz
    pub async fn generate_mcqs(&self, topic: &str, context: &str) -> Vec<McqItem> {
        self.inner.quiz.generate_mcqs(topic, context).await
    }

    /// Generate a study summary
    pub async fn generate_summary(&self, content: &str) -> String {
        self.inner.quiz.generate_summary(content).await
    }

    /// Generate revision notes for a topic
    pub async fn generate_revision_notes(&self, topic: &str, content: &str) -> String {
        self.inner.quiz.generate_revision_notes(topic, content).await
    }

    /// Grade a free-text answer
    pub async fn grade(
        &self,
        question: &str,
        correct_answer: &str,
        student_answer: &str,
        context: &str,
    ) -> GradeResult {
        self.inner
            .grading
            .grade(question, correct_answer, student_answer, context)
            .await
    }

    /// Grade a multiple-choice submission
    pub fn grade_mcq_set(&self, answers: &[McqAnswer]) -> McqSetGrade {
        self.inner.grading.grade_mcq_set(answers)
    }

    /// Provide a hint for a question
    pub async fn provide_hint(&self, question: &str) -> String {
        self.inner.tutor.provide_hint(question).await
    }

    /// Explain a concept in detail
    pub async fn explain_concept(&self, concept: &str) -> String {
        self.inner.tutor.explain_concept(concept).await
    }

    /// Start a chat session against the generation backend
    pub fn chat_session(&self) -> ChatSession {
        ChatSession::new(Arc::clone(&self.inner.llm))
    }

    /// Number of documents ingested this run
    pub fn document_count(&self) -> usize {
        self.inner.documents.len()
    }

    /// Number of chunks in the semantic index
    pub fn chunk_count(&self) -> usize {
        self.inner.index.chunk_count()
    }

    /// Whether the generation backend has a credential
    pub fn generation_configured(&self) -> bool {
        self.inner.llm.is_configured()
    }

    /// Application configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }
}
