//! Retrieval-augmented tutoring
//!
//! Composes semantic search and the generation backend into grounded
//! answers. Search faults are absorbed into a placeholder context; the
//! answer pipeline itself never fails a request.

use std::sync::Arc;

use crate::generation::{ChatMessage, GenerationClient, PromptBuilder};
use crate::retrieval::SemanticIndex;
use crate::types::{AskResponse, SourceRef};

/// Context substituted when retrieval fails
pub const NO_CONTEXT_PLACEHOLDER: &str = "No relevant documents found in the knowledge base.";

/// Source tag attached to every retrieved chunk reference
pub const SOURCE_TAG: &str = "uploaded_documents";

/// Chunks retrieved per question
const ASK_TOP_K: usize = 3;

/// Characters shown in the context preview
const CONTEXT_PREVIEW_CHARS: usize = 500;

/// Tutor over the semantic index and the generation backend
pub struct TutorEngine {
    index: Arc<SemanticIndex>,
    llm: Arc<GenerationClient>,
}

impl TutorEngine {
    /// Create a new tutor
    pub fn new(index: Arc<SemanticIndex>, llm: Arc<GenerationClient>) -> Self {
        Self { index, llm }
    }

    /// Answer a question using the top retrieved chunks as context.
    ///
    /// `sources` holds one positional entry per retrieved chunk;
    /// `context_used` is a 500-character preview of the context, marked
    /// with a trailing ellipsis when truncated.
    pub async fn ask(&self, question: &str) -> AskResponse {
        let results = match self.index.search(question, ASK_TOP_K).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Context retrieval failed, answering without documents: {}", e);
                Vec::new()
            }
        };

        let context = if results.is_empty() {
            NO_CONTEXT_PLACEHOLDER.to_string()
        } else {
            results
                .iter()
                .map(|r| r.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        let prompt = PromptBuilder::build_tutor_prompt(question, &context);
        let answer = self.llm.generate(&prompt, &context).await;

        let sources = (0..results.len())
            .map(|i| SourceRef {
                source: SOURCE_TAG.to_string(),
                chunk_id: i,
            })
            .collect();

        AskResponse {
            answer,
            sources,
            context_used: preview_context(&context),
        }
    }

    /// Provide a hint without revealing the answer
    pub async fn provide_hint(&self, question: &str) -> String {
        self.llm
            .generate(&PromptBuilder::build_hint_prompt(question), "")
            .await
    }

    /// Explain a concept in detail
    pub async fn explain_concept(&self, concept: &str) -> String {
        self.llm
            .generate(&PromptBuilder::build_concept_prompt(concept), "")
            .await
    }
}

/// Conversation buffer over the generation backend's chat interface
pub struct ChatSession {
    llm: Arc<GenerationClient>,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    /// Start an empty session
    pub fn new(llm: Arc<GenerationClient>) -> Self {
        Self {
            llm,
            history: Vec::new(),
        }
    }

    /// Send a user message and record both turns
    pub async fn send(&mut self, message: impl Into<String>) -> String {
        self.history.push(ChatMessage::user(message));
        let reply = self.llm.chat(&self.history).await;
        self.history.push(ChatMessage::assistant(reply.clone()));
        reply
    }

    /// Conversation so far
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Forget the conversation
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

/// 500-character preview of the context, ellipsis-marked when truncated
fn preview_context(context: &str) -> String {
    let char_count = context.chars().count();
    if char_count > CONTEXT_PREVIEW_CHARS {
        let preview: String = context.chars().take(CONTEXT_PREVIEW_CHARS).collect();
        format!("{}...", preview)
    } else {
        context.to_string()
    }
}
