//! Quiz and summary generation with schema-checked output
//!
//! The backend is asked for a strict JSON array of question objects. What
//! comes back is repaired through an ordered list of parse strategies
//! (strict parse, fence stripping, substring extraction) and then schema
//! checked. Anything that still fails is replaced wholesale by a fixed
//! fallback quiz, so callers always receive exactly five valid items.

use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::{GenerationClient, PromptBuilder};
use crate::types::McqItem;

/// Number of questions in every generated quiz
pub const MCQ_COUNT: usize = 5;

/// Quiz and summary generator
pub struct QuizGenerator {
    llm: Arc<GenerationClient>,
}

impl QuizGenerator {
    /// Create a new generator
    pub fn new(llm: Arc<GenerationClient>) -> Self {
        Self { llm }
    }

    /// Generate exactly [`MCQ_COUNT`] multiple-choice questions.
    ///
    /// Every returned item has already passed validation (four options,
    /// answer letter in A-D); callers never need to re-check. Malformed or
    /// degraded backend output falls back to the built-in quiz.
    pub async fn generate_mcqs(&self, topic: &str, context: &str) -> Vec<McqItem> {
        let prompt = PromptBuilder::build_mcq_prompt(topic, context);
        let raw = self.llm.generate(&prompt, "").await;

        match parse_mcq_response(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Using fallback quiz for '{}': {}", topic, e);
                fallback_mcqs(topic)
            }
        }
    }

    /// Generate a study summary of the given content.
    ///
    /// Single call, no retry or validation beyond the backend's own
    /// degraded-mode text.
    pub async fn generate_summary(&self, content: &str) -> String {
        self.llm
            .generate(&PromptBuilder::build_summary_prompt(content), "")
            .await
    }

    /// Generate structured revision notes for a topic
    pub async fn generate_revision_notes(&self, topic: &str, content: &str) -> String {
        self.llm
            .generate(&PromptBuilder::build_revision_notes_prompt(topic, content), "")
            .await
    }
}

/// Parse and validate backend output into exactly [`MCQ_COUNT`] items
fn parse_mcq_response(raw: &str) -> Result<Vec<McqItem>> {
    let payload =
        parse_json_payload(raw).ok_or_else(|| Error::schema("no JSON array in response"))?;

    let items: Vec<McqItem> = serde_json::from_value(payload)
        .map_err(|e| Error::schema(format!("items do not match the MCQ schema: {}", e)))?;

    if items.len() < MCQ_COUNT {
        return Err(Error::schema(format!(
            "expected {} items, got {}",
            MCQ_COUNT,
            items.len()
        )));
    }

    for item in items.iter().take(MCQ_COUNT) {
        item.validate().map_err(Error::schema)?;
    }

    let mut items = items;
    items.truncate(MCQ_COUNT);
    Ok(items)
}

/// Ordered parse strategies: strict, fence-stripped, substring-extracted.
/// Returns the first candidate that is a JSON array.
fn parse_json_payload(raw: &str) -> Option<Value> {
    let stripped = strip_code_fences(raw);
    let strategies = [
        Some(raw.trim().to_string()),
        Some(stripped.clone()),
        extract_array(&stripped),
    ];

    for candidate in strategies.into_iter().flatten() {
        if let Ok(value @ Value::Array(_)) = serde_json::from_str::<Value>(&candidate) {
            return Some(value);
        }
    }

    None
}

/// Remove markdown code fencing around a response
fn strip_code_fences(raw: &str) -> String {
    let mut cleaned = raw.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim().to_string()
}

/// Salvage the `[...]` span between the first '[' and the last ']'
fn extract_array(raw: &str) -> Option<String> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }
    Some(raw[start..=end].to_string())
}

/// Fixed deterministic quiz used whenever generation or validation fails
fn fallback_mcqs(topic: &str) -> Vec<McqItem> {
    vec![
        McqItem {
            question: format!("What is the primary focus of {}?", topic),
            options: vec![
                "To replace human intelligence".to_string(),
                "To enhance human capabilities through technology".to_string(),
                "To eliminate the need for data".to_string(),
                "To make computers faster".to_string(),
            ],
            correct_answer: "B".to_string(),
            explanation: format!(
                "{} focuses on enhancing human capabilities through technological advancement.",
                topic
            ),
        },
        McqItem {
            question: format!("Which of the following is a key component of {}?", topic),
            options: vec![
                "Hardware only".to_string(),
                "Software only".to_string(),
                "Both hardware and software".to_string(),
                "Neither hardware nor software".to_string(),
            ],
            correct_answer: "C".to_string(),
            explanation: format!(
                "{} requires both hardware and software components to function effectively.",
                topic
            ),
        },
        McqItem {
            question: format!("What is the main benefit of studying {}?", topic),
            options: vec![
                "To become a programmer".to_string(),
                "To understand modern technology and its applications".to_string(),
                "To avoid using computers".to_string(),
                "To memorize facts".to_string(),
            ],
            correct_answer: "B".to_string(),
            explanation: format!(
                "Studying {} helps understand how modern technology works and its real-world applications.",
                topic
            ),
        },
        McqItem {
            question: format!("Which field is most closely related to {}?", topic),
            options: vec![
                "Literature".to_string(),
                "Mathematics and Computer Science".to_string(),
                "Art History".to_string(),
                "Physical Education".to_string(),
            ],
            correct_answer: "B".to_string(),
            explanation: format!(
                "{} is closely related to mathematics and computer science as it involves algorithms and computational thinking.",
                topic
            ),
        },
        McqItem {
            question: format!("What skill is most important for {}?", topic),
            options: vec![
                "Memorization".to_string(),
                "Critical thinking and problem-solving".to_string(),
                "Physical strength".to_string(),
                "Artistic ability".to_string(),
            ],
            correct_answer: "B".to_string(),
            explanation: format!(
                "Critical thinking and problem-solving are essential skills for understanding and working with {}.",
                topic
            ),
        },
    ]
}
