//! Multiple-choice question types

use serde::{Deserialize, Serialize};

/// The four valid answer letters, in option order
pub const ANSWER_LETTERS: [&str; 4] = ["A", "B", "C", "D"];

/// A single multiple-choice question.
///
/// Items handed to callers have already passed [`McqItem::validate`]:
/// exactly four options and a correct answer in {A, B, C, D}.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct McqItem {
    /// Question text
    pub question: String,
    /// Exactly four option strings, in A-D order
    pub options: Vec<String>,
    /// Correct answer letter: "A", "B", "C" or "D"
    pub correct_answer: String,
    /// Explanation shown after answering
    pub explanation: String,
}

impl McqItem {
    /// Check the schema invariants
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.options.len() != 4 {
            return Err(format!(
                "expected exactly 4 options, got {}",
                self.options.len()
            ));
        }
        if !ANSWER_LETTERS.contains(&self.correct_answer.as_str()) {
            return Err(format!(
                "correct_answer must be one of A-D, got '{}'",
                self.correct_answer
            ));
        }
        Ok(())
    }
}
