//! Grading types

use serde::{Deserialize, Serialize};

/// Result of grading a free-text answer.
///
/// Transient, per request. `score` is always within [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResult {
    /// Score from 0 to 100
    pub score: f64,
    /// Overall feedback
    pub feedback: String,
    /// What the answer got right
    #[serde(default)]
    pub strengths: Vec<String>,
    /// What to improve
    #[serde(default)]
    pub improvements: Vec<String>,
    /// How to improve
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl GradeResult {
    /// Deterministic zero-score record used when the backend output cannot
    /// be interpreted as a grade.
    pub fn failed() -> Self {
        Self {
            score: 0.0,
            feedback: "Error processing grade".to_string(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Clamp the score into [0, 100]
    pub fn clamp_score(mut self) -> Self {
        self.score = self.score.clamp(0.0, 100.0);
        self
    }
}

/// One submitted multiple-choice answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McqAnswer {
    /// Question identifier, if the client supplied one
    #[serde(default)]
    pub question_id: Option<String>,
    /// Letter the student picked
    pub student_answer: String,
    /// Letter that is correct
    pub correct_answer: String,
}

/// Graded multiple-choice submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McqSetGrade {
    /// Number of correct answers
    pub total_score: u32,
    /// Number of questions graded
    pub total_questions: usize,
    /// total_score / total_questions * 100 (0 for an empty submission)
    pub percentage: f64,
    /// One feedback line per question, in submission order
    pub feedback: Vec<String>,
    /// Letter grade: A+, A, B, C, D or F
    pub grade: String,
}
