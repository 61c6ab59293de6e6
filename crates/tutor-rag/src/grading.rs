//! Grading: LLM-backed free-text evaluation and deterministic MCQ scoring
//!
//! Free-text grading delegates to the generation backend and must never
//! raise past this boundary: output that cannot be read as a grade becomes
//! a zero-score record. Multiple-choice scoring is pure arithmetic and
//! makes no backend call.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::{GenerationClient, PromptBuilder};
use crate::types::{GradeResult, McqAnswer, McqSetGrade};

/// Grading engine
pub struct GradingEngine {
    llm: Arc<GenerationClient>,
}

impl GradingEngine {
    /// Create a new grading engine
    pub fn new(llm: Arc<GenerationClient>) -> Self {
        Self { llm }
    }

    /// Grade a free-text answer against a reference answer.
    ///
    /// A broken grade is always preferable to a crashed request: any output
    /// that is not a valid grade JSON yields [`GradeResult::failed`].
    pub async fn grade(
        &self,
        question: &str,
        correct_answer: &str,
        student_answer: &str,
        context: &str,
    ) -> GradeResult {
        let prompt =
            PromptBuilder::build_grading_prompt(question, correct_answer, student_answer, context);
        let raw = self.llm.generate(&prompt, "").await;

        match parse_grade_response(&raw) {
            Ok(grade) => grade,
            Err(e) => {
                tracing::warn!("Grade output unusable, returning zero-score record: {}", e);
                GradeResult::failed()
            }
        }
    }

    /// Grade a set of multiple-choice answers: one point per exact match.
    ///
    /// Deterministic, no LLM call. An empty submission scores 0% / F
    /// rather than dividing by zero.
    pub fn grade_mcq_set(&self, answers: &[McqAnswer]) -> McqSetGrade {
        let mut total_score = 0u32;
        let mut feedback = Vec::with_capacity(answers.len());

        for (i, answer) in answers.iter().enumerate() {
            let label = answer
                .question_id
                .clone()
                .unwrap_or_else(|| (i + 1).to_string());

            if answer.student_answer == answer.correct_answer {
                total_score += 1;
                feedback.push(format!("Question {}: Correct!", label));
            } else {
                feedback.push(format!(
                    "Question {}: Incorrect. Correct answer was {}",
                    label, answer.correct_answer
                ));
            }
        }

        let total_questions = answers.len();
        let percentage = if total_questions == 0 {
            0.0
        } else {
            f64::from(total_score) / total_questions as f64 * 100.0
        };

        McqSetGrade {
            total_score,
            total_questions,
            percentage,
            feedback,
            grade: letter_grade(percentage).to_string(),
        }
    }
}

/// Letter grade for a percentage
fn letter_grade(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "A+"
    } else if percentage >= 80.0 {
        "A"
    } else if percentage >= 70.0 {
        "B"
    } else if percentage >= 60.0 {
        "C"
    } else if percentage >= 50.0 {
        "D"
    } else {
        "F"
    }
}

/// Parse backend output into a grade, tolerating code fencing
fn parse_grade_response(raw: &str) -> Result<GradeResult> {
    let candidate = strip_fences(raw);
    let grade: GradeResult = serde_json::from_str(candidate)
        .map_err(|e| Error::schema(format!("grade output is not valid JSON: {}", e)))?;
    Ok(grade.clamp_score())
}

fn strip_fences(raw: &str) -> &str {
    let mut cleaned = raw.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;

    fn engine() -> GradingEngine {
        GradingEngine::new(Arc::new(GenerationClient::new(&GenerationConfig::default())))
    }

    fn answer(student: &str, correct: &str) -> McqAnswer {
        McqAnswer {
            question_id: None,
            student_answer: student.to_string(),
            correct_answer: correct.to_string(),
        }
    }

    #[test]
    fn empty_submission_scores_zero_without_raising() {
        let grade = engine().grade_mcq_set(&[]);
        assert_eq!(grade.total_score, 0);
        assert_eq!(grade.total_questions, 0);
        assert_eq!(grade.percentage, 0.0);
        assert_eq!(grade.grade, "F");
        assert!(grade.feedback.is_empty());
    }

    #[test]
    fn all_correct_is_a_plus() {
        let answers = vec![answer("A", "A"), answer("C", "C"), answer("D", "D")];
        let grade = engine().grade_mcq_set(&answers);
        assert_eq!(grade.total_score, 3);
        assert_eq!(grade.percentage, 100.0);
        assert_eq!(grade.grade, "A+");
    }

    #[test]
    fn half_right_is_a_d() {
        let answers = vec![answer("A", "A"), answer("B", "C")];
        let grade = engine().grade_mcq_set(&answers);
        assert_eq!(grade.total_score, 1);
        assert_eq!(grade.total_questions, 2);
        assert_eq!(grade.percentage, 50.0);
        assert_eq!(grade.grade, "D");
    }

    #[test]
    fn feedback_names_the_correct_answer_when_wrong() {
        let answers = vec![answer("A", "A"), answer("B", "C")];
        let grade = engine().grade_mcq_set(&answers);
        assert_eq!(grade.feedback.len(), 2);
        assert!(grade.feedback[0].contains("Correct!"));
        assert!(grade.feedback[1].contains("Incorrect"));
        assert!(grade.feedback[1].contains('C'));
    }

    #[test]
    fn question_ids_show_up_in_feedback() {
        let mut a = answer("A", "B");
        a.question_id = Some("q-42".to_string());
        let grade = engine().grade_mcq_set(&[a]);
        assert!(grade.feedback[0].contains("q-42"));
    }

    #[test]
    fn letter_grade_thresholds() {
        assert_eq!(letter_grade(100.0), "A+");
        assert_eq!(letter_grade(90.0), "A+");
        assert_eq!(letter_grade(89.9), "A");
        assert_eq!(letter_grade(80.0), "A");
        assert_eq!(letter_grade(70.0), "B");
        assert_eq!(letter_grade(60.0), "C");
        assert_eq!(letter_grade(50.0), "D");
        assert_eq!(letter_grade(49.9), "F");
        assert_eq!(letter_grade(0.0), "F");
    }

    #[test]
    fn valid_grade_json_parses_and_clamps() {
        let raw = r#"{"score": 130, "feedback": "great", "strengths": ["s"], "improvements": [], "suggestions": []}"#;
        let grade = parse_grade_response(raw).unwrap();
        assert_eq!(grade.score, 100.0);
        assert_eq!(grade.feedback, "great");
    }

    #[test]
    fn fenced_grade_json_parses() {
        let raw = "```json\n{\"score\": 75, \"feedback\": \"ok\"}\n```";
        let grade = parse_grade_response(raw).unwrap();
        assert_eq!(grade.score, 75.0);
        assert!(grade.strengths.is_empty());
    }

    #[test]
    fn prose_output_is_rejected() {
        assert!(parse_grade_response("The student did quite well overall.").is_err());
    }

    #[tokio::test]
    async fn degraded_backend_yields_the_zero_score_record() {
        let grade = engine()
            .grade("What is osmosis?", "Diffusion of water.", "No idea.", "")
            .await;
        assert_eq!(grade.score, 0.0);
        assert_eq!(grade.feedback, "Error processing grade");
        assert!(grade.strengths.is_empty());
        assert!(grade.improvements.is_empty());
        assert!(grade.suggestions.is_empty());
    }
}
