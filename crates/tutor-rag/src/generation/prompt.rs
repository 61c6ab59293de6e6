//! Prompt templates for tutoring, quiz generation and grading

/// Prompt builder for all backend calls
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the tutoring prompt for a question with retrieved context
    pub fn build_tutor_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are an educational tutor. Answer this question with examples and explanations:

Context: {context}

Question: {question}

Include:
- Clear explanation
- Relevant examples
- Key points to remember
- Practice suggestions
- And limit the solution to 100 words only"#,
        )
    }

    /// Build the strict-format MCQ generation prompt.
    ///
    /// The backend is instructed to emit a bare JSON array; everything the
    /// quiz parser tolerates beyond that (fencing, surrounding chatter) is
    /// repair, not contract.
    pub fn build_mcq_prompt(topic: &str, context: &str) -> String {
        format!(
            r#"Generate 5 multiple-choice questions for topic: {topic}
Context: {context}

Return ONLY this JSON format:
[
    {{
        "question": "Question text here",
        "options": ["Option A text", "Option B text", "Option C text", "Option D text"],
        "correct_answer": "A",
        "explanation": "Brief explanation"
    }}
]

Rules: A=first option, B=second, etc. Make options complete sentences."#,
        )
    }

    /// Build the summarization prompt
    pub fn build_summary_prompt(content: &str) -> String {
        format!(
            r#"Please provide a comprehensive summary of the following content:

{content}

The summary should:
1. Capture the main points and key concepts
2. Be well-structured and easy to understand
3. Include important details while being concise
4. Be suitable for study purposes"#,
        )
    }

    /// Build the free-text grading prompt requesting strict JSON output
    pub fn build_grading_prompt(
        question: &str,
        correct_answer: &str,
        student_answer: &str,
        context: &str,
    ) -> String {
        format!(
            r#"Grade the following student answer:

Question: {question}
Correct Answer: {correct_answer}
Student Answer: {student_answer}
Context: {context}

Provide a detailed evaluation including:
1. Score (0-100)
2. Feedback on what was correct
3. Areas for improvement
4. Suggestions for better answers

Format as JSON:
{{
    "score": 85,
    "feedback": "Detailed feedback here",
    "strengths": ["What was good"],
    "improvements": ["What to improve"],
    "suggestions": ["How to improve"]
}}"#,
        )
    }

    /// Build a hint prompt that guides without revealing the answer
    pub fn build_hint_prompt(question: &str) -> String {
        format!(
            r#"Provide a helpful hint for the following question without giving away the complete answer:

Question: {question}

The hint should:
1. Guide the student in the right direction
2. Not reveal the complete answer
3. Encourage critical thinking
4. Be encouraging and supportive"#,
        )
    }

    /// Build a concept explanation prompt
    pub fn build_concept_prompt(concept: &str) -> String {
        format!(
            r#"Explain the concept of "{concept}" in detail for exam preparation:

Include:
1. Clear definition and explanation
2. Key points and important aspects
3. Real-world examples and applications
4. Common misconceptions to avoid
5. Practice tips and strategies
6. Related concepts and connections

Make it comprehensive yet easy to understand."#,
        )
    }

    /// Build a revision-notes prompt over uploaded content
    pub fn build_revision_notes_prompt(topic: &str, content: &str) -> String {
        format!(
            r#"Create structured revision notes for the topic "{topic}" from the following content:

{content}

The notes should cover:
1. Key concepts and definitions
2. Important points worth memorising
3. Common mistakes to avoid
4. Practice tips"#,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tutor_prompt_embeds_question_and_context() {
        let prompt = PromptBuilder::build_tutor_prompt("What is osmosis?", "Cells and membranes.");
        assert!(prompt.contains("What is osmosis?"));
        assert!(prompt.contains("Cells and membranes."));
    }

    #[test]
    fn mcq_prompt_demands_json() {
        let prompt = PromptBuilder::build_mcq_prompt("biology", "");
        assert!(prompt.contains("JSON"));
        assert!(prompt.contains("correct_answer"));
        assert!(prompt.contains("biology"));
    }

    #[test]
    fn grading_prompt_carries_all_fields() {
        let prompt = PromptBuilder::build_grading_prompt("q", "right", "wrong", "ctx");
        for needle in ["q", "right", "wrong", "ctx", "score"] {
            assert!(prompt.contains(needle));
        }
    }
}
