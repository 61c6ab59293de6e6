//! End-to-end pipeline tests: upload, retrieval, quiz and grading flows
//! running against a temporary index and an unconfigured (mock) backend.

use std::io::Write;
use std::path::Path;

use tutor_rag::config::AppConfig;
use tutor_rag::types::McqAnswer;
use tutor_rag::AppState;

fn test_config(data_dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.index.storage_dir = data_dir.join("index");
    config
}

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{}", content).unwrap();
    path
}

#[tokio::test]
async fn upload_then_ask_uses_the_document_as_context() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(dir.path())).unwrap();

    let path = write_file(
        dir.path(),
        "photosynthesis.txt",
        "Photosynthesis converts light into energy.",
    );

    let receipt = state.upload(&path).await.unwrap();
    assert_eq!(receipt.filename, "photosynthesis.txt");
    assert_eq!(receipt.content_length, 42);
    assert_eq!(state.chunk_count(), 1);
    assert_eq!(state.document_count(), 1);

    let response = state.ask("What does photosynthesis convert?").await;
    assert!(!response.answer.is_empty());
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].source, "uploaded_documents");
    assert_eq!(response.sources[0].chunk_id, 0);
    assert!(response
        .context_used
        .contains("Photosynthesis converts light into energy."));
}

#[tokio::test]
async fn ask_without_any_documents_still_answers() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(dir.path())).unwrap();

    let response = state.ask("What is mitosis?").await;
    assert!(!response.answer.is_empty());
    assert!(response.sources.is_empty());
    assert_eq!(
        response.context_used,
        "No relevant documents found in the knowledge base."
    );
}

#[tokio::test]
async fn index_contents_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    {
        let state = AppState::new(config.clone()).unwrap();
        let path = write_file(
            dir.path(),
            "cells.txt",
            "The mitochondrion is the powerhouse of the cell.",
        );
        state.upload(&path).await.unwrap();
        assert_eq!(state.chunk_count(), 1);
    }

    // New process, same storage directory.
    let state = AppState::new(config).unwrap();
    assert_eq!(state.chunk_count(), 1);

    let response = state.ask("What is the powerhouse of the cell?").await;
    assert_eq!(response.sources.len(), 1);
}

#[tokio::test]
async fn corrupt_index_is_recreated_on_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    std::fs::create_dir_all(&config.index.storage_dir).unwrap();
    std::fs::write(config.index.storage_dir.join("index.json"), "{broken").unwrap();

    let state = AppState::new(config).unwrap();
    assert_eq!(state.chunk_count(), 0);
}

#[tokio::test]
async fn empty_upload_indexes_nothing_but_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(dir.path())).unwrap();

    let path = write_file(dir.path(), "empty.txt", "");
    let receipt = state.upload(&path).await.unwrap();
    assert_eq!(receipt.content_length, 0);
    assert_eq!(state.chunk_count(), 0);
}

#[tokio::test]
async fn unsupported_upload_is_rejected_with_the_extension() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(dir.path())).unwrap();

    let path = write_file(dir.path(), "slides.pptx", "not really a deck");
    let err = state.upload(&path).await.unwrap_err();
    assert!(err.to_string().contains(".pptx"));
}

#[tokio::test]
async fn reuploading_the_same_document_appends_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(dir.path())).unwrap();

    let path = write_file(
        dir.path(),
        "notes.txt",
        "Photosynthesis converts light into energy.",
    );
    state.upload(&path).await.unwrap();
    state.upload(&path).await.unwrap();

    // Re-indexing is allowed; the index simply grows.
    assert_eq!(state.chunk_count(), 2);
    assert_eq!(state.document_count(), 2);
}

#[tokio::test]
async fn quiz_and_grading_flows_work_degraded() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(dir.path())).unwrap();
    assert!(!state.generation_configured());

    let mcqs = state.generate_mcqs("biology", "").await;
    assert_eq!(mcqs.len(), 5);
    for mcq in &mcqs {
        assert_eq!(mcq.options.len(), 4);
        assert!(["A", "B", "C", "D"].contains(&mcq.correct_answer.as_str()));
    }

    let summary = state.generate_summary("Notes about cell division.").await;
    assert!(summary.contains("Mock response"));

    let grade = state
        .grade("Define osmosis.", "Water diffusion.", "Something.", "")
        .await;
    assert_eq!(grade.score, 0.0);

    let set = state.grade_mcq_set(&[
        McqAnswer {
            question_id: None,
            student_answer: "A".to_string(),
            correct_answer: "A".to_string(),
        },
        McqAnswer {
            question_id: None,
            student_answer: "B".to_string(),
            correct_answer: "C".to_string(),
        },
    ]);
    assert_eq!(set.total_score, 1);
    assert_eq!(set.total_questions, 2);
    assert_eq!(set.percentage, 50.0);
    assert_eq!(set.grade, "D");
}
