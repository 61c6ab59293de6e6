//! Configuration for the tutoring core

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upload boundary limits (consumed by the surrounding service layer)
    #[serde(default)]
    pub upload: UploadConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Semantic index configuration
    #[serde(default)]
    pub index: IndexConfig,
    /// Generation backend configuration
    #[serde(default)]
    pub llm: GenerationConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&data)
            .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// Build a configuration from defaults plus environment overrides.
    ///
    /// `GEMINI_API_KEY` and `GEMINI_MODEL` configure the generation backend;
    /// `TUTOR_DATA_DIR` relocates the index. Absence of the API key leaves the
    /// backend in degraded mode.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                config.llm.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.is_empty() {
                config.llm.model = model;
            }
        }
        if let Ok(dir) = std::env::var("TUTOR_DATA_DIR") {
            if !dir.is_empty() {
                config.index.storage_dir = PathBuf::from(dir);
            }
        }

        config
    }
}

/// Upload boundary configuration.
///
/// Enforced by the HTTP layer before the core sees a file; kept here so that
/// layer and the core agree on one source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Allowed file extensions (lower-case, without the dot)
    pub allowed_extensions: Vec<String>,
    /// Maximum upload size in bytes
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: ["pdf", "docx", "txt", "jpg", "png", "jpeg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: 50 * 1024 * 1024, // 50 MiB
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding dimensions
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { dimensions: 384 }
    }
}

/// Semantic index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory the index snapshot lives in; must survive restarts
    pub storage_dir: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        let storage_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tutor-rag")
            .join("index");

        Self { storage_dir }
    }
}

/// Generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// API key; `None` puts the backend in degraded (mock) mode
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens per response
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.7,
            max_output_tokens: 2048,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}
