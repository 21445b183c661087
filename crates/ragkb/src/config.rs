//! Configuration handling for RAGKB.
//!
//! One explicit [`Config`] is loaded at process start and injected into the
//! component constructors; there is no ambient global state.

use directories::ProjectDirs;
use ragkb_core::{ChunkingConfig, SimilarityMetric};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Embedding/generation provider configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Vector store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingSection,

    /// Retrieval configuration
    #[serde(default)]
    pub query: QuerySection,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider base URL; empty means run offline with the noop models
    #[serde(default)]
    pub endpoint: String,

    /// Bearer token for the provider, if required
    #[serde(default)]
    pub api_key: Option<String>,

    /// Embedding model identifier
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embedding vector dimension
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    /// Generation model identifier
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Maximum tokens per generation
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max concurrent embedding calls
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_embedding_model() -> String {
    "granite-embedding-278m-multilingual".to_string()
}

fn default_embedding_dimension() -> usize {
    768
}

fn default_llm_model() -> String {
    "granite-13b-chat-v2".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            embedding_model: default_embedding_model(),
            embedding_dimension: default_embedding_dimension(),
            llm_model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Which store implementation to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Milvus,
}

/// Store-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default)]
    pub metric: SimilarityMetric,
}

fn default_backend() -> StoreBackend {
    StoreBackend::Milvus
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    19530
}

fn default_collection() -> String {
    "rag_knowledge_base".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            host: default_host(),
            port: default_port(),
            collection: default_collection(),
            metric: SimilarityMetric::default(),
        }
    }
}

/// Chunking-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingSection {
    /// Target chunk size (words)
    #[serde(default = "default_chunk_words")]
    pub chunk_words: usize,

    /// Overlap between chunks (words)
    #[serde(default = "default_overlap_words")]
    pub overlap_words: usize,
}

fn default_chunk_words() -> usize {
    80
}

fn default_overlap_words() -> usize {
    10
}

impl Default for ChunkingSection {
    fn default() -> Self {
        Self {
            chunk_words: default_chunk_words(),
            overlap_words: default_overlap_words(),
        }
    }
}

impl ChunkingSection {
    /// Convert into the core chunking config.
    #[must_use]
    pub fn to_core(&self) -> ChunkingConfig {
        ChunkingConfig {
            chunk_words: self.chunk_words,
            overlap_words: self.overlap_words,
        }
    }
}

/// Retrieval-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySection {
    /// Default number of results to retrieve
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum similarity required to keep a result
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,
}

fn default_top_k() -> usize {
    5
}

fn default_score_threshold() -> f32 {
    0.7
}

impl Default for QuerySection {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            score_threshold: default_score_threshold(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, the `RAGKB_CONFIG`
    /// environment variable, or the XDG config directory; defaults apply
    /// when no file exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(default_config_path);

        match path {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(&p)?;
                let config = toml::from_str(&raw)?;
                Ok(config)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Sample configuration file contents.
    #[must_use]
    pub fn sample() -> String {
        let sample = Self::default();
        toml::to_string_pretty(&sample).unwrap_or_default()
    }
}

/// Resolve the default config file path.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("RAGKB_CONFIG") {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "ragkb").map(|dirs| dirs.config_dir().join("config.toml"))
}
