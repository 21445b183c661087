//! Core types for RAGKB.
//!
//! Shared data structures used across the pipeline:
//!
//! ## Ingestion
//! - [`DocumentChunk`]: a positioned chunk of a source document
//! - [`EmbeddedChunk`]: a chunk paired with its embedding, ready to insert
//! - [`ChunkingConfig`]: chunk/overlap sizing in words
//!
//! ## Search
//! - [`SearchHit`]: a matching record with its similarity score
//! - [`SimilarityMetric`]: collection-wide similarity metric
//! - [`CollectionStats`]: entity count and collection schema facts
//!
//! ## Tool surface
//! - [`QueryResponse`], [`SearchResponse`], [`IndexReport`], [`OpReport`],
//!   [`HealthReport`]: typed results for each engine operation

use serde::{Deserialize, Serialize};

// ============================================================================
// Ingestion
// ============================================================================

/// A chunk of a source document with positional metadata.
///
/// `id` is a deterministic function of `(source, chunk_index)` and is stable
/// across re-runs, which makes it usable as the dedup/delete key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Stable chunk identifier (truncated hex digest)
    pub id: String,
    /// Chunk text content
    pub text: String,
    /// Originating document path
    pub source: String,
    /// Position within the source document, sequential from 0
    pub chunk_index: u32,
    /// Number of chunks produced from the source document
    pub total_chunks: u32,
}

/// A chunk paired with its embedding vector, the unit handed to the store.
///
/// The store's insert contract requires id, text, vector and source for every
/// record; bundling them in one struct makes mismatched-length inputs
/// unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    pub id: String,
    pub text: String,
    pub source: String,
    pub vector: Vec<f32>,
}

/// Configuration for chunking, sized in words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in words
    pub chunk_words: usize,
    /// Overlap between consecutive chunks in words
    pub overlap_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_words: 80,
            overlap_words: 10,
        }
    }
}

impl ChunkingConfig {
    /// Validate the sizing. Overlap at or above the chunk size can never
    /// make progress and is rejected up front.
    pub fn validate(&self) -> std::result::Result<(), crate::error::ChunkError> {
        if self.chunk_words == 0 {
            return Err(crate::error::ChunkError::InvalidConfig(
                "chunk_words must be greater than zero".to_string(),
            ));
        }
        if self.overlap_words >= self.chunk_words {
            return Err(crate::error::ChunkError::InvalidConfig(format!(
                "overlap_words ({}) must be smaller than chunk_words ({})",
                self.overlap_words, self.chunk_words
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Search
// ============================================================================

/// Similarity metric fixed per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    #[default]
    Cosine,
    /// Inner product
    Ip,
    /// Euclidean distance
    L2,
}

impl SimilarityMetric {
    /// Whether a larger score means a better match. L2 is a distance, so
    /// smaller is better and every threshold comparison must invert.
    #[must_use]
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, SimilarityMetric::L2)
    }

    /// Metric name as the backing store spells it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMetric::Cosine => "COSINE",
            SimilarityMetric::Ip => "IP",
            SimilarityMetric::L2 => "L2",
        }
    }

    /// Parse a metric name, case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "COSINE" => Some(SimilarityMetric::Cosine),
            "IP" => Some(SimilarityMetric::Ip),
            "L2" => Some(SimilarityMetric::L2),
            _ => None,
        }
    }

    /// True when `score` is on the keep side of `threshold` for this metric.
    #[must_use]
    pub fn passes_threshold(&self, score: f32, threshold: f32) -> bool {
        if self.higher_is_better() {
            score >= threshold
        } else {
            score <= threshold
        }
    }
}

/// A search result returned from the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Chunk identifier
    pub id: String,
    /// Chunk text content
    pub text: String,
    /// Originating document path
    pub source: String,
    /// Unix timestamp stamped at index time
    pub timestamp: i64,
    /// Similarity score; comparison direction depends on the metric
    pub score: f32,
}

/// Collection statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub collection_name: String,
    pub num_entities: u64,
    pub metric_type: SimilarityMetric,
    pub dimension: usize,
}

// ============================================================================
// Generation
// ============================================================================

/// Parameters for a generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

// ============================================================================
// Tool surface
// ============================================================================

/// Source attribution attached to a query answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub source: String,
    pub score: f32,
    pub chunk_id: String,
}

/// Result of a grounded query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    /// Retrieved chunk texts, best match first
    pub context: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceRef>>,
}

/// Result of a raw search (no generation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub count: usize,
}

/// Outcome category for indexing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    Success,
    /// Nothing to index; reported without raising an error
    NoContent,
}

/// Result of indexing a document or directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexReport {
    pub status: IndexStatus,
    pub chunks_indexed: u64,
    pub message: String,
}

/// Result of a destructive maintenance operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpReport {
    pub status: String,
    pub message: String,
}

impl OpReport {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// Component health summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub embedder: bool,
    pub store: bool,
}

impl HealthReport {
    #[must_use]
    pub fn healthy(&self) -> bool {
        self.embedder && self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunking_config_default() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_words, 80);
        assert_eq!(config.overlap_words, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn chunking_config_rejects_overlap_at_size() {
        let config = ChunkingConfig {
            chunk_words: 50,
            overlap_words: 50,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn chunking_config_rejects_overlap_above_size() {
        let config = ChunkingConfig {
            chunk_words: 50,
            overlap_words: 80,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn chunking_config_rejects_zero_size() {
        let config = ChunkingConfig {
            chunk_words: 0,
            overlap_words: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn metric_direction() {
        assert!(SimilarityMetric::Cosine.higher_is_better());
        assert!(SimilarityMetric::Ip.higher_is_better());
        assert!(!SimilarityMetric::L2.higher_is_better());
    }

    #[test]
    fn metric_threshold_cosine() {
        let m = SimilarityMetric::Cosine;
        assert!(m.passes_threshold(0.8, 0.7));
        assert!(m.passes_threshold(0.7, 0.7));
        assert!(!m.passes_threshold(0.69, 0.7));
    }

    #[test]
    fn metric_threshold_l2_inverts() {
        let m = SimilarityMetric::L2;
        assert!(m.passes_threshold(0.3, 0.5));
        assert!(m.passes_threshold(0.5, 0.5));
        assert!(!m.passes_threshold(0.9, 0.5));
    }

    #[test]
    fn metric_round_trip() {
        for metric in [
            SimilarityMetric::Cosine,
            SimilarityMetric::Ip,
            SimilarityMetric::L2,
        ] {
            assert_eq!(SimilarityMetric::parse(metric.as_str()), Some(metric));
        }
        assert_eq!(SimilarityMetric::parse("cosine"), Some(SimilarityMetric::Cosine));
        assert_eq!(SimilarityMetric::parse("hamming"), None);
    }

    #[test]
    fn metric_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&SimilarityMetric::Cosine).unwrap(),
            "\"cosine\""
        );
        assert_eq!(serde_json::to_string(&SimilarityMetric::L2).unwrap(), "\"l2\"");
    }

    #[test]
    fn document_chunk_serialization() {
        let chunk = DocumentChunk {
            id: "abc123".to_string(),
            text: "some text".to_string(),
            source: "/docs/guide.md".to_string(),
            chunk_index: 2,
            total_chunks: 5,
        };
        let json = serde_json::to_string(&chunk).unwrap();
        let back: DocumentChunk = serde_json::from_str(&json).unwrap();
        assert_eq!(chunk, back);
    }

    #[test]
    fn query_response_omits_absent_sources() {
        let response = QueryResponse {
            answer: "answer".to_string(),
            context: vec![],
            sources: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("sources"));
    }

    #[test]
    fn query_response_keeps_empty_sources() {
        let response = QueryResponse {
            answer: "answer".to_string(),
            context: vec![],
            sources: Some(vec![]),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"sources\":[]"));
    }

    #[test]
    fn index_status_serialization() {
        assert_eq!(
            serde_json::to_string(&IndexStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&IndexStatus::NoContent).unwrap(),
            "\"no_content\""
        );
    }

    #[test]
    fn op_report_success() {
        let report = OpReport::success("collection cleared");
        assert_eq!(report.status, "success");
        assert_eq!(report.message, "collection cleared");
    }

    #[test]
    fn health_report_aggregation() {
        assert!(HealthReport {
            embedder: true,
            store: true
        }
        .healthy());
        assert!(!HealthReport {
            embedder: true,
            store: false
        }
        .healthy());
    }
}
