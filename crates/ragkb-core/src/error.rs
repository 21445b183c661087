//! Error types for RAGKB.

use thiserror::Error;

/// Main error type for RAGKB operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Text extraction failed
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Chunking failed
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkError),

    /// Embedding or generation call failed
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Vector store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Text extraction errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("extraction failed: {0}")]
    Failed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Chunking errors.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Embedding and generation errors.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Called before the client handle was initialized
    #[error("model client not initialized")]
    NotInitialized,

    /// Provider unreachable after exhausting retries
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Provider answered with something we cannot use
    #[error("bad provider response: {0}")]
    Response(String),
}

/// Vector store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Collection handle absent or the backing service is unreachable
    #[error("store not ready: {0}")]
    NotReady(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    /// The backing service rejected the operation
    #[error("backend error (code {code}): {message}")]
    Backend { code: i64, message: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type alias for RAGKB operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_error_not_found_display() {
        let err = ExtractError::NotFound("/data/missing.txt".to_string());
        assert_eq!(err.to_string(), "file not found: /data/missing.txt");
    }

    #[test]
    fn extract_error_unsupported_display() {
        let err = ExtractError::UnsupportedFormat("xyz".to_string());
        assert_eq!(err.to_string(), "unsupported format: xyz");
    }

    #[test]
    fn extract_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: ExtractError = io_err.into();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn chunk_error_display() {
        let err = ChunkError::InvalidConfig("overlap must be smaller than chunk size".to_string());
        assert!(err.to_string().contains("overlap must be smaller"));
    }

    #[test]
    fn model_error_not_initialized_display() {
        assert_eq!(
            ModelError::NotInitialized.to_string(),
            "model client not initialized"
        );
    }

    #[test]
    fn model_error_unavailable_display() {
        let err = ModelError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "provider unavailable: connection refused");
    }

    #[test]
    fn store_error_dimension_mismatch_display() {
        let err = StoreError::DimensionMismatch {
            expected: 768,
            actual: 384,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 768, got 384");
    }

    #[test]
    fn store_error_backend_display() {
        let err = StoreError::Backend {
            code: 1100,
            message: "collection not loaded".to_string(),
        };
        assert!(err.to_string().contains("1100"));
        assert!(err.to_string().contains("collection not loaded"));
    }

    #[test]
    fn error_from_extract_error() {
        let err: Error = ExtractError::UnsupportedFormat("bin".to_string()).into();
        assert!(matches!(err, Error::Extraction(_)));
        assert!(err.to_string().contains("bin"));
    }

    #[test]
    fn error_from_model_error() {
        let err: Error = ModelError::NotInitialized.into();
        assert!(matches!(err, Error::Model(_)));
    }

    #[test]
    fn error_from_store_error() {
        let err: Error = StoreError::NotReady("no collection handle".to_string()).into();
        assert!(matches!(err, Error::Store(_)));
        assert!(err.to_string().contains("no collection handle"));
    }

    #[test]
    fn error_chain_io_to_extract_to_main() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "doc.txt");
        let extract_err: ExtractError = io_err.into();
        let main_err: Error = extract_err.into();
        assert!(matches!(main_err, Error::Extraction(ExtractError::Io(_))));
        assert!(main_err.to_string().contains("extraction error"));
    }
}
