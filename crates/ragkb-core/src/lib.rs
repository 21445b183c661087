//! # ragkb-core
//!
//! Core types and traits for RAGKB, a retrieval-augmented generation
//! knowledge base.
//!
//! This crate provides the foundational abstractions used throughout the
//! workspace:
//!
//! - **Text extraction**: [`DocumentExtractor`] turns document files into text
//! - **Chunking**: [`Chunker`] splits text into overlapping chunks
//! - **Embedding**: [`Embedder`] converts text into fixed-dimension vectors
//! - **Generation**: [`Generator`] produces grounded answers
//! - **Vector storage**: [`VectorStore`] persists and searches embeddings
//!
//! ## Architecture
//!
//! The crate is organized around two pipelines:
//!
//! ```text
//! Document → DocumentExtractor → Chunker → Embedder → VectorStore   (index)
//! Query    → Embedder → VectorStore::search → Generator → answer    (query)
//! ```
//!
//! ## Related crates
//!
//! - `ragkb-extract`: extractor implementations and text normalization
//! - `ragkb-chunker`: recursive overlapping chunker
//! - `ragkb-model`: embedding/generation provider clients
//! - `ragkb-store`: vector store implementations
//! - `ragkb-rag`: document processor and retrieval engine

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ChunkError, Error, ExtractError, ModelError, Result, StoreError};
pub use traits::*;
pub use types::*;
