//! # ragkb-rag
//!
//! Document processing and the retrieval engine for RAGKB.
//!
//! [`DocumentProcessor`] runs the ingestion side (extract → normalize →
//! chunk) and [`RagEngine`] composes all components into the tool surface:
//! `query`, `search`, `index_document`, `index_directory`, `stats`,
//! `clear` and `health`.

pub mod engine;
pub mod processor;
pub mod prompt;

pub use engine::{QueryDefaults, RagEngine};
pub use processor::DocumentProcessor;
pub use prompt::NO_MATCH_ANSWER;
