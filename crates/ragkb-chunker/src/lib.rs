//! # ragkb-chunker
//!
//! Text chunking for RAGKB.
//!
//! [`RecursiveChunker`] splits normalized text into overlapping,
//! size-bounded chunks using a coarse-to-fine separator ladder (paragraph
//! break, line break, sentence boundary, space, character). [`chunk_id`]
//! derives the stable identifier for a chunk from its source and position.

pub mod id;
pub mod recursive;

pub use id::chunk_id;
pub use recursive::RecursiveChunker;
