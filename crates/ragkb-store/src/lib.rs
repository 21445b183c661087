//! # ragkb-store
//!
//! Vector store implementations for RAGKB.
//!
//! Both stores honor the same collection contract (see
//! `ragkb_core::VectorStore`): fixed dimension and metric for the
//! collection lifetime, upsert-by-id inserts stamped with Unix timestamps,
//! threshold-filtered top-k search with metric-aware comparison direction,
//! and a destructive clear that recreates the empty collection.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`MilvusStore`] | Remote Milvus service over its REST v2 API |
//! | [`MemoryStore`] | Brute-force in-memory store for tests and offline use |

pub mod memory;
pub mod milvus;

pub use memory::MemoryStore;
pub use milvus::{MilvusConfig, MilvusStore};
