//! # ragkb-model
//!
//! Clients for the embedding and generation provider.
//!
//! The provider is a black box behind an HTTP contract: one long-lived
//! [`ProviderClient`] is shared by [`HttpEmbedder`] and [`HttpGenerator`]
//! for the process lifetime. Transient failures (429, 5xx, connect,
//! timeout) are retried with bounded exponential backoff; all other
//! components treat model calls as fallible and never retry themselves.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ProviderClient`] | Shared HTTP handle with [`RetryPolicy`] |
//! | [`HttpEmbedder`] | `/v1/embeddings` client |
//! | [`HttpGenerator`] | `/v1/completions` client |
//! | [`NoopEmbedder`] | Deterministic hash-based offline embedder |
//! | [`NoopGenerator`] | Offline generation stand-in |
//! | [`EmbedderPool`] | Semaphore-bounded concurrency wrapper |

pub mod client;
pub mod embedder;
pub mod generator;
pub mod noop;
pub mod pool;
pub mod retry;

pub use client::ProviderClient;
pub use embedder::HttpEmbedder;
pub use generator::HttpGenerator;
pub use noop::{NoopEmbedder, NoopGenerator};
pub use pool::EmbedderPool;
pub use retry::RetryPolicy;
