//! # RAGKB CLI
//!
//! Command-line interface for RAGKB, a retrieval-augmented generation
//! knowledge base.
//!
//! ## Commands
//!
//! - `ragkb index <PATH> [--recursive]` - index a document or directory
//! - `ragkb query <TEXT>` - ask a question grounded in indexed content
//! - `ragkb search <TEXT>` - semantic search without generation
//! - `ragkb stats` - collection statistics
//! - `ragkb clear --yes` - drop all indexed data
//! - `ragkb health` - probe the embedder and the store
//! - `ragkb config show|init` - inspect or scaffold configuration
//!
//! ## Examples
//!
//! ```bash
//! # Index a directory of documents
//! ragkb index ~/notes --recursive
//!
//! # Ask a question
//! ragkb query "how does the billing retry work?"
//!
//! # Machine-readable output
//! ragkb search "vector index" --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ragkb_core::{Embedder, GenerationParams, Generator, VectorStore};
use ragkb_model::{
    EmbedderPool, HttpEmbedder, HttpGenerator, NoopEmbedder, NoopGenerator, ProviderClient,
};
use ragkb_rag::{DocumentProcessor, QueryDefaults, RagEngine};
use ragkb_store::{MemoryStore, MilvusConfig, MilvusStore};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;

use config::{Config, StoreBackend};

#[derive(Parser)]
#[command(name = "ragkb")]
#[command(about = "Retrieval-augmented generation knowledge base")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/ragkb/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a document or a directory of documents
    Index {
        /// File or directory to index
        path: PathBuf,

        /// Recurse into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },

    /// Ask a question grounded in the knowledge base
    Query {
        /// Question text
        text: String,

        /// Number of chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Omit source attributions from the answer
        #[arg(long)]
        no_sources: bool,
    },

    /// Semantic search without generation
    Search {
        /// Search text
        text: String,

        /// Number of results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show collection statistics
    Stats,

    /// Drop all indexed data (destructive)
    Clear {
        /// Skip the confirmation requirement
        #[arg(short, long)]
        yes: bool,
    },

    /// Probe the embedder and the vector store
    Health,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print a sample configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(cli.verbose, &config.logging.level);

    // Config management needs no engine.
    if let Commands::Config { action } = &cli.command {
        match action {
            ConfigAction::Show => print!("{}", toml::to_string_pretty(&config)?),
            ConfigAction::Init => print!("{}", Config::sample()),
        }
        return Ok(());
    }

    let engine = build_engine(&config).await?;

    match cli.command {
        Commands::Index { path, recursive } => {
            let report = if path.is_dir() {
                engine.index_directory(&path, recursive).await?
            } else {
                engine.index_document(&path).await?
            };
            emit(cli.format, &report, || {
                format!(
                    "{:?}: {} chunks indexed ({})",
                    report.status, report.chunks_indexed, report.message
                )
            })
        }

        Commands::Query {
            text,
            top_k,
            no_sources,
        } => {
            let response = engine.query(&text, top_k, !no_sources).await?;
            emit(cli.format, &response, || {
                let mut out = response.answer.clone();
                if let Some(sources) = &response.sources {
                    if !sources.is_empty() {
                        out.push_str("\n\nSources:");
                        for source in sources {
                            out.push_str(&format!(
                                "\n  [{:.3}] {} ({})",
                                source.score, source.source, source.chunk_id
                            ));
                        }
                    }
                }
                out
            })
        }

        Commands::Search { text, top_k } => {
            let response = engine.search(&text, top_k).await?;
            emit(cli.format, &response, || {
                let mut out = String::new();
                for (i, hit) in response.results.iter().enumerate() {
                    out.push_str(&format!(
                        "{}. [{:.3}] {}\n   {}\n",
                        i + 1,
                        hit.score,
                        hit.source,
                        truncate(&hit.text, 160)
                    ));
                }
                out.push_str(&format!("{} results", response.count));
                out
            })
        }

        Commands::Stats => {
            let stats = engine.stats().await?;
            emit(cli.format, &stats, || {
                format!(
                    "collection: {}\nentities:   {}\nmetric:     {}\ndimension:  {}",
                    stats.collection_name,
                    stats.num_entities,
                    stats.metric_type.as_str(),
                    stats.dimension
                )
            })
        }

        Commands::Clear { yes } => {
            anyhow::ensure!(yes, "refusing to clear the knowledge base without --yes");
            let report = engine.clear().await?;
            emit(cli.format, &report, || report.message.clone())
        }

        Commands::Health => {
            let health = engine.health().await;
            emit(cli.format, &health, || {
                format!(
                    "embedder: {}\nstore:    {}",
                    if health.embedder { "ok" } else { "unhealthy" },
                    if health.store { "ok" } else { "unhealthy" }
                )
            })?;
            anyhow::ensure!(health.healthy(), "one or more components unhealthy");
            Ok(())
        }

        Commands::Config { .. } => unreachable!("handled above"),
    }
}

fn init_tracing(verbose: bool, configured_level: &str) {
    let level = if verbose {
        Level::DEBUG
    } else {
        configured_level.parse().unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Wire components per configuration and hand back the engine.
async fn build_engine(config: &Config) -> Result<RagEngine> {
    let processor = DocumentProcessor::new(&config.chunking.to_core())
        .context("invalid chunking configuration")?;

    let (embedder, generator): (Arc<dyn Embedder>, Arc<dyn Generator>) =
        if config.model.endpoint.is_empty() {
            info!("no provider endpoint configured, running with offline models");
            (
                Arc::new(NoopEmbedder::with_dimension(config.model.embedding_dimension)),
                Arc::new(NoopGenerator),
            )
        } else {
            let client = Arc::new(ProviderClient::new(
                config.model.endpoint.clone(),
                config.model.api_key.clone(),
            ));
            client
                .init()
                .await
                .context("failed to initialize provider client")?;
            (
                Arc::new(HttpEmbedder::new(
                    Arc::clone(&client),
                    config.model.embedding_model.clone(),
                    config.model.embedding_dimension,
                )),
                Arc::new(HttpGenerator::new(client, config.model.llm_model.clone())),
            )
        };

    let embedder: Arc<dyn Embedder> =
        Arc::new(EmbedderPool::new(embedder, config.model.max_concurrent));

    let store: Arc<dyn VectorStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new(
            config.store.collection.clone(),
            config.model.embedding_dimension,
            config.store.metric,
        )),
        StoreBackend::Milvus => Arc::new(
            MilvusStore::connect(MilvusConfig {
                host: config.store.host.clone(),
                port: config.store.port,
                collection: config.store.collection.clone(),
                dimension: config.model.embedding_dimension,
                metric: config.store.metric,
            })
            .await
            .context("failed to connect to the vector store")?,
        ),
    };

    Ok(RagEngine::new(
        processor,
        embedder,
        generator,
        store,
        QueryDefaults {
            top_k: config.query.top_k,
            score_threshold: config.query.score_threshold,
        },
        GenerationParams {
            max_tokens: config.model.max_tokens,
            temperature: config.model.temperature,
        },
    ))
}

fn emit<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", text()),
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn truncate_cuts_on_char_boundary() {
        let text = "日本語のテキストです";
        let cut = truncate(text, 4);
        assert_eq!(cut, "日本語の…");
    }
}
