//! Milvus-backed vector store.
//!
//! Talks to the Milvus REST v2 API; the engine itself stays a black box
//! behind this client. One collection per store instance, with a fixed
//! five-field schema: `id`, `text`, `vector[dim]`, `source`, `timestamp`.

use async_trait::async_trait;
use chrono::Utc;
use ragkb_core::{
    CollectionStats, EmbeddedChunk, SearchHit, SimilarityMetric, StoreError, VectorStore,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Request timeout for store calls.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a Milvus collection.
#[derive(Debug, Clone)]
pub struct MilvusConfig {
    pub host: String,
    pub port: u16,
    pub collection: String,
    pub dimension: usize,
    pub metric: SimilarityMetric,
}

/// Vector store backed by a remote Milvus service.
pub struct MilvusStore {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    dimension: usize,
    metric: SimilarityMetric,
}

impl MilvusStore {
    /// Connect to the service and create or load the collection.
    ///
    /// Connection failure is fatal and returned to the caller; there is no
    /// retry here.
    pub async fn connect(config: MilvusConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| StoreError::Connect(format!("failed to build http client: {e}")))?;

        let store = Self {
            http,
            base_url: format!("http://{}:{}", config.host, config.port),
            collection: config.collection,
            dimension: config.dimension,
            metric: config.metric,
        };

        if store.has_collection().await? {
            info!("loading existing collection {}", store.collection);
        } else {
            info!("creating collection {}", store.collection);
            store.create_collection().await?;
        }
        store.load_collection().await?;

        Ok(store)
    }

    /// Collection name this store operates on.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, StoreError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    StoreError::NotReady(e.to_string())
                } else {
                    StoreError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Request(format!("{path} returned {status}")));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| StoreError::Request(format!("malformed response: {e}")))?;
        envelope.into_data()
    }

    async fn has_collection(&self) -> Result<bool, StoreError> {
        let data = self
            .post(
                "/v2/vectordb/collections/has",
                json!({ "collectionName": self.collection }),
            )
            .await?;
        Ok(data.get("has").and_then(Value::as_bool).unwrap_or(false))
    }

    async fn create_collection(&self) -> Result<(), StoreError> {
        let body = create_collection_body(&self.collection, self.dimension, self.metric);
        self.post("/v2/vectordb/collections/create", body).await?;
        Ok(())
    }

    async fn load_collection(&self) -> Result<(), StoreError> {
        self.post(
            "/v2/vectordb/collections/load",
            json!({ "collectionName": self.collection }),
        )
        .await?;
        Ok(())
    }

    /// Records are not guaranteed visible to search before the flush
    /// completes.
    async fn flush(&self) -> Result<(), StoreError> {
        self.post(
            "/v2/vectordb/collections/flush",
            json!({ "collectionName": self.collection }),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for MilvusStore {
    async fn insert(&self, records: &[EmbeddedChunk]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        check_dimensions(records, self.dimension)?;

        let timestamp = Utc::now().timestamp();
        let rows: Vec<Value> = records
            .iter()
            .map(|record| {
                json!({
                    "id": record.id,
                    "text": record.text,
                    "vector": record.vector,
                    "source": record.source,
                    "timestamp": timestamp,
                })
            })
            .collect();

        self.post(
            "/v2/vectordb/entities/insert",
            json!({ "collectionName": self.collection, "data": rows }),
        )
        .await?;
        self.flush().await?;

        debug!("inserted {} records into {}", records.len(), self.collection);
        Ok(())
    }

    async fn search(
        &self,
        query: &[f32],
        top_k: usize,
        score_threshold: f32,
    ) -> Result<Vec<SearchHit>, StoreError> {
        if query.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let data = self
            .post(
                "/v2/vectordb/entities/search",
                json!({
                    "collectionName": self.collection,
                    "data": [query],
                    "annsField": "vector",
                    "limit": top_k,
                    "outputFields": ["id", "text", "source", "timestamp"],
                }),
            )
            .await?;

        let mut hits = parse_hits(&data)?;
        hits.retain(|hit| self.metric.passes_threshold(hit.score, score_threshold));
        if self.metric.higher_is_better() {
            hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        } else {
            hits.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));
        }

        debug!("search returned {} hits above threshold", hits.len());
        Ok(hits)
    }

    async fn delete(&self, ids: &[String]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }

        self.post(
            "/v2/vectordb/entities/delete",
            json!({
                "collectionName": self.collection,
                "filter": delete_filter(ids),
            }),
        )
        .await?;
        self.flush().await?;

        debug!("deleted {} ids from {}", ids.len(), self.collection);
        Ok(())
    }

    async fn stats(&self) -> Result<CollectionStats, StoreError> {
        let data = self
            .post(
                "/v2/vectordb/collections/get_stats",
                json!({ "collectionName": self.collection }),
            )
            .await?;

        Ok(CollectionStats {
            collection_name: self.collection.clone(),
            num_entities: parse_row_count(&data),
            metric_type: self.metric,
            dimension: self.dimension,
        })
    }

    async fn clear(&self) -> Result<(), StoreError> {
        warn!("dropping collection {}", self.collection);
        self.post(
            "/v2/vectordb/collections/drop",
            json!({ "collectionName": self.collection }),
        )
        .await?;

        self.create_collection().await?;
        self.load_collection().await?;
        info!("collection {} recreated and loaded", self.collection);
        Ok(())
    }
}

/// Response envelope shared by all Milvus REST v2 endpoints.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl Envelope {
    fn into_data(self) -> Result<Value, StoreError> {
        if self.code != 0 {
            return Err(StoreError::Backend {
                code: self.code,
                message: self.message.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(self.data.unwrap_or(Value::Null))
    }
}

fn check_dimensions(records: &[EmbeddedChunk], dimension: usize) -> Result<(), StoreError> {
    for record in records {
        if record.vector.len() != dimension {
            return Err(StoreError::DimensionMismatch {
                expected: dimension,
                actual: record.vector.len(),
            });
        }
    }
    Ok(())
}

fn create_collection_body(collection: &str, dimension: usize, metric: SimilarityMetric) -> Value {
    json!({
        "collectionName": collection,
        "schema": {
            "fields": [
                {
                    "fieldName": "id",
                    "dataType": "VarChar",
                    "isPrimary": true,
                    "elementTypeParams": { "max_length": "256" }
                },
                {
                    "fieldName": "text",
                    "dataType": "VarChar",
                    "elementTypeParams": { "max_length": "65535" }
                },
                {
                    "fieldName": "vector",
                    "dataType": "FloatVector",
                    "elementTypeParams": { "dim": dimension.to_string() }
                },
                {
                    "fieldName": "source",
                    "dataType": "VarChar",
                    "elementTypeParams": { "max_length": "512" }
                },
                {
                    "fieldName": "timestamp",
                    "dataType": "Int64"
                }
            ]
        },
        "indexParams": [
            {
                "fieldName": "vector",
                "indexName": "vector_index",
                "metricType": metric.as_str()
            }
        ]
    })
}

fn delete_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('"', "\\\"")))
        .collect();
    format!("id in [{}]", quoted.join(", "))
}

fn parse_hits(data: &Value) -> Result<Vec<SearchHit>, StoreError> {
    let rows = data
        .as_array()
        .ok_or_else(|| StoreError::Request("search response is not an array".to_string()))?;

    rows.iter()
        .map(|row| {
            let get_str = |field: &str| {
                row.get(field)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| StoreError::Request(format!("hit missing field {field}")))
            };
            Ok(SearchHit {
                id: get_str("id")?,
                text: get_str("text")?,
                source: get_str("source")?,
                timestamp: row.get("timestamp").and_then(Value::as_i64).unwrap_or(0),
                score: row
                    .get("distance")
                    .and_then(Value::as_f64)
                    .map(|d| d as f32)
                    .ok_or_else(|| StoreError::Request("hit missing distance".to_string()))?,
            })
        })
        .collect()
}

fn parse_row_count(data: &Value) -> u64 {
    match data.get("rowCount") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}
