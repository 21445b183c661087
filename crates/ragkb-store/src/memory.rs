//! In-memory vector store.
//!
//! Brute-force exact similarity over a keyed map. Not an ANN index and not
//! meant for production volumes; it exists for tests, development builds
//! and offline runs, while honoring the full collection contract:
//! dimension enforcement, threshold filtering, metric-aware ordering,
//! upsert-by-id and clear.

use async_trait::async_trait;
use chrono::Utc;
use ragkb_core::{
    CollectionStats, EmbeddedChunk, SearchHit, SimilarityMetric, StoreError, VectorStore,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

struct StoredRecord {
    text: String,
    source: String,
    vector: Vec<f32>,
    timestamp: i64,
}

/// In-memory vector store.
pub struct MemoryStore {
    collection_name: String,
    dimension: usize,
    metric: SimilarityMetric,
    records: RwLock<HashMap<String, StoredRecord>>,
}

impl MemoryStore {
    /// Create an empty store with a fixed dimension and metric.
    #[must_use]
    pub fn new(
        collection_name: impl Into<String>,
        dimension: usize,
        metric: SimilarityMetric,
    ) -> Self {
        Self {
            collection_name: collection_name.into(),
            dimension,
            metric,
            records: RwLock::new(HashMap::new()),
        }
    }

    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.metric {
            SimilarityMetric::Cosine => cosine_similarity(a, b),
            SimilarityMetric::Ip => dot(a, b),
            SimilarityMetric::L2 => l2_distance(a, b),
        }
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), StoreError> {
        if vector.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn insert(&self, records: &[EmbeddedChunk]) -> Result<(), StoreError> {
        for record in records {
            self.check_dimension(&record.vector)?;
        }

        let timestamp = Utc::now().timestamp();
        let mut map = self.records.write().await;
        for record in records {
            map.insert(
                record.id.clone(),
                StoredRecord {
                    text: record.text.clone(),
                    source: record.source.clone(),
                    vector: record.vector.clone(),
                    timestamp,
                },
            );
        }
        debug!("inserted {} records", records.len());
        Ok(())
    }

    async fn search(
        &self,
        query: &[f32],
        top_k: usize,
        score_threshold: f32,
    ) -> Result<Vec<SearchHit>, StoreError> {
        self.check_dimension(query)?;

        let map = self.records.read().await;
        let mut scored: Vec<(f32, &String, &StoredRecord)> = map
            .iter()
            .map(|(id, record)| (self.score(query, &record.vector), id, record))
            .collect();

        if self.metric.higher_is_better() {
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        } else {
            scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        }

        let hits = scored
            .into_iter()
            .take(top_k)
            .filter(|(score, _, _)| self.metric.passes_threshold(*score, score_threshold))
            .map(|(score, id, record)| SearchHit {
                id: id.clone(),
                text: record.text.clone(),
                source: record.source.clone(),
                timestamp: record.timestamp,
                score,
            })
            .collect();

        Ok(hits)
    }

    async fn delete(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut map = self.records.write().await;
        for id in ids {
            map.remove(id);
        }
        debug!("deleted {} ids", ids.len());
        Ok(())
    }

    async fn stats(&self) -> Result<CollectionStats, StoreError> {
        let map = self.records.read().await;
        Ok(CollectionStats {
            collection_name: self.collection_name.clone(),
            num_entities: map.len() as u64,
            metric_type: self.metric,
            dimension: self.dimension,
        })
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut map = self.records.write().await;
        map.clear();
        debug!("collection {} cleared", self.collection_name);
        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product = dot(a, b);
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot_product / (norm_a * norm_b)
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, vector: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            id: id.to_string(),
            text: format!("text for {id}"),
            source: "/docs/test.txt".to_string(),
            vector,
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new("test_collection", 3, SimilarityMetric::Cosine)
    }

    #[tokio::test]
    async fn insert_and_stats() {
        let store = store();
        store
            .insert(&[
                record("a", vec![1.0, 0.0, 0.0]),
                record("b", vec![0.0, 1.0, 0.0]),
            ])
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.num_entities, 2);
        assert_eq!(stats.dimension, 3);
        assert_eq!(stats.metric_type, SimilarityMetric::Cosine);
        assert_eq!(stats.collection_name, "test_collection");
    }

    #[tokio::test]
    async fn insert_rejects_wrong_dimension() {
        let store = store();
        let err = store
            .insert(&[record("a", vec![1.0, 0.0])])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));

        // The batch is rejected wholesale.
        assert_eq!(store.stats().await.unwrap().num_entities, 0);
    }

    #[tokio::test]
    async fn search_rejects_wrong_dimension() {
        let store = store();
        let err = store.search(&[1.0, 0.0], 5, 0.0).await.unwrap_err();
        assert!(matches!(err, StoreError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn insert_same_id_is_upsert() {
        let store = store();
        store
            .insert(&[record("a", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap();
        store
            .insert(&[record("a", vec![0.0, 1.0, 0.0])])
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.num_entities, 1);

        let hits = store.search(&[0.0, 1.0, 0.0], 1, 0.9).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
    }

    #[tokio::test]
    async fn search_orders_best_first_and_respects_top_k() {
        let store = store();
        store
            .insert(&[
                record("x", vec![1.0, 0.0, 0.0]),
                record("y", vec![0.7, 0.7, 0.0]),
                record("z", vec![0.0, 0.0, 1.0]),
            ])
            .await
            .unwrap();

        let hits = store.search(&[1.0, 0.0, 0.0], 2, -1.0).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "x");
        assert!((hits[0].score - 1.0).abs() < 1e-5);
        assert_eq!(hits[1].id, "y");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn search_filters_below_threshold() {
        let store = store();
        store
            .insert(&[
                record("near", vec![1.0, 0.0, 0.0]),
                record("far", vec![0.0, 1.0, 0.0]),
            ])
            .await
            .unwrap();

        let hits = store.search(&[1.0, 0.0, 0.0], 10, 0.7).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "near");
        assert!(hits.iter().all(|h| h.score >= 0.7));
    }

    #[tokio::test]
    async fn l2_metric_inverts_ordering_and_threshold() {
        let store = MemoryStore::new("l2_collection", 3, SimilarityMetric::L2);
        store
            .insert(&[
                record("near", vec![1.0, 0.0, 0.0]),
                record("far", vec![0.0, 3.0, 0.0]),
            ])
            .await
            .unwrap();

        // Distance: smaller is better; threshold keeps hits at or below it.
        let hits = store.search(&[1.0, 0.0, 0.0], 10, 1.0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "near");
        assert!(hits[0].score <= 1.0);

        let all = store.search(&[1.0, 0.0, 0.0], 10, 100.0).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "near");
        assert!(all[0].score <= all[1].score);
    }

    #[tokio::test]
    async fn delete_removes_by_id() {
        let store = store();
        store
            .insert(&[
                record("keep", vec![1.0, 0.0, 0.0]),
                record("drop", vec![0.0, 1.0, 0.0]),
            ])
            .await
            .unwrap();

        store.delete(&["drop".to_string()]).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.num_entities, 1);

        let hits = store.search(&[0.0, 1.0, 0.0], 10, -1.0).await.unwrap();
        assert!(hits.iter().all(|h| h.id != "drop"));
    }

    #[tokio::test]
    async fn delete_unknown_id_is_noop() {
        let store = store();
        store
            .insert(&[record("a", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap();
        store.delete(&["ghost".to_string()]).await.unwrap();
        assert_eq!(store.stats().await.unwrap().num_entities, 1);
    }

    #[tokio::test]
    async fn clear_empties_the_collection() {
        let store = store();
        store
            .insert(&[
                record("a", vec![1.0, 0.0, 0.0]),
                record("b", vec![0.0, 1.0, 0.0]),
            ])
            .await
            .unwrap();

        store.clear().await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.num_entities, 0);
        assert_eq!(stats.dimension, 3);
    }

    #[tokio::test]
    async fn timestamps_are_stamped_at_insert() {
        let store = store();
        let before = Utc::now().timestamp();
        store
            .insert(&[record("a", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap();
        let after = Utc::now().timestamp();

        let hits = store.search(&[1.0, 0.0, 0.0], 1, 0.0).await.unwrap();
        assert!(hits[0].timestamp >= before && hits[0].timestamp <= after);
    }

    #[tokio::test]
    async fn health_check_answers() {
        let store = store();
        assert!(store.health_check().await);
    }

    #[test]
    fn cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn l2_distance_basics() {
        assert_eq!(l2_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(l2_distance(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }
}
