//! Dataset Snapshot Store
//!
//! Holds the last successfully ingested dataset. States are `empty` and
//! `populated`; a new snapshot always replaces the previous one whole.

use crate::models::Dataset;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Where the dataset a caller is looking at came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetOrigin {
    /// Freshly ingested from the workbook
    Workbook,
    /// Last good snapshot, served after a failed reload
    Cached,
    /// Synthetic placeholder, nothing was ever ingested
    Fallback,
}

/// Immutable dataset plus the metadata of the run that produced it
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub id: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub origin: DatasetOrigin,
    /// SHA-256 of the workbook bytes
    pub checksum: Option<String>,
    pub dataset: Arc<Dataset>,
}

impl DatasetSnapshot {
    pub fn from_workbook(dataset: Dataset, bytes: &[u8]) -> Self {
        Self {
            id: Uuid::new_v4(),
            loaded_at: Utc::now(),
            origin: DatasetOrigin::Workbook,
            checksum: Some(checksum(bytes)),
            dataset: Arc::new(dataset),
        }
    }

    pub fn fallback(dataset: Dataset) -> Self {
        Self {
            id: Uuid::new_v4(),
            loaded_at: Utc::now(),
            origin: DatasetOrigin::Fallback,
            checksum: None,
            dataset: Arc::new(dataset),
        }
    }

    /// Same snapshot, re-labelled as served from cache
    pub fn as_cached(&self) -> Self {
        Self {
            origin: DatasetOrigin::Cached,
            ..self.clone()
        }
    }

    pub fn metadata(&self) -> SnapshotMetadata {
        SnapshotMetadata::from(self)
    }
}

/// Lightweight description of a snapshot, used by status endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub id: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub origin: DatasetOrigin,
    pub checksum: Option<String>,
    pub policy_count: usize,
    pub phase_count: usize,
    pub keyword_count: usize,
}

impl From<&DatasetSnapshot> for SnapshotMetadata {
    fn from(snapshot: &DatasetSnapshot) -> Self {
        Self {
            id: snapshot.id,
            loaded_at: snapshot.loaded_at,
            origin: snapshot.origin,
            checksum: snapshot.checksum.clone(),
            policy_count: snapshot.dataset.policies.len(),
            phase_count: snapshot.dataset.phases.len(),
            keyword_count: snapshot.dataset.keywords.len(),
        }
    }
}

/// Hex SHA-256 of the source bytes
pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Single-writer, multi-reader cache of the current snapshot
#[derive(Clone, Default)]
pub struct DatasetStore {
    current: Arc<RwLock<Option<Arc<DatasetSnapshot>>>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn snapshot(&self) -> Option<Arc<DatasetSnapshot>> {
        self.current.read().await.clone()
    }

    /// Cached dataset, or an empty one carrying the five static dimensions
    pub async fn get(&self) -> Arc<Dataset> {
        match self.snapshot().await {
            Some(snapshot) => Arc::clone(&snapshot.dataset),
            None => Arc::new(Dataset::empty()),
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .is_some_and(|snapshot| !snapshot.dataset.is_empty())
    }

    /// Swap in a new snapshot, returning the one it replaced
    pub async fn replace(&self, snapshot: Arc<DatasetSnapshot>) -> Option<Arc<DatasetSnapshot>> {
        let mut current = self.current.write().await;
        tracing::info!(
            "Stored dataset snapshot {}: {} policies",
            snapshot.id,
            snapshot.dataset.policies.len()
        );
        current.replace(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fallback_dataset;
    use crate::ingest::experts::ExpertMapper;
    use crate::ingest::patterns::KeywordTable;

    fn sample() -> Dataset {
        fallback_dataset(&KeywordTable::default(), &ExpertMapper::default())
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = DatasetStore::new();
        assert!(!store.is_loaded().await);
        assert!(store.snapshot().await.is_none());

        let dataset = store.get().await;
        assert!(dataset.policies.is_empty());
        assert_eq!(dataset.dimensions.len(), 5);
    }

    #[tokio::test]
    async fn test_replace_swaps_whole_snapshot() {
        let store = DatasetStore::new();
        let first = Arc::new(DatasetSnapshot::from_workbook(sample(), b"one"));
        let second = Arc::new(DatasetSnapshot::from_workbook(sample(), b"two"));

        assert!(store.replace(Arc::clone(&first)).await.is_none());
        assert!(store.is_loaded().await);

        let previous = store.replace(Arc::clone(&second)).await.unwrap();
        assert_eq!(previous.id, first.id);
        assert_eq!(store.snapshot().await.unwrap().id, second.id);
    }

    #[tokio::test]
    async fn test_snapshot_with_no_policies_is_not_loaded() {
        let store = DatasetStore::new();
        store
            .replace(Arc::new(DatasetSnapshot::from_workbook(Dataset::empty(), b"")))
            .await;
        assert!(!store.is_loaded().await);
    }

    #[test]
    fn test_checksum_is_hex_sha256() {
        assert_eq!(
            checksum(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_as_cached_keeps_identity() {
        let snapshot = DatasetSnapshot::from_workbook(sample(), b"bytes");
        let cached = snapshot.as_cached();
        assert_eq!(cached.id, snapshot.id);
        assert_eq!(cached.checksum, snapshot.checksum);
        assert_eq!(cached.origin, DatasetOrigin::Cached);
        assert!(Arc::ptr_eq(&cached.dataset, &snapshot.dataset));
    }
}
