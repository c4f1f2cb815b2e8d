//! Dataset service
//!
//! Owns the store and runs ingestion. `reload()` never fails: a broken or
//! missing workbook degrades to the last good snapshot, then to the synthetic
//! dataset.

use crate::dataset::store::{DatasetSnapshot, DatasetStore};
use crate::error::IngestError;
use crate::ingest::{fallback_dataset, IngestPipeline, WorkbookFetcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct DatasetService {
    fetcher: WorkbookFetcher,
    pipeline: IngestPipeline,
    store: DatasetStore,
    fallback: Arc<DatasetSnapshot>,
}

impl DatasetService {
    pub fn new(fetcher: WorkbookFetcher, pipeline: IngestPipeline) -> Self {
        let fallback = fallback_dataset(&pipeline.normalizer_config().keywords, pipeline.experts());
        Self {
            fetcher,
            pipeline,
            store: DatasetStore::new(),
            fallback: Arc::new(DatasetSnapshot::fallback(fallback)),
        }
    }

    /// Fetch, ingest and store the workbook.
    ///
    /// Concurrent calls are independent full runs; the last to finish wins.
    pub async fn reload(&self) -> Arc<DatasetSnapshot> {
        match self.ingest().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.store.replace(Arc::clone(&snapshot)).await;
                snapshot
            }
            Err(e) => {
                warn!("Reload of {} failed: {}", self.fetcher.source(), e);
                self.degraded().await
            }
        }
    }

    async fn ingest(&self) -> Result<DatasetSnapshot, IngestError> {
        let bytes = self.fetcher.fetch().await?;
        let dataset = self.pipeline.ingest(&bytes)?;
        Ok(DatasetSnapshot::from_workbook(dataset, &bytes))
    }

    async fn degraded(&self) -> Arc<DatasetSnapshot> {
        match self.store.snapshot().await {
            Some(cached) => {
                info!("Serving cached snapshot {}", cached.id);
                Arc::new(cached.as_cached())
            }
            None => {
                info!("No cached snapshot, serving the synthetic dataset");
                Arc::clone(&self.fallback)
            }
        }
    }

    /// Snapshot the presentation layer should render: the cached one, or the
    /// synthetic dataset when nothing has been ingested yet
    pub async fn current(&self) -> Arc<DatasetSnapshot> {
        match self.store.snapshot().await {
            Some(snapshot) => snapshot,
            None => Arc::clone(&self.fallback),
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.store.is_loaded().await
    }

    /// Reload every `every`, first run one interval from now
    pub fn spawn_refresh(&self, every: Duration) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let snapshot = service.reload().await;
                debug!(
                    "Periodic refresh done: snapshot {} ({:?})",
                    snapshot.id, snapshot.origin
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::store::DatasetOrigin;
    use crate::ingest::fixtures::{xlsx_bytes, SheetFixture};
    use crate::ingest::WorkbookSource;
    use std::path::Path;

    fn workbook_bytes() -> Vec<u8> {
        xlsx_bytes(&[
            SheetFixture::new(
                "Legislation and Policy",
                &[
                    ["Design", "Draft AI act", "Risk based rules", "", ""],
                    ["", "Consult citizens", "Public participation", "", ""],
                ],
            ),
            SheetFixture::new(
                "Research, Education",
                &[["Implementation", "AI curricula", "Teach ethics", "", ""]],
            ),
        ])
    }

    fn service_for(path: &Path) -> DatasetService {
        let fetcher = WorkbookFetcher::new(
            WorkbookSource::File(path.to_path_buf()),
            Duration::from_secs(5),
        );
        DatasetService::new(fetcher, IngestPipeline::default())
    }

    #[tokio::test]
    async fn test_reload_ingests_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tpaf.xlsx");
        std::fs::write(&path, workbook_bytes()).unwrap();

        let service = service_for(&path);
        assert!(!service.is_loaded().await);

        let snapshot = service.reload().await;
        assert_eq!(snapshot.origin, DatasetOrigin::Workbook);
        assert_eq!(snapshot.dataset.policies.len(), 3);
        assert!(snapshot.checksum.is_some());
        assert!(service.is_loaded().await);
        assert_eq!(service.current().await.id, snapshot.id);
    }

    #[tokio::test]
    async fn test_missing_workbook_falls_back_to_synthetic_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_for(&dir.path().join("missing.xlsx"));

        let snapshot = service.reload().await;
        assert_eq!(snapshot.origin, DatasetOrigin::Fallback);
        assert!(!snapshot.dataset.policies.is_empty());
        assert_eq!(snapshot.dataset.dimensions.len(), 5);
        assert!(!snapshot.dataset.phases.is_empty());
        assert!(!snapshot.dataset.keywords.is_empty());
        assert!(!service.is_loaded().await);
    }

    #[tokio::test]
    async fn test_broken_workbook_keeps_cached_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tpaf.xlsx");
        std::fs::write(&path, workbook_bytes()).unwrap();

        let service = service_for(&path);
        let good = service.reload().await;

        std::fs::write(&path, b"not a workbook").unwrap();
        let degraded = service.reload().await;
        assert_eq!(degraded.origin, DatasetOrigin::Cached);
        assert_eq!(degraded.id, good.id);
        assert_eq!(degraded.dataset, good.dataset);
        assert_eq!(service.current().await.id, good.id);
    }

    #[tokio::test]
    async fn test_concurrent_reloads_each_complete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tpaf.xlsx");
        std::fs::write(&path, workbook_bytes()).unwrap();

        let service = service_for(&path);
        let (a, b) = tokio::join!(service.reload(), service.reload());
        assert_ne!(a.id, b.id);
        assert_eq!(a.dataset, b.dataset);

        let current = service.current().await.id;
        assert!(current == a.id || current == b.id);
    }

    #[tokio::test]
    async fn test_periodic_refresh_picks_up_new_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tpaf.xlsx");
        let service = service_for(&path);
        service.reload().await;
        assert!(!service.is_loaded().await);

        let handle = service.spawn_refresh(Duration::from_millis(20));
        std::fs::write(&path, workbook_bytes()).unwrap();

        let loaded = tokio::time::timeout(Duration::from_secs(5), async {
            while !service.is_loaded().await {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        handle.abort();
        assert!(loaded.is_ok(), "refresh loop never loaded the workbook");
    }
}
