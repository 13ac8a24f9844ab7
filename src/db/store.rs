use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::errors::ScannerError;
use crate::models::{ScanRecord, ScanUpdate, SortOrder};
use super::Database;

/// Persistence consumed by the scan orchestrator and the presentation layer.
///
/// Every operation is fallible I/O; implementations report failures as
/// [`ScannerError::StoreUnavailable`]. No atomicity across `create` and `update`
/// is assumed by callers.
#[async_trait]
pub trait ScanStore: Send + Sync {
    /// Insert a new `pending` scan.
    async fn create(&self, url: &str, user_id: Option<&str>) -> Result<ScanRecord, ScannerError>;

    /// Move a pending scan to its terminal state. `false` means nothing was pending.
    async fn update(&self, id: &str, update: ScanUpdate) -> Result<bool, ScannerError>;

    async fn get(&self, id: &str) -> Result<Option<ScanRecord>, ScannerError>;

    async fn get_latest_by_url(&self, url: &str) -> Result<Option<ScanRecord>, ScannerError>;

    async fn list_by_user(
        &self,
        user_id: &str,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<ScanRecord>, ScannerError>;

    async fn count_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<u64, ScannerError>;
}

#[async_trait]
impl ScanStore for Database {
    async fn create(&self, url: &str, user_id: Option<&str>) -> Result<ScanRecord, ScannerError> {
        self.create_scan(url, user_id)
    }

    async fn update(&self, id: &str, update: ScanUpdate) -> Result<bool, ScannerError> {
        self.finish_scan(id, &update)
    }

    async fn get(&self, id: &str) -> Result<Option<ScanRecord>, ScannerError> {
        self.get_scan(id)
    }

    async fn get_latest_by_url(&self, url: &str) -> Result<Option<ScanRecord>, ScannerError> {
        self.get_latest_scan_by_url(url)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<ScanRecord>, ScannerError> {
        self.list_scans_by_user(user_id, limit, order)
    }

    async fn count_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<u64, ScannerError> {
        self.count_scans_since(user_id, since)
    }
}
