use chrono::{DateTime, Utc};
use crate::errors::ScannerError;
use crate::models::{ScanRecord, ScanStatus, ScanUpdate, SortOrder, Violation};
use super::connection::{format_ts, parse_ts};
use super::Database;

const SCAN_COLUMNS: &str = "id, url, status, score, violations_json, user_id, created_at, completed_at";

/// Raw column values of a `scans` row before decoding.
struct ScanRow {
    id: String,
    url: String,
    status: String,
    score: Option<i64>,
    violations_json: Option<String>,
    user_id: Option<String>,
    created_at: String,
    completed_at: Option<String>,
}

impl ScanRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            url: row.get(1)?,
            status: row.get(2)?,
            score: row.get(3)?,
            violations_json: row.get(4)?,
            user_id: row.get(5)?,
            created_at: row.get(6)?,
            completed_at: row.get(7)?,
        })
    }

    fn into_record(self) -> Result<ScanRecord, ScannerError> {
        let status = ScanStatus::parse(&self.status).ok_or_else(|| {
            ScannerError::StoreUnavailable(format!("Unknown scan status '{}' for {}", self.status, self.id))
        })?;

        // Results are only meaningful on completed scans
        let (score, violations) = if status == ScanStatus::Completed {
            let violations: Vec<Violation> = match &self.violations_json {
                Some(raw) => serde_json::from_str(raw).map_err(|e| {
                    ScannerError::StoreUnavailable(format!("Corrupt violations for {}: {}", self.id, e))
                })?,
                None => Vec::new(),
            };
            let score = self.score.map(|s| s.clamp(0, 100) as u8).unwrap_or(0);
            (Some(score), Some(violations))
        } else {
            (None, None)
        };

        Ok(ScanRecord {
            id: self.id,
            url: self.url,
            status,
            score,
            violations,
            created_at: parse_ts(&self.created_at)?,
            completed_at: self.completed_at.as_deref().map(parse_ts).transpose()?,
            user_id: self.user_id,
        })
    }
}

impl Database {
    pub fn create_scan(&self, url: &str, user_id: Option<&str>) -> Result<ScanRecord, ScannerError> {
        let record = ScanRecord {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.to_string(),
            status: ScanStatus::Pending,
            score: None,
            violations: None,
            created_at: Utc::now(),
            completed_at: None,
            user_id: user_id.map(str::to_string),
        };

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO scans (id, url, status, user_id, created_at) VALUES (?1, ?2, 'pending', ?3, ?4)",
            rusqlite::params![record.id, record.url, record.user_id, format_ts(&record.created_at)],
        ).map_err(|e| ScannerError::StoreUnavailable(format!("Failed to create scan: {}", e)))?;

        Ok(record)
    }

    /// Apply the terminal transition. Returns `false` when the scan is missing or already terminal.
    pub fn finish_scan(&self, id: &str, update: &ScanUpdate) -> Result<bool, ScannerError> {
        let now = format_ts(&Utc::now());
        let conn = self.lock()?;
        let affected = match update {
            ScanUpdate::Completed { score, violations } => {
                let violations_json = serde_json::to_string(violations)?;
                conn.execute(
                    "UPDATE scans SET status = 'completed', score = ?2, violations_json = ?3, completed_at = ?4 WHERE id = ?1 AND status = 'pending'",
                    rusqlite::params![id, *score as i64, violations_json, now],
                )
            }
            ScanUpdate::Failed => {
                conn.execute(
                    "UPDATE scans SET status = 'failed', score = NULL, violations_json = NULL, completed_at = ?2 WHERE id = ?1 AND status = 'pending'",
                    rusqlite::params![id, now],
                )
            }
        }.map_err(|e| ScannerError::StoreUnavailable(format!("Update failed: {}", e)))?;

        Ok(affected > 0)
    }

    pub fn get_scan(&self, id: &str) -> Result<Option<ScanRecord>, ScannerError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM scans WHERE id = ?1", SCAN_COLUMNS))
            .map_err(|e| ScannerError::StoreUnavailable(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![id], ScanRow::from_row) {
            Ok(row) => Ok(Some(row.into_record()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ScannerError::StoreUnavailable(format!("Query error: {}", e))),
        }
    }

    pub fn get_latest_scan_by_url(&self, url: &str) -> Result<Option<ScanRecord>, ScannerError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM scans WHERE url = ?1 ORDER BY created_at DESC, rowid DESC LIMIT 1",
            SCAN_COLUMNS
        )).map_err(|e| ScannerError::StoreUnavailable(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![url], ScanRow::from_row) {
            Ok(row) => Ok(Some(row.into_record()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ScannerError::StoreUnavailable(format!("Query error: {}", e))),
        }
    }

    pub fn list_scans_by_user(
        &self,
        user_id: &str,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<ScanRecord>, ScannerError> {
        let direction = match order {
            SortOrder::NewestFirst => "DESC",
            SortOrder::OldestFirst => "ASC",
        };
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM scans WHERE user_id = ?1 ORDER BY created_at {dir}, rowid {dir} LIMIT ?2",
            SCAN_COLUMNS,
            dir = direction
        )).map_err(|e| ScannerError::StoreUnavailable(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map(rusqlite::params![user_id, limit as i64], ScanRow::from_row)
            .map_err(|e| ScannerError::StoreUnavailable(format!("Query error: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            let row = row.map_err(|e| ScannerError::StoreUnavailable(format!("Row error: {}", e)))?;
            results.push(row.into_record()?);
        }
        Ok(results)
    }

    pub fn count_scans_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<u64, ScannerError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM scans WHERE user_id = ?1 AND created_at >= ?2",
            rusqlite::params![user_id, format_ts(&since)],
            |row| row.get(0),
        ).map_err(|e| ScannerError::StoreUnavailable(format!("Count failed: {}", e)))?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Impact;

    fn violation(id: &str, impact: Impact) -> Violation {
        Violation {
            id: id.to_string(),
            impact,
            description: format!("{} title", id),
            help: format!("{} help", id),
            nodes: vec![],
        }
    }

    #[test]
    fn test_db_create_and_get_scan() {
        let db = Database::in_memory().unwrap();
        let created = db.create_scan("https://example.com/", Some("user-1")).unwrap();

        let scan = db.get_scan(&created.id).unwrap().unwrap();
        assert_eq!(scan.url, "https://example.com/");
        assert_eq!(scan.status, ScanStatus::Pending);
        assert_eq!(scan.user_id.as_deref(), Some("user-1"));
        assert!(scan.score.is_none());
        assert!(scan.violations.is_none());
        assert!(scan.completed_at.is_none());
    }

    #[test]
    fn test_db_get_nonexistent_scan() {
        let db = Database::in_memory().unwrap();
        assert!(db.get_scan("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_db_finish_completed_keeps_order() {
        let db = Database::in_memory().unwrap();
        let created = db.create_scan("https://example.com/", None).unwrap();
        let update = ScanUpdate::completed(75, vec![
            violation("b-rule", Impact::Serious),
            violation("a-rule", Impact::Moderate),
        ]);

        assert!(db.finish_scan(&created.id, &update).unwrap());

        let scan = db.get_scan(&created.id).unwrap().unwrap();
        assert_eq!(scan.status, ScanStatus::Completed);
        assert_eq!(scan.score, Some(75));
        let violations = scan.violations.unwrap();
        assert_eq!(violations[0].id, "b-rule");
        assert_eq!(violations[1].impact, Impact::Moderate);
        assert!(scan.completed_at.is_some());
    }

    #[test]
    fn test_db_finish_failed_sets_no_results() {
        let db = Database::in_memory().unwrap();
        let created = db.create_scan("https://example.com/", None).unwrap();

        assert!(db.finish_scan(&created.id, &ScanUpdate::Failed).unwrap());

        let scan = db.get_scan(&created.id).unwrap().unwrap();
        assert_eq!(scan.status, ScanStatus::Failed);
        assert!(scan.score.is_none());
        assert!(scan.violations.is_none());
    }

    #[test]
    fn test_db_terminal_status_is_never_rewritten() {
        let db = Database::in_memory().unwrap();
        let created = db.create_scan("https://example.com/", None).unwrap();

        assert!(db.finish_scan(&created.id, &ScanUpdate::Failed).unwrap());
        assert!(!db.finish_scan(&created.id, &ScanUpdate::completed(90, vec![])).unwrap());
        assert!(!db.finish_scan(&created.id, &ScanUpdate::Failed).unwrap());

        let scan = db.get_scan(&created.id).unwrap().unwrap();
        assert_eq!(scan.status, ScanStatus::Failed);
        assert!(scan.score.is_none());
    }

    #[test]
    fn test_db_finish_unknown_scan() {
        let db = Database::in_memory().unwrap();
        assert!(!db.finish_scan("missing", &ScanUpdate::Failed).unwrap());
    }

    #[test]
    fn test_db_latest_by_url() {
        let db = Database::in_memory().unwrap();
        let first = db.create_scan("https://example.com/", None).unwrap();
        let second = db.create_scan("https://example.com/", None).unwrap();
        db.create_scan("https://other.example/", None).unwrap();

        let latest = db.get_latest_scan_by_url("https://example.com/").unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_ne!(latest.id, first.id);

        assert!(db.get_latest_scan_by_url("https://missing.example/").unwrap().is_none());
    }

    #[test]
    fn test_db_list_by_user_order_and_limit() {
        let db = Database::in_memory().unwrap();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(db.create_scan(&format!("https://site-{}.example/", i), Some("u1")).unwrap().id);
        }
        db.create_scan("https://someone-else.example/", Some("u2")).unwrap();

        let newest = db.list_scans_by_user("u1", 3, SortOrder::NewestFirst).unwrap();
        assert_eq!(newest.len(), 3);
        assert_eq!(newest[0].id, ids[4]);
        assert_eq!(newest[2].id, ids[2]);

        let oldest = db.list_scans_by_user("u1", 10, SortOrder::OldestFirst).unwrap();
        assert_eq!(oldest.len(), 5);
        assert_eq!(oldest[0].id, ids[0]);
    }

    #[test]
    fn test_db_count_since() {
        let db = Database::in_memory().unwrap();
        let before = Utc::now() - chrono::Duration::seconds(1);
        db.create_scan("https://a.example/", Some("u1")).unwrap();
        db.create_scan("https://b.example/", Some("u1")).unwrap();
        db.create_scan("https://c.example/", None).unwrap();

        assert_eq!(db.count_scans_since("u1", before).unwrap(), 2);
        assert_eq!(db.count_scans_since("u1", Utc::now() + chrono::Duration::hours(1)).unwrap(), 0);
        assert_eq!(db.count_scans_since("nobody", before).unwrap(), 0);
    }
}
