use chrono::{Duration, Utc};
use crate::errors::ScannerError;
use crate::models::{AuthUser, User};
use super::connection::{format_ts, parse_ts};
use super::Database;

impl Database {
    /// Fetch the user with this email, creating it on first sign-in.
    pub fn upsert_user(&self, email: &str) -> Result<User, ScannerError> {
        let email = email.trim().to_lowercase();
        let conn = self.lock()?;

        conn.execute(
            "INSERT OR IGNORE INTO users (id, email, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![uuid::Uuid::new_v4().to_string(), email, format_ts(&Utc::now())],
        ).map_err(|e| ScannerError::StoreUnavailable(format!("Failed to create user: {}", e)))?;

        let (id, email, created_at): (String, String, String) = conn.query_row(
            "SELECT id, email, created_at FROM users WHERE email = ?1",
            rusqlite::params![email],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        ).map_err(|e| ScannerError::StoreUnavailable(format!("Query error: {}", e)))?;

        Ok(User { id, email, created_at: parse_ts(&created_at)? })
    }

    pub fn create_login_token(&self, user_id: &str, ttl: Duration) -> Result<String, ScannerError> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO login_tokens (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![token, user_id, format_ts(&(Utc::now() + ttl))],
        ).map_err(|e| ScannerError::StoreUnavailable(format!("Failed to create login token: {}", e)))?;
        Ok(token)
    }

    /// Mark a login token used and return its owner. Expired or reused tokens yield `None`.
    pub fn consume_login_token(&self, token: &str) -> Result<Option<AuthUser>, ScannerError> {
        let now = format_ts(&Utc::now());
        let conn = self.lock()?;

        let affected = conn.execute(
            "UPDATE login_tokens SET used_at = ?2 WHERE token = ?1 AND used_at IS NULL AND expires_at > ?2",
            rusqlite::params![token, now],
        ).map_err(|e| ScannerError::StoreUnavailable(format!("Update failed: {}", e)))?;
        if affected == 0 {
            return Ok(None);
        }

        let user = conn.query_row(
            "SELECT u.id, u.email FROM login_tokens t JOIN users u ON u.id = t.user_id WHERE t.token = ?1",
            rusqlite::params![token],
            |row| Ok(AuthUser { id: row.get(0)?, email: row.get(1)? }),
        ).map_err(|e| ScannerError::StoreUnavailable(format!("Query error: {}", e)))?;
        Ok(Some(user))
    }

    pub fn create_session(&self, user_id: &str, ttl: Duration) -> Result<String, ScannerError> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![token, user_id, format_ts(&now), format_ts(&(now + ttl))],
        ).map_err(|e| ScannerError::StoreUnavailable(format!("Failed to create session: {}", e)))?;
        Ok(token)
    }

    pub fn get_session_user(&self, token: &str) -> Result<Option<AuthUser>, ScannerError> {
        let conn = self.lock()?;
        let result = conn.query_row(
            "SELECT u.id, u.email FROM sessions s JOIN users u ON u.id = s.user_id WHERE s.token = ?1 AND s.expires_at > ?2",
            rusqlite::params![token, format_ts(&Utc::now())],
            |row| Ok(AuthUser { id: row.get(0)?, email: row.get(1)? }),
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ScannerError::StoreUnavailable(format!("Query error: {}", e))),
        }
    }

    pub fn delete_session(&self, token: &str) -> Result<bool, ScannerError> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM sessions WHERE token = ?1", rusqlite::params![token])
            .map_err(|e| ScannerError::StoreUnavailable(format!("Delete failed: {}", e)))?;
        Ok(affected > 0)
    }
}
