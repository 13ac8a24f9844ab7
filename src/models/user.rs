use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account identified by email, signed in through magic links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated caller attached to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}
