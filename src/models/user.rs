//! Represents a registered account — the root of every ownership chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user.
///
/// Users own folders; everything beneath a folder is transitively owned by
/// the folder's owner. The record is immutable after registration.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct User {
    /// Unique identifier (SQLite rowid).
    pub id: i64,

    /// Unique login handle, 3–20 alphanumeric characters.
    pub username: String,

    /// Unique contact address, also usable as a login identifier.
    pub email: String,

    /// bcrypt digest of the password. Never leaves the service as JSON.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Given name.
    pub name: String,

    /// Family name.
    pub surname: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
