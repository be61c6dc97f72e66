//! Represents a top-level folder owned directly by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A top-level folder.
///
/// Folder names are unique per owner, enforced by a UNIQUE constraint on
/// `(owner_id, name)`.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,

    /// ID of the owning user.
    pub owner_id: i64,
}
