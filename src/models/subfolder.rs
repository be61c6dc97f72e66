//! Represents a subfolder nested inside a folder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A subfolder. Its effective owner is the parent folder's owner.
///
/// Subfolder names are unique within their parent folder.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct SubFolder {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,

    /// ID of the parent folder.
    pub folder_id: i64,
}
