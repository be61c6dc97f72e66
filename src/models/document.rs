//! Represents a document — a metadata record, not stored content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A document living inside a subfolder.
///
/// Documents carry name/format/summary metadata only; there is no payload.
/// The effective owner is reached through the subfolder's parent folder.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Document {
    pub id: i64,

    /// Display name, at most 50 characters.
    pub name: String,

    /// File format tag such as "pdf" or "txt", at most 10 characters.
    pub format: String,

    /// Short free-text summary, at most 200 characters.
    pub summary: String,

    /// Assigned server-side at insert time.
    pub created_at: DateTime<Utc>,

    /// ID of the containing subfolder. Changed only by the move operation.
    pub subfolder_id: i64,
}
