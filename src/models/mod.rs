//! Core data models for the document management service.
//!
//! These entities form the ownership hierarchy User → Folder → SubFolder →
//! Document. They map cleanly to database tables via `sqlx::FromRow` and
//! serialize naturally as JSON via `serde`.

pub mod document;
pub mod folder;
pub mod subfolder;
pub mod user;
