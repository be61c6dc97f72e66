//! DirectoryService — the folder/subfolder/document hierarchy and the
//! ownership checks guarding it.
//!
//! Ownership is transitive: a subfolder belongs to its folder's owner and
//! a document to its subfolder's folder's owner. Every check is a single
//! joined EXISTS query so there is no window between "look up parent" and
//! "check owner". Duplicate names are settled by the UNIQUE constraints;
//! a violation surfaces as `Conflict` rather than trusting a pre-check.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::models::{document::Document, folder::Folder, subfolder::SubFolder};
use crate::services::{ServiceError, ServiceResult, is_unique_violation};
use crate::validation;

/// A folder together with its subfolders, as rendered on the home view.
/// Folders without subfolders carry an empty list, never disappear.
#[derive(Debug, Clone, Serialize)]
pub struct FolderTree {
    #[serde(flatten)]
    pub folder: Folder,
    pub subfolders: Vec<SubFolder>,
}

#[derive(Clone)]
pub struct DirectoryService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl DirectoryService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    // --- Ownership verification ---------------------------------------

    /// True iff a folder with this id exists and belongs to the user.
    pub async fn user_owns_folder(&self, user_id: i64, folder_id: i64) -> ServiceResult<bool> {
        let owns = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM folder WHERE id = ? AND owner_id = ?)",
        )
        .bind(folder_id)
        .bind(user_id)
        .fetch_one(&*self.db)
        .await?;
        Ok(owns)
    }

    /// True iff a subfolder with this id exists and its parent folder
    /// belongs to the user.
    pub async fn user_owns_subfolder(
        &self,
        user_id: i64,
        subfolder_id: i64,
    ) -> ServiceResult<bool> {
        let owns = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                 SELECT 1 FROM subfolder s
                 JOIN folder f ON s.folder_id = f.id
                 WHERE s.id = ? AND f.owner_id = ?)",
        )
        .bind(subfolder_id)
        .bind(user_id)
        .fetch_one(&*self.db)
        .await?;
        Ok(owns)
    }

    /// True iff a document with this id exists and the two-hop chain
    /// document → subfolder → folder ends at the user.
    pub async fn user_owns_document(&self, user_id: i64, document_id: i64) -> ServiceResult<bool> {
        let owns = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                 SELECT 1 FROM document d
                 JOIN subfolder s ON d.subfolder_id = s.id
                 JOIN folder f ON s.folder_id = f.id
                 WHERE d.id = ? AND f.owner_id = ?)",
        )
        .bind(document_id)
        .bind(user_id)
        .fetch_one(&*self.db)
        .await?;
        Ok(owns)
    }

    // --- Create operations ---------------------------------------------

    /// Create a top-level folder for the user.
    ///
    /// Duplicate (owner, name) pairs are a `Conflict`, distinct from a
    /// name that fails validation outright.
    pub async fn create_folder(&self, user_id: i64, name: &str) -> ServiceResult<Folder> {
        let name = name.trim();
        if !validation::is_valid_folder_name(name) {
            return Err(ServiceError::Validation("folder name"));
        }

        let insert_result = sqlx::query_as::<_, Folder>(
            "INSERT INTO folder (name, created_at, owner_id) VALUES (?, ?, ?)
             RETURNING id, name, created_at, owner_id",
        )
        .bind(name)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_one(&*self.db)
        .await;

        match insert_result {
            Ok(folder) => {
                debug!(user_id, folder_id = folder.id, "created folder {}", folder.name);
                Ok(folder)
            }
            Err(err) if is_unique_violation(&err) => Err(ServiceError::Conflict {
                entity: "folder",
                field: "name",
            }),
            Err(err) => Err(ServiceError::Sqlx(err)),
        }
    }

    /// Create a subfolder inside a folder the user owns.
    pub async fn create_subfolder(
        &self,
        user_id: i64,
        folder_id: i64,
        name: &str,
    ) -> ServiceResult<SubFolder> {
        if !self.user_owns_folder(user_id, folder_id).await? {
            return Err(ServiceError::NotFound("folder"));
        }
        let name = name.trim();
        if !validation::is_valid_subfolder_name(name) {
            return Err(ServiceError::Validation("subfolder name"));
        }

        let insert_result = sqlx::query_as::<_, SubFolder>(
            "INSERT INTO subfolder (name, created_at, folder_id) VALUES (?, ?, ?)
             RETURNING id, name, created_at, folder_id",
        )
        .bind(name)
        .bind(Utc::now())
        .bind(folder_id)
        .fetch_one(&*self.db)
        .await;

        match insert_result {
            Ok(subfolder) => Ok(subfolder),
            Err(err) if is_unique_violation(&err) => Err(ServiceError::Conflict {
                entity: "subfolder",
                field: "name",
            }),
            Err(err) => Err(ServiceError::Sqlx(err)),
        }
    }

    /// Create a document inside a subfolder the user owns. The creation
    /// date is assigned here, never taken from the caller.
    pub async fn create_document(
        &self,
        user_id: i64,
        subfolder_id: i64,
        name: &str,
        format: &str,
        summary: &str,
    ) -> ServiceResult<Document> {
        if !self.user_owns_subfolder(user_id, subfolder_id).await? {
            return Err(ServiceError::NotFound("subfolder"));
        }
        let name = name.trim();
        let format = format.trim();
        let summary = summary.trim();
        if !validation::is_valid_document_name(name) {
            return Err(ServiceError::Validation("document name"));
        }
        if !validation::is_valid_format(format) {
            return Err(ServiceError::Validation("format"));
        }
        if !validation::is_valid_summary(summary) {
            return Err(ServiceError::Validation("summary"));
        }

        let document = sqlx::query_as::<_, Document>(
            "INSERT INTO document (name, format, summary, created_at, subfolder_id)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, name, format, summary, created_at, subfolder_id",
        )
        .bind(name)
        .bind(format)
        .bind(summary)
        .bind(Utc::now())
        .bind(subfolder_id)
        .fetch_one(&*self.db)
        .await?;

        Ok(document)
    }

    // --- Move ----------------------------------------------------------

    /// Reparent a document into another subfolder.
    ///
    /// The user must own both the document (through its current chain)
    /// and the destination subfolder. Either check failing yields the
    /// same `NotFound`, so a foreign destination is indistinguishable
    /// from a nonexistent one.
    pub async fn move_document(
        &self,
        user_id: i64,
        document_id: i64,
        target_subfolder_id: i64,
    ) -> ServiceResult<()> {
        if !self.user_owns_document(user_id, document_id).await? {
            return Err(ServiceError::NotFound("document"));
        }
        if !self.user_owns_subfolder(user_id, target_subfolder_id).await? {
            return Err(ServiceError::NotFound("subfolder"));
        }

        let result = sqlx::query("UPDATE document SET subfolder_id = ? WHERE id = ?")
            .bind(target_subfolder_id)
            .bind(document_id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("document"));
        }
        debug!(user_id, document_id, target_subfolder_id, "moved document");
        Ok(())
    }

    // --- Read operations ------------------------------------------------

    /// All folders of the user with their subfolders, in stable id order.
    pub async fn home_tree(&self, user_id: i64) -> ServiceResult<Vec<FolderTree>> {
        let folders = sqlx::query_as::<_, Folder>(
            "SELECT id, name, created_at, owner_id FROM folder
             WHERE owner_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;

        let subfolders = sqlx::query_as::<_, SubFolder>(
            "SELECT s.id, s.name, s.created_at, s.folder_id FROM subfolder s
             JOIN folder f ON s.folder_id = f.id
             WHERE f.owner_id = ? ORDER BY s.id",
        )
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;

        let mut children: HashMap<i64, Vec<SubFolder>> = HashMap::new();
        for subfolder in subfolders {
            children.entry(subfolder.folder_id).or_default().push(subfolder);
        }

        Ok(folders
            .into_iter()
            .map(|folder| {
                let subfolders = children.remove(&folder.id).unwrap_or_default();
                FolderTree { folder, subfolders }
            })
            .collect())
    }

    /// Documents in a subfolder the user owns, in stable id order.
    pub async fn documents_in_subfolder(
        &self,
        user_id: i64,
        subfolder_id: i64,
    ) -> ServiceResult<Vec<Document>> {
        if !self.user_owns_subfolder(user_id, subfolder_id).await? {
            return Err(ServiceError::NotFound("subfolder"));
        }

        let documents = sqlx::query_as::<_, Document>(
            "SELECT id, name, format, summary, created_at, subfolder_id
             FROM document WHERE subfolder_id = ? ORDER BY id",
        )
        .bind(subfolder_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(documents)
    }

    /// Full metadata of a single document the user owns.
    pub async fn document_details(
        &self,
        user_id: i64,
        document_id: i64,
    ) -> ServiceResult<Document> {
        if !self.user_owns_document(user_id, document_id).await? {
            return Err(ServiceError::NotFound("document"));
        }
        self.fetch_document(document_id).await
    }

    async fn fetch_document(&self, document_id: i64) -> ServiceResult<Document> {
        sqlx::query_as::<_, Document>(
            "SELECT id, name, format, summary, created_at, subfolder_id
             FROM document WHERE id = ?",
        )
        .bind(document_id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => ServiceError::NotFound("document"),
            other => ServiceError::Sqlx(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::account_service::{AccountService, Registration};
    use crate::services::test_support::memory_pool;

    struct Fixture {
        accounts: AccountService,
        directory: DirectoryService,
    }

    async fn fixture() -> Fixture {
        let db = memory_pool().await;
        Fixture {
            accounts: AccountService::new(db.clone(), false),
            directory: DirectoryService::new(db),
        }
    }

    async fn register(accounts: &AccountService, username: &str, email: &str) -> i64 {
        accounts
            .register(Registration {
                username,
                email,
                password: "secret12",
                confirm_password: "secret12",
                name: "Test",
                surname: "User",
            })
            .await
            .expect("register")
            .id
    }

    #[tokio::test]
    async fn duplicate_folder_name_per_owner_conflicts() {
        let fx = fixture().await;
        let user1 = register(&fx.accounts, "user1", "user1@x.com").await;
        let user2 = register(&fx.accounts, "user2", "user2@x.com").await;

        fx.directory.create_folder(user1, "Invoices").await.expect("create");
        let duplicate = fx.directory.create_folder(user1, "Invoices").await;
        assert!(matches!(
            duplicate,
            Err(ServiceError::Conflict {
                entity: "folder",
                field: "name"
            })
        ));

        // Same name under a different owner is fine.
        fx.directory
            .create_folder(user2, "Invoices")
            .await
            .expect("other owner may reuse the name");
    }

    #[tokio::test]
    async fn duplicate_subfolder_name_within_folder_conflicts() {
        let fx = fixture().await;
        let user = register(&fx.accounts, "user1", "user1@x.com").await;
        let folder = fx.directory.create_folder(user, "Work").await.expect("folder");

        fx.directory
            .create_subfolder(user, folder.id, "2024")
            .await
            .expect("subfolder");
        let duplicate = fx.directory.create_subfolder(user, folder.id, "2024").await;
        assert!(matches!(
            duplicate,
            Err(ServiceError::Conflict {
                entity: "subfolder",
                field: "name"
            })
        ));

        // Same name in a sibling folder is fine.
        let other = fx.directory.create_folder(user, "Personal").await.expect("folder");
        fx.directory
            .create_subfolder(user, other.id, "2024")
            .await
            .expect("sibling folder may reuse the name");
    }

    #[tokio::test]
    async fn ownership_follows_the_full_chain() {
        let fx = fixture().await;
        let owner = register(&fx.accounts, "owner", "owner@x.com").await;
        let intruder = register(&fx.accounts, "intruder", "intruder@x.com").await;

        let folder = fx.directory.create_folder(owner, "Work").await.expect("folder");
        let subfolder = fx
            .directory
            .create_subfolder(owner, folder.id, "2024")
            .await
            .expect("subfolder");
        let document = fx
            .directory
            .create_document(owner, subfolder.id, "report", "pdf", "Q1 report")
            .await
            .expect("document");

        assert!(fx.directory.user_owns_folder(owner, folder.id).await.unwrap());
        assert!(fx.directory.user_owns_subfolder(owner, subfolder.id).await.unwrap());
        assert!(fx.directory.user_owns_document(owner, document.id).await.unwrap());

        assert!(!fx.directory.user_owns_folder(intruder, folder.id).await.unwrap());
        assert!(!fx.directory.user_owns_subfolder(intruder, subfolder.id).await.unwrap());
        assert!(!fx.directory.user_owns_document(intruder, document.id).await.unwrap());

        // Nonexistent ids are just as unowned.
        assert!(!fx.directory.user_owns_document(owner, 9999).await.unwrap());
    }

    #[tokio::test]
    async fn unowned_parents_look_nonexistent() {
        let fx = fixture().await;
        let owner = register(&fx.accounts, "owner", "owner@x.com").await;
        let intruder = register(&fx.accounts, "intruder", "intruder@x.com").await;

        let folder = fx.directory.create_folder(owner, "Work").await.expect("folder");
        let subfolder = fx
            .directory
            .create_subfolder(owner, folder.id, "2024")
            .await
            .expect("subfolder");
        let document = fx
            .directory
            .create_document(owner, subfolder.id, "report", "pdf", "Q1 report")
            .await
            .expect("document");

        let foreign_subfolder = fx.directory.create_subfolder(intruder, folder.id, "x").await;
        assert!(matches!(
            foreign_subfolder,
            Err(ServiceError::NotFound("folder"))
        ));

        let foreign_document = fx
            .directory
            .create_document(intruder, subfolder.id, "spy", "txt", "nope")
            .await;
        assert!(matches!(
            foreign_document,
            Err(ServiceError::NotFound("subfolder"))
        ));

        let foreign_listing = fx.directory.documents_in_subfolder(intruder, subfolder.id).await;
        assert!(matches!(
            foreign_listing,
            Err(ServiceError::NotFound("subfolder"))
        ));

        let foreign_details = fx.directory.document_details(intruder, document.id).await;
        assert!(matches!(
            foreign_details,
            Err(ServiceError::NotFound("document"))
        ));
    }

    #[tokio::test]
    async fn move_requires_ownership_of_both_ends() {
        let fx = fixture().await;
        let user1 = register(&fx.accounts, "user1", "user1@x.com").await;
        let user2 = register(&fx.accounts, "user2", "user2@x.com").await;

        let folder1 = fx.directory.create_folder(user1, "Work").await.expect("folder");
        let sub_a = fx
            .directory
            .create_subfolder(user1, folder1.id, "A")
            .await
            .expect("subfolder");
        let sub_c = fx
            .directory
            .create_subfolder(user1, folder1.id, "C")
            .await
            .expect("subfolder");

        let folder2 = fx.directory.create_folder(user2, "Work").await.expect("folder");
        let sub_b = fx
            .directory
            .create_subfolder(user2, folder2.id, "B")
            .await
            .expect("subfolder");

        let document = fx
            .directory
            .create_document(user1, sub_a.id, "report", "pdf", "Q1 report")
            .await
            .expect("document");

        // Destination owned by someone else: refused even though user1
        // owns the document.
        let cross_user = fx.directory.move_document(user1, document.id, sub_b.id).await;
        assert!(matches!(cross_user, Err(ServiceError::NotFound("subfolder"))));

        // Requester who owns neither end is refused at the first check.
        let stranger = fx.directory.move_document(user2, document.id, sub_b.id).await;
        assert!(matches!(stranger, Err(ServiceError::NotFound("document"))));

        // Move within the same owner's tree succeeds.
        fx.directory
            .move_document(user1, document.id, sub_c.id)
            .await
            .expect("move");
        let moved = fx
            .directory
            .document_details(user1, document.id)
            .await
            .expect("details");
        assert_eq!(moved.subfolder_id, sub_c.id);
    }

    #[tokio::test]
    async fn home_tree_lists_childless_folders_and_is_idempotent() {
        let fx = fixture().await;
        let user = register(&fx.accounts, "user1", "user1@x.com").await;

        let work = fx.directory.create_folder(user, "Work").await.expect("folder");
        fx.directory.create_folder(user, "Empty").await.expect("folder");
        fx.directory
            .create_subfolder(user, work.id, "2024")
            .await
            .expect("subfolder");

        let first = fx.directory.home_tree(user).await.expect("tree");
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].folder.name, "Work");
        assert_eq!(first[0].subfolders.len(), 1);
        assert_eq!(first[0].subfolders[0].name, "2024");
        assert_eq!(first[1].folder.name, "Empty");
        assert!(first[1].subfolders.is_empty());

        let second = fx.directory.home_tree(user).await.expect("tree");
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn end_to_end_register_to_document_listing() {
        let fx = fixture().await;

        let user = fx
            .accounts
            .register(Registration {
                username: "alice",
                email: "alice@x.com",
                password: "secret12",
                confirm_password: "secret12",
                name: "Alice",
                surname: "Rossi",
            })
            .await
            .expect("register");
        let logged_in = fx.accounts.authenticate("alice", "secret12").await.expect("login");
        assert_eq!(logged_in.id, user.id);

        let work = fx.directory.create_folder(user.id, "Work").await.expect("folder");
        let year = fx
            .directory
            .create_subfolder(user.id, work.id, "2024")
            .await
            .expect("subfolder");
        // One second of slack absorbs the sub-second precision lost in
        // the TEXT column round trip.
        let before = Utc::now() - chrono::Duration::seconds(1);
        let report = fx
            .directory
            .create_document(user.id, year.id, "report", "pdf", "Q1 report")
            .await
            .expect("document");

        let tree = fx.directory.home_tree(user.id).await.expect("tree");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].folder.name, "Work");
        assert_eq!(tree[0].subfolders.len(), 1);
        assert_eq!(tree[0].subfolders[0].name, "2024");

        let documents = fx
            .directory
            .documents_in_subfolder(user.id, year.id)
            .await
            .expect("documents");
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, report.id);
        assert_eq!(documents[0].name, "report");
        assert_eq!(documents[0].format, "pdf");
        assert_eq!(documents[0].summary, "Q1 report");
        // Creation date came from the server, not the caller.
        assert!(documents[0].created_at >= before);
        assert!(documents[0].created_at <= Utc::now());
    }
}
