//! AccountService — registration, credential checks, and session state.
//!
//! Registration enforces a fixed precedence of failures so the first
//! broken rule is always the one reported: username → email → password →
//! name → surname → username taken → email taken → confirmation mismatch.

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::auth::{generate_token, hash_password, verify_password};
use crate::models::user::User;
use crate::services::{ServiceError, ServiceResult, is_unique_violation};
use crate::validation;

/// Raw registration input as received from the outside.
#[derive(Debug, Clone)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub name: &'a str,
    pub surname: &'a str,
}

#[derive(Clone)]
pub struct AccountService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,

    /// Whether passwords must also contain a symbol (policy option).
    require_password_symbol: bool,
}

impl AccountService {
    pub fn new(db: Arc<SqlitePool>, require_password_symbol: bool) -> Self {
        Self {
            db,
            require_password_symbol,
        }
    }

    /// Register a new account.
    ///
    /// Validates every field, checks username/email availability, then
    /// inserts with a bcrypt password hash. A unique-constraint violation
    /// on insert maps to the same `Conflict` outcome as the pre-check, so
    /// two racing registrations cannot both succeed.
    pub async fn register(&self, reg: Registration<'_>) -> ServiceResult<User> {
        if !validation::is_valid_username(reg.username) {
            return Err(ServiceError::Validation("username"));
        }
        if !validation::is_valid_email(reg.email) {
            return Err(ServiceError::Validation("email"));
        }
        if !validation::is_valid_password(reg.password, self.require_password_symbol) {
            return Err(ServiceError::Validation("password"));
        }
        if !validation::is_valid_name(reg.name) {
            return Err(ServiceError::Validation("name"));
        }
        if !validation::is_valid_surname(reg.surname) {
            return Err(ServiceError::Validation("surname"));
        }
        if self.does_username_exist(reg.username).await? {
            return Err(ServiceError::Conflict {
                entity: "user",
                field: "username",
            });
        }
        if self.does_email_exist(reg.email).await? {
            return Err(ServiceError::Conflict {
                entity: "user",
                field: "email",
            });
        }
        if reg.password != reg.confirm_password {
            return Err(ServiceError::Validation("confirm_password"));
        }

        let password_hash = hash_password(reg.password)?;

        let insert_result = sqlx::query_as::<_, User>(
            "INSERT INTO user (username, email, password_hash, name, surname, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id, username, email, password_hash, name, surname, created_at",
        )
        .bind(reg.username)
        .bind(reg.email)
        .bind(&password_hash)
        .bind(reg.name)
        .bind(reg.surname)
        .bind(Utc::now())
        .fetch_one(&*self.db)
        .await;

        match insert_result {
            Ok(user) => {
                debug!(user_id = user.id, "registered user {}", user.username);
                Ok(user)
            }
            // Backstop for the check-then-insert race: the UNIQUE
            // constraint decides, and its message names the column.
            Err(err) if is_unique_violation(&err) => {
                let field = match &err {
                    sqlx::Error::Database(db_err) if db_err.message().contains("username") => {
                        "username"
                    }
                    _ => "email",
                };
                Err(ServiceError::Conflict {
                    entity: "user",
                    field,
                })
            }
            Err(err) => Err(ServiceError::Sqlx(err)),
        }
    }

    /// Check credentials for an identifier that may be a username or an
    /// email address, detected by format.
    ///
    /// Any failure — unknown identifier or wrong password — collapses to
    /// `AuthenticationFailed`.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> ServiceResult<User> {
        let query = if validation::is_valid_email(identifier) {
            "SELECT id, username, email, password_hash, name, surname, created_at
             FROM user WHERE email = ?"
        } else {
            "SELECT id, username, email, password_hash, name, surname, created_at
             FROM user WHERE username = ?"
        };

        let user = sqlx::query_as::<_, User>(query)
            .bind(identifier)
            .fetch_optional(&*self.db)
            .await?;

        match user {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            _ => Err(ServiceError::AuthenticationFailed),
        }
    }

    /// Mint a session token bound to the given user.
    pub async fn create_session(&self, user_id: i64) -> ServiceResult<String> {
        let token = generate_token();
        sqlx::query("INSERT INTO session (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&*self.db)
            .await?;
        Ok(token)
    }

    /// Resolve a session token to its user id, if the session exists.
    pub async fn resolve_session(&self, token: &str) -> ServiceResult<Option<i64>> {
        let user_id = sqlx::query_scalar::<_, i64>("SELECT user_id FROM session WHERE token = ?")
            .bind(token)
            .fetch_optional(&*self.db)
            .await?;
        Ok(user_id)
    }

    /// Drop a session. Removing an unknown token is not an error.
    pub async fn delete_session(&self, token: &str) -> ServiceResult<()> {
        sqlx::query("DELETE FROM session WHERE token = ?")
            .bind(token)
            .execute(&*self.db)
            .await?;
        Ok(())
    }

    async fn does_username_exist(&self, username: &str) -> ServiceResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM user WHERE username = ?)")
                .bind(username)
                .fetch_one(&*self.db)
                .await?;
        Ok(exists)
    }

    async fn does_email_exist(&self, email: &str) -> ServiceResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM user WHERE email = ?)")
                .bind(email)
                .fetch_one(&*self.db)
                .await?;
        Ok(exists)
    }
}
