//! Password hashing, session tokens, and the authenticated-user extractor.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use rand::Rng;

use crate::{errors::AppError, services::account_service::AccountService};

/// Hash a password with bcrypt at the default cost.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Verify a password against a stored bcrypt digest.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Random 32-character alphanumeric session token.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// The authenticated requester, resolved from `Authorization: Bearer <token>`.
///
/// Handlers that take this extractor are only reachable with a live
/// session; everything else answers 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AccountService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let accounts = AccountService::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.strip_prefix("Bearer ").unwrap_or(value))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::unauthorized("missing session token"))?;

        match accounts.resolve_session(token).await? {
            Some(user_id) => Ok(AuthUser {
                user_id,
                token: token.to_string(),
            }),
            None => Err(AppError::unauthorized("invalid session token")),
        }
    }
}
