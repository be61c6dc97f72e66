//! HTTP handlers for registration, login and logout.
//! Thin translation between JSON bodies and `AccountService`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthUser,
    errors::AppError,
    services::account_service::{AccountService, Registration},
};

#[derive(Debug, Deserialize)]
pub struct RegisterReq {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginReq {
    /// Username or email address; the service detects which by format.
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionRes {
    pub token: String,
}

/// POST `/register` — create an account, 201 with the new user.
pub async fn register(
    State(accounts): State<AccountService>,
    Json(req): Json<RegisterReq>,
) -> Result<impl IntoResponse, AppError> {
    let user = accounts
        .register(Registration {
            username: &req.username,
            email: &req.email,
            password: &req.password,
            confirm_password: &req.confirm_password,
            name: &req.name,
            surname: &req.surname,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST `/login` — check credentials and mint a session token.
pub async fn login(
    State(accounts): State<AccountService>,
    Json(req): Json<LoginReq>,
) -> Result<impl IntoResponse, AppError> {
    let user = accounts.authenticate(&req.identifier, &req.password).await?;
    let token = accounts.create_session(user.id).await?;
    Ok(Json(SessionRes { token }))
}

/// POST `/logout` — drop the presented session, 204.
pub async fn logout(
    State(accounts): State<AccountService>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    accounts.delete_session(&auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}
