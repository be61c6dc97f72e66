//! Defines routes for account and hierarchy operations.
//!
//! ## Structure
//! - **Open endpoints**
//!   - `POST /register` — create an account
//!   - `POST /login`    — check credentials, mint a session token
//!   - `GET  /healthz` / `GET /readyz` — probes
//!
//! - **Session-bound endpoints** (Authorization: Bearer token)
//!   - `POST /logout`
//!   - `GET  /home` — folders with their subfolders
//!   - `POST /folders` — create folder
//!   - `POST /folders/{folder_id}/subfolders` — create subfolder
//!   - `GET  /subfolders/{subfolder_id}/documents` — list documents
//!   - `POST /subfolders/{subfolder_id}/documents` — create document
//!   - `GET  /documents/{document_id}` — document details
//!   - `POST /documents/{document_id}/move` — reparent a document

use crate::{
    handlers::{
        account_handlers::{login, logout, register},
        directory_handlers::{
            create_document, create_folder, create_subfolder, document_details, home_tree,
            list_documents, move_document,
        },
        health_handlers::{healthz, readyz},
    },
    services::{account_service::AccountService, directory_service::DirectoryService},
};
use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};

/// Shared state carried by the router; substates feed the `State`
/// extractors of the handlers and the `AuthUser` extractor.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub directory: DirectoryService,
}

impl FromRef<AppState> for AccountService {
    fn from_ref(state: &AppState) -> Self {
        state.accounts.clone()
    }
}

impl FromRef<AppState> for DirectoryService {
    fn from_ref(state: &AppState) -> Self {
        state.directory.clone()
    }
}

/// Build and return the router for all service routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // account endpoints
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        // hierarchy endpoints
        .route("/home", get(home_tree))
        .route("/folders", post(create_folder))
        .route("/folders/{folder_id}/subfolders", post(create_subfolder))
        .route(
            "/subfolders/{subfolder_id}/documents",
            get(list_documents).post(create_document),
        )
        .route("/documents/{document_id}", get(document_details))
        .route("/documents/{document_id}/move", post(move_document))
}
