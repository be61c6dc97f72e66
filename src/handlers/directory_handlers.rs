//! HTTP handlers for the folder/subfolder/document hierarchy.
//!
//! Every handler takes the `AuthUser` extractor; ownership enforcement
//! itself lives in `DirectoryService`, these functions only carry the
//! requester's id through.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{auth::AuthUser, errors::AppError, services::directory_service::DirectoryService};

#[derive(Debug, Deserialize)]
pub struct CreateFolderReq {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubFolderReq {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentReq {
    pub name: String,
    pub format: String,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveDocumentReq {
    pub target_subfolder_id: i64,
}

/// GET `/home` — the requester's folders with their subfolders.
pub async fn home_tree(
    State(directory): State<DirectoryService>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let tree = directory.home_tree(auth.user_id).await?;
    Ok(Json(tree))
}

/// POST `/folders` — create a top-level folder, 201.
pub async fn create_folder(
    State(directory): State<DirectoryService>,
    auth: AuthUser,
    Json(req): Json<CreateFolderReq>,
) -> Result<impl IntoResponse, AppError> {
    let folder = directory.create_folder(auth.user_id, &req.name).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// POST `/folders/{folder_id}/subfolders` — create a subfolder, 201.
pub async fn create_subfolder(
    State(directory): State<DirectoryService>,
    auth: AuthUser,
    Path(folder_id): Path<i64>,
    Json(req): Json<CreateSubFolderReq>,
) -> Result<impl IntoResponse, AppError> {
    let subfolder = directory
        .create_subfolder(auth.user_id, folder_id, &req.name)
        .await?;
    Ok((StatusCode::CREATED, Json(subfolder)))
}

/// GET `/subfolders/{subfolder_id}/documents` — list documents.
pub async fn list_documents(
    State(directory): State<DirectoryService>,
    auth: AuthUser,
    Path(subfolder_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let documents = directory
        .documents_in_subfolder(auth.user_id, subfolder_id)
        .await?;
    Ok(Json(documents))
}

/// POST `/subfolders/{subfolder_id}/documents` — create a document, 201.
pub async fn create_document(
    State(directory): State<DirectoryService>,
    auth: AuthUser,
    Path(subfolder_id): Path<i64>,
    Json(req): Json<CreateDocumentReq>,
) -> Result<impl IntoResponse, AppError> {
    let document = directory
        .create_document(auth.user_id, subfolder_id, &req.name, &req.format, &req.summary)
        .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET `/documents/{document_id}` — full metadata of one document.
pub async fn document_details(
    State(directory): State<DirectoryService>,
    auth: AuthUser,
    Path(document_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let document = directory.document_details(auth.user_id, document_id).await?;
    Ok(Json(document))
}

/// POST `/documents/{document_id}/move` — reparent a document, 204.
pub async fn move_document(
    State(directory): State<DirectoryService>,
    auth: AuthUser,
    Path(document_id): Path<i64>,
    Json(req): Json<MoveDocumentReq>,
) -> Result<impl IntoResponse, AppError> {
    directory
        .move_document(auth.user_id, document_id, req.target_subfolder_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
