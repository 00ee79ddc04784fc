//! Trash listing, restore-all and purge.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{BulkResponse, NoteListResponse};
use crate::{ApiError, AppState, Owner};

#[utoipa::path(get, path = "/api/trash", tag = "Trash",
    responses((status = 200, description = "Trashed notes, most recently deleted first", body = NoteListResponse))
)]
pub async fn list_trash(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<NoteListResponse>, ApiError> {
    let notes = state.repo.list_trash(&owner).await?;
    Ok(Json(notes.into()))
}

/// Empty the trash. Safe to repeat after a partial failure.
#[utoipa::path(delete, path = "/api/trash", tag = "Trash",
    responses(
        (status = 200, description = "Trash emptied", body = BulkResponse),
        (status = 500, description = "Some notes could not be purged"),
    )
)]
pub async fn purge_all_trashed(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<BulkResponse>, ApiError> {
    let report = state.repo.purge_all_trashed(&owner).await?;
    Ok(Json(BulkResponse { report }))
}

#[utoipa::path(post, path = "/api/trash/restore", tag = "Trash",
    responses(
        (status = 200, description = "Every trashed note restored", body = BulkResponse),
        (status = 500, description = "Some notes could not be restored"),
    )
)]
pub async fn restore_all_trashed(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<BulkResponse>, ApiError> {
    let report = state.repo.restore_all_trashed(&owner).await?;
    Ok(Json(BulkResponse { report }))
}

/// Permanently delete one note.
#[utoipa::path(delete, path = "/api/trash/{id}", tag = "Trash",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note purged"),
        (status = 404, description = "No such note for this owner"),
    )
)]
pub async fn purge_note(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repo.purge(&owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
