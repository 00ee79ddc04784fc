//! Note CRUD, flag toggles and restore.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use jhonote_core::{FlagFilter, NewNote, NoteFields, NoteFlag, NoteQuery, PriorityFilter};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use super::{BulkResponse, NoteListResponse, NoteResponse};
use crate::{ApiError, AppState, Owner};

/// Query parameters for listing notes.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNotesQuery {
    /// Case-insensitive text in title or content
    pub search: Option<String>,
    /// "all", "favorites" or "pinned"
    pub filter: Option<String>,
    /// Exact stored tag
    pub tag: Option<String>,
    /// "all", "alta", "media" or "baja"
    pub priority: Option<String>,
}

impl ListNotesQuery {
    fn into_query(self) -> Result<NoteQuery, ApiError> {
        let filter: FlagFilter = self.filter.as_deref().unwrap_or_default().parse()?;
        let priority: PriorityFilter = self.priority.as_deref().unwrap_or_default().parse()?;
        Ok(NoteQuery {
            search: self.search,
            filter,
            tag: self.tag.filter(|t| !t.is_empty()),
            priority,
        })
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FlagBody {
    pub value: bool,
}

#[utoipa::path(get, path = "/api/notes", tag = "Notes",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "Active notes, pinned first", body = NoteListResponse),
        (status = 400, description = "Unknown filter or priority"),
        (status = 401, description = "Missing owner header"),
    )
)]
pub async fn list_notes(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Query(params): Query<ListNotesQuery>,
) -> Result<Json<NoteListResponse>, ApiError> {
    let query = params.into_query()?;
    let notes = state.repo.list_notes(&owner, &query).await?;
    Ok(Json(notes.into()))
}

#[utoipa::path(post, path = "/api/notes", tag = "Notes",
    request_body = NewNote,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Content missing"),
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(body): Json<NewNote>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    let note = state.repo.create(&owner, body).await?;
    Ok((StatusCode::CREATED, Json(NoteResponse { note })))
}

#[utoipa::path(get, path = "/api/notes/{id}", tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note, active or trashed", body = NoteResponse),
        (status = 404, description = "No such note for this owner"),
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state.repo.get(&owner, id).await?;
    Ok(Json(NoteResponse { note }))
}

#[utoipa::path(put, path = "/api/notes/{id}", tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    request_body = NoteFields,
    responses(
        (status = 200, description = "Note replaced", body = NoteResponse),
        (status = 404, description = "No such note for this owner"),
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
    Json(fields): Json<NoteFields>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state.repo.update(&owner, id, fields).await?;
    Ok(Json(NoteResponse { note }))
}

#[utoipa::path(patch, path = "/api/notes/{id}/{flag}", tag = "Notes",
    params(
        ("id" = Uuid, Path, description = "Note id"),
        ("flag" = String, Path, description = "completed, pinned or favorite"),
    ),
    request_body = FlagBody,
    responses(
        (status = 200, description = "Flag set", body = NoteResponse),
        (status = 404, description = "No such note or flag"),
    )
)]
pub async fn patch_note_flag(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path((id, flag)): Path<(Uuid, String)>,
    Json(body): Json<FlagBody>,
) -> Result<Json<NoteResponse>, ApiError> {
    let flag: NoteFlag = flag.parse()?;
    let note = state.repo.patch_flag(&owner, id, flag, body.value).await?;
    Ok(Json(NoteResponse { note }))
}

/// Move a note to the trash.
#[utoipa::path(delete, path = "/api/notes/{id}", tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note trashed"),
        (status = 404, description = "No such note for this owner"),
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repo.soft_delete(&owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/notes/{id}/restore", tag = "Notes",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note active again", body = NoteResponse),
        (status = 404, description = "No such note for this owner"),
    )
)]
pub async fn restore_note(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<Uuid>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state.repo.restore(&owner, id).await?;
    Ok(Json(NoteResponse { note }))
}

/// Permanently delete every note of the caller, active or trashed.
#[utoipa::path(delete, path = "/api/notes", tag = "Notes",
    responses(
        (status = 200, description = "All notes removed", body = BulkResponse),
        (status = 500, description = "Some notes could not be removed"),
    )
)]
pub async fn delete_all_notes(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<BulkResponse>, ApiError> {
    let report = state.repo.delete_all_for_owner(&owner).await?;
    debug!(owner_id = %owner, succeeded = report.succeeded, "Owner wipe finished");
    Ok(Json(BulkResponse { report }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params_mean_everything() {
        let query = ListNotesQuery::default().into_query().unwrap();
        assert_eq!(query.filter, FlagFilter::All);
        assert_eq!(query.priority, PriorityFilter::All);
        assert!(query.tag.is_none());
    }

    #[test]
    fn test_bad_filter_is_bad_request() {
        let params = ListNotesQuery {
            filter: Some("starred".into()),
            ..Default::default()
        };
        assert!(matches!(params.into_query(), Err(ApiError::BadRequest(_))));
    }
}
