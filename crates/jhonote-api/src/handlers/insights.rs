//! Read-only views: statistics, dashboard, tag catalogue, calendar day.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use jhonote_core::{Dashboard, NoteStats};
use serde::{Deserialize, Serialize};

use super::NoteListResponse;
use crate::{ApiError, AppState, Owner};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TagsQuery {
    /// Partial input to complete; omit for the full catalogue
    pub q: Option<String>,
    /// Comma-separated tags already on the note
    pub exclude: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CalendarDayResponse {
    pub date: NaiveDate,
    pub notes: Vec<jhonote_core::Note>,
    pub total: usize,
}

#[utoipa::path(get, path = "/api/stats", tag = "Insights",
    responses((status = 200, description = "Counters over the caller's notes", body = NoteStats))
)]
pub async fn get_stats(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<NoteStats>, ApiError> {
    Ok(Json(state.repo.stats(&owner).await?))
}

#[utoipa::path(get, path = "/api/dashboard", tag = "Insights",
    responses((status = 200, description = "Home screen summary", body = Dashboard))
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<Dashboard>, ApiError> {
    Ok(Json(state.repo.dashboard(&owner).await?))
}

#[utoipa::path(get, path = "/api/tags", tag = "Insights",
    params(TagsQuery),
    responses((status = 200, description = "Known tags or suggestions", body = TagsResponse))
)]
pub async fn list_tags(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Query(params): Query<TagsQuery>,
) -> Result<Json<TagsResponse>, ApiError> {
    let tags = match params.q {
        Some(q) => {
            let exclude: Vec<String> = params
                .exclude
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .filter_map(jhonote_core::normalize_tag)
                .collect();
            state.repo.suggest_tags(&owner, &q, &exclude).await?
        }
        None => state.repo.tags(&owner).await?,
    };
    Ok(Json(TagsResponse { tags }))
}

#[utoipa::path(get, path = "/api/calendar/{date}", tag = "Insights",
    params(("date" = String, Path, description = "Calendar day, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Active notes starting or due that day", body = CalendarDayResponse),
        (status = 400, description = "Malformed date"),
    )
)]
pub async fn notes_on_day(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(date): Path<String>,
) -> Result<Json<CalendarDayResponse>, ApiError> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("invalid date '{}'", date)))?;
    let notes = state.repo.notes_on(&owner, date).await?;
    let NoteListResponse { notes, total } = notes.into();
    Ok(Json(CalendarDayResponse { date, notes, total }))
}
