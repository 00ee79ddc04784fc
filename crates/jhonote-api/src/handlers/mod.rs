//! HTTP handlers and their response envelopes.

pub mod insights;
pub mod notes;
pub mod trash;

use axum::response::IntoResponse;
use axum::Json;
use jhonote_core::{BulkReport, Note};
use serde::{Deserialize, Serialize};

/// A list of notes and its length.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoteListResponse {
    pub notes: Vec<Note>,
    pub total: usize,
}

impl From<Vec<Note>> for NoteListResponse {
    fn from(notes: Vec<Note>) -> Self {
        Self {
            total: notes.len(),
            notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoteResponse {
    pub note: Note,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BulkResponse {
    pub report: BulkReport,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
}

#[utoipa::path(get, path = "/api/health", tag = "System",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
