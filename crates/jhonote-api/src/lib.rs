//! # jhonote-api
//!
//! HTTP surface for JHONOTE: an axum router over a [`NoteRepository`].
//! The binary in `main.rs` wires configuration, logging and the store;
//! this library part exists so the router can be driven in-process by tests.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;

use axum::http::{header, HeaderName, Method};
use axum::routing::{get, patch, post};
use axum::Router;
use jhonote_core::NoteRepository;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

pub use auth::Owner;
pub use config::{ApiConfig, StoreBackend};
pub use error::ApiError;

use handlers::{insights, notes, trash};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub repo: NoteRepository,
    /// Header the caller's identity is read from
    pub owner_header: HeaderName,
}

impl AppState {
    pub fn new(repo: NoteRepository, owner_header: HeaderName) -> Self {
        Self { repo, owner_header }
    }
}

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the full application router.
pub fn router(state: AppState, config: &ApiConfig) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", openapi::ApiDoc::openapi()))
        // Notes
        .route(
            "/api/notes",
            get(notes::list_notes)
                .post(notes::create_note)
                .delete(notes::delete_all_notes),
        )
        .route(
            "/api/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/api/notes/:id/restore", post(notes::restore_note))
        .route("/api/notes/:id/:flag", patch(notes::patch_note_flag))
        // Trash
        .route(
            "/api/trash",
            get(trash::list_trash).delete(trash::purge_all_trashed),
        )
        .route("/api/trash/restore", post(trash::restore_all_trashed))
        .route("/api/trash/:id", axum::routing::delete(trash::purge_note))
        // Insights
        .route("/api/stats", get(insights::get_stats))
        .route("/api/dashboard", get(insights::get_dashboard))
        .route("/api/tags", get(insights::list_tags))
        .route("/api/calendar/:date", get(insights::notes_on_day))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    state.owner_header.clone(),
                ])
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .with_state(state)
}
