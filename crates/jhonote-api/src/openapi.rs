//! OpenAPI document, served at `/openapi.json` and browsable at `/docs`.

use utoipa::OpenApi;

use crate::handlers::{self, insights, notes, trash};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "JHONOTE API",
        description = "Personal notes with trash, flags, tags and due dates"
    ),
    paths(
        handlers::health_check,
        notes::list_notes,
        notes::create_note,
        notes::get_note,
        notes::update_note,
        notes::patch_note_flag,
        notes::delete_note,
        notes::restore_note,
        notes::delete_all_notes,
        trash::list_trash,
        trash::purge_all_trashed,
        trash::restore_all_trashed,
        trash::purge_note,
        insights::get_stats,
        insights::get_dashboard,
        insights::list_tags,
        insights::notes_on_day,
    ),
    components(schemas(
        jhonote_core::Note,
        jhonote_core::NewNote,
        jhonote_core::NoteFields,
        jhonote_core::NoteFlag,
        jhonote_core::Priority,
        jhonote_core::NoteStats,
        jhonote_core::DayActivity,
        jhonote_core::Dashboard,
        jhonote_core::BulkReport,
        handlers::NoteListResponse,
        handlers::NoteResponse,
        handlers::BulkResponse,
        handlers::HealthResponse,
        notes::FlagBody,
        insights::TagsResponse,
        insights::CalendarDayResponse,
    )),
    tags(
        (name = "Notes", description = "Note CRUD and flags"),
        (name = "Trash", description = "Trashed notes and permanent deletion"),
        (name = "Insights", description = "Statistics, dashboard, tags and calendar"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
