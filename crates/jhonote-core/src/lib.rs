//! # jhonote-core
//!
//! Note lifecycle, query engine, and core types for JHONOTE.
//!
//! [`NoteRepository`] owns the owner-scoped lifecycle (create, trash,
//! restore, purge) on top of any [`NoteStore`]. The [`query`] module holds
//! the pure functions that turn one owner's notes into listings and
//! dashboard figures.
//!
//! ## Log Level Contract
//!
//! Events carry `subsystem`, `component` and `op` fields, plus `note_id` or
//! `owner_id` where one applies.
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Store unreachable, bulk operation left work undone |
//! | WARN  | Rejected request (validation, not found), per-item bulk failure |
//! | INFO  | Startup/shutdown, destructive operations (purge, owner wipe) |
//! | DEBUG | Every lifecycle mutation, config choices |
//! | TRACE | Per-note iteration inside bulk operations |

pub mod clock;
pub mod error;
pub mod memory;
pub mod models;
pub mod query;
pub mod repository;
pub mod tags;
pub mod temporal;
pub mod traits;

// Re-export commonly used types at crate root
pub use clock::{ManualClock, SystemClock};
pub use error::{Error, Result};
pub use memory::MemoryNoteStore;
pub use models::*;
pub use query::{
    active_notes, apply_query, compute_stats, filter_by_flag, filter_by_priority, filter_by_tag,
    search, trashed_notes,
};
pub use repository::NoteRepository;
pub use tags::{collect_tags, normalize_tag, normalize_tags, suggest_tags};
pub use temporal::{is_due_soon, is_overdue};
pub use traits::*;
