//! Core traits for JHONOTE abstractions.
//!
//! These traits define the seams between the note lifecycle logic and the
//! collaborators it depends on, so the repository can run against a
//! PostgreSQL store in production and an in-memory store in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewNoteRecord, Note, NoteFields, NotePatch};

// =============================================================================
// NOTE STORE
// =============================================================================

/// Durable keyed collection of notes.
///
/// Implementations do not enforce ownership; the repository does that by
/// comparing the stored `owner_id` with the caller's.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a new note and return it with its assigned id.
    async fn insert(&self, record: NewNoteRecord) -> Result<Note>;

    /// Fetch a note by id, active or trashed.
    async fn fetch(&self, id: Uuid) -> Result<Option<Note>>;

    /// All notes of one owner in store iteration (creation) order.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Note>>;

    /// Partial update. Returns `None` if the note does not exist.
    async fn patch(&self, id: Uuid, patch: NotePatch) -> Result<Option<Note>>;

    /// Replace every mutable field in one write. Returns `None` if the note
    /// does not exist.
    async fn replace(
        &self,
        id: Uuid,
        fields: NoteFields,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Note>>;

    /// Permanently delete a note. Returns `false` if it was already gone.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// CLOCK
// =============================================================================

/// Source of "now" for lifecycle timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
