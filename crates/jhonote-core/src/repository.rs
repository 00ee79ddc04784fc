//! Owner-scoped note lifecycle.
//!
//! [`NoteRepository`] is the only place that decides who may touch a note.
//! Stores are plain keyed collections; every mutation here first fetches the
//! record and compares its `owner_id` with the caller's. A foreign note is
//! reported exactly like a missing one.
//!
//! Bulk trash operations read a snapshot and then act on each note
//! independently. There is no cross-item atomicity: an interrupted run leaves
//! partial state, and re-running converges because notes that vanished in
//! between are counted as skipped rather than failed.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

use crate::clock::SystemClock;
use crate::error::{Error, Result};
use crate::models::{
    BulkReport, Dashboard, NewNote, NewNoteRecord, Note, NoteFields, NoteFlag, NotePatch,
    NoteQuery, NoteStats,
};
use crate::query;
use crate::tags;
use crate::traits::{Clock, NoteStore};

/// Note lifecycle operations on top of a [`NoteStore`].
#[derive(Clone)]
pub struct NoteRepository {
    store: Arc<dyn NoteStore>,
    clock: Arc<dyn Clock>,
}

impl NoteRepository {
    /// Create a repository that stamps notes with wall-clock time.
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn NoteStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<dyn NoteStore> {
        &self.store
    }

    // =========================================================================
    // SINGLE-NOTE LIFECYCLE
    // =========================================================================

    /// Create an active note for `owner_id`.
    #[instrument(skip(self, new), fields(subsystem = "core", component = "repository", op = "create"))]
    pub async fn create(&self, owner_id: &str, new: NewNote) -> Result<Note> {
        require_owner(owner_id)?;
        if new.content.trim().is_empty() {
            warn!(owner_id, "Rejected note without content");
            return Err(Error::Validation("content is required".to_string()));
        }

        let record = NewNoteRecord {
            owner_id: owner_id.to_string(),
            fields: normalize_fields(new.into()),
            created_at: self.clock.now(),
        };
        let note = self.store.insert(record).await?;
        debug!(note_id = %note.id, owner_id, "Created note");
        Ok(note)
    }

    /// Fetch one note, active or trashed.
    pub async fn get(&self, owner_id: &str, id: Uuid) -> Result<Note> {
        require_owner(owner_id)?;
        self.fetch_owned(owner_id, id).await
    }

    /// Replace every mutable field in a single store write.
    #[instrument(skip(self, fields), fields(subsystem = "core", component = "repository", op = "update", note_id = %id))]
    pub async fn update(&self, owner_id: &str, id: Uuid, fields: NoteFields) -> Result<Note> {
        require_owner(owner_id)?;
        self.fetch_owned(owner_id, id).await?;
        let note = self
            .store
            .replace(id, normalize_fields(fields), self.clock.now())
            .await?
            .ok_or(Error::NoteNotFound(id))?;
        debug!(note_id = %id, "Updated note");
        Ok(note)
    }

    /// Set one boolean flag and touch `updated_at`.
    #[instrument(skip(self), fields(subsystem = "core", component = "repository", op = "patch_flag", note_id = %id, flag = flag.as_str()))]
    pub async fn patch_flag(
        &self,
        owner_id: &str,
        id: Uuid,
        flag: NoteFlag,
        value: bool,
    ) -> Result<Note> {
        require_owner(owner_id)?;
        self.fetch_owned(owner_id, id).await?;
        let note = self
            .store
            .patch(id, NotePatch::flag(flag, value, self.clock.now()))
            .await?
            .ok_or(Error::NoteNotFound(id))?;
        debug!(note_id = %id, flag = flag.as_str(), value, "Patched note flag");
        Ok(note)
    }

    /// Move a note to the trash. Already-trashed notes are returned unchanged.
    #[instrument(skip(self), fields(subsystem = "core", component = "repository", op = "soft_delete", note_id = %id))]
    pub async fn soft_delete(&self, owner_id: &str, id: Uuid) -> Result<Note> {
        require_owner(owner_id)?;
        let current = self.fetch_owned(owner_id, id).await?;
        if current.is_trashed() {
            trace!(note_id = %id, "Note already in trash");
            return Ok(current);
        }
        let note = self
            .store
            .patch(id, NotePatch::trash(self.clock.now()))
            .await?
            .ok_or(Error::NoteNotFound(id))?;
        debug!(note_id = %id, "Moved note to trash");
        Ok(note)
    }

    /// Take a note out of the trash. Active notes are returned unchanged.
    #[instrument(skip(self), fields(subsystem = "core", component = "repository", op = "restore", note_id = %id))]
    pub async fn restore(&self, owner_id: &str, id: Uuid) -> Result<Note> {
        require_owner(owner_id)?;
        let current = self.fetch_owned(owner_id, id).await?;
        if current.is_active() {
            trace!(note_id = %id, "Note already active");
            return Ok(current);
        }
        let note = self
            .store
            .patch(id, NotePatch::restore(self.clock.now()))
            .await?
            .ok_or(Error::NoteNotFound(id))?;
        debug!(note_id = %id, "Restored note");
        Ok(note)
    }

    /// Permanently remove one note, active or trashed.
    #[instrument(skip(self), fields(subsystem = "core", component = "repository", op = "purge", note_id = %id))]
    pub async fn purge(&self, owner_id: &str, id: Uuid) -> Result<()> {
        require_owner(owner_id)?;
        self.fetch_owned(owner_id, id).await?;
        if !self.store.delete(id).await? {
            return Err(Error::NoteNotFound(id));
        }
        info!(note_id = %id, "Purged note");
        Ok(())
    }

    // =========================================================================
    // BULK OPERATIONS
    // =========================================================================

    /// Permanently remove every trashed note of `owner_id`.
    #[instrument(skip(self), fields(subsystem = "core", component = "repository", op = "purge_all_trashed"))]
    pub async fn purge_all_trashed(&self, owner_id: &str) -> Result<BulkReport> {
        require_owner(owner_id)?;
        let ids = self.trashed_ids(owner_id).await?;
        let store = &self.store;
        run_bulk("purge_all_trashed", ids, move |id| store.delete(id)).await
    }

    /// Restore every trashed note of `owner_id`.
    #[instrument(skip(self), fields(subsystem = "core", component = "repository", op = "restore_all_trashed"))]
    pub async fn restore_all_trashed(&self, owner_id: &str) -> Result<BulkReport> {
        require_owner(owner_id)?;
        let ids = self.trashed_ids(owner_id).await?;
        let now = self.clock.now();
        let store = &self.store;
        run_bulk("restore_all_trashed", ids, move |id| async move {
            let restored = store.patch(id, NotePatch::restore(now)).await?;
            Ok::<_, Error>(restored.is_some())
        })
        .await
    }

    /// Permanently remove every note of `owner_id`, active or trashed.
    #[instrument(skip(self), fields(subsystem = "core", component = "repository", op = "delete_all_for_owner"))]
    pub async fn delete_all_for_owner(&self, owner_id: &str) -> Result<BulkReport> {
        require_owner(owner_id)?;
        let ids: Vec<Uuid> = self
            .store
            .list_by_owner(owner_id)
            .await?
            .into_iter()
            .map(|n| n.id)
            .collect();
        let store = &self.store;
        let report = run_bulk("delete_all_for_owner", ids, move |id| store.delete(id)).await?;
        info!(owner_id, succeeded = report.succeeded, "Deleted all notes for owner");
        Ok(report)
    }

    // =========================================================================
    // READ MODEL
    // =========================================================================

    /// Active notes matching `query`, pinned first then most recent.
    pub async fn list_notes(&self, owner_id: &str, query: &NoteQuery) -> Result<Vec<Note>> {
        let all = self.owner_notes(owner_id).await?;
        let notes = query::apply_query(&all, query);
        trace!(owner_id, result_count = notes.len(), "Listed notes");
        Ok(notes)
    }

    /// Trashed notes, most recently deleted first.
    pub async fn list_trash(&self, owner_id: &str) -> Result<Vec<Note>> {
        let all = self.owner_notes(owner_id).await?;
        Ok(query::trashed_notes(&all))
    }

    pub async fn stats(&self, owner_id: &str) -> Result<NoteStats> {
        let all = self.owner_notes(owner_id).await?;
        let trashed = query::trashed_notes(&all);
        Ok(query::compute_stats(&all, &trashed, self.clock.now()))
    }

    pub async fn dashboard(&self, owner_id: &str) -> Result<Dashboard> {
        let all = self.owner_notes(owner_id).await?;
        let active = query::active_notes(&all);
        let trashed = query::trashed_notes(&all);
        Ok(query::dashboard(&active, &trashed, self.clock.now()))
    }

    /// Distinct tags used by the owner's active notes.
    pub async fn tags(&self, owner_id: &str) -> Result<Vec<String>> {
        let all = self.owner_notes(owner_id).await?;
        Ok(tags::collect_tags(&query::active_notes(&all)))
    }

    /// Known tags matching `input`, minus those in `exclude`.
    pub async fn suggest_tags(
        &self,
        owner_id: &str,
        input: &str,
        exclude: &[String],
    ) -> Result<Vec<String>> {
        let known = self.tags(owner_id).await?;
        Ok(tags::suggest_tags(&known, input, exclude))
    }

    /// Active notes starting or due on `date`, in listing order.
    pub async fn notes_on(&self, owner_id: &str, date: NaiveDate) -> Result<Vec<Note>> {
        let all = self.owner_notes(owner_id).await?;
        Ok(query::notes_on(&query::active_notes(&all), date))
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    async fn owner_notes(&self, owner_id: &str) -> Result<Vec<Note>> {
        require_owner(owner_id)?;
        self.store.list_by_owner(owner_id).await
    }

    async fn fetch_owned(&self, owner_id: &str, id: Uuid) -> Result<Note> {
        match self.store.fetch(id).await? {
            Some(note) if note.owner_id == owner_id => Ok(note),
            _ => Err(Error::NoteNotFound(id)),
        }
    }

    async fn trashed_ids(&self, owner_id: &str) -> Result<Vec<Uuid>> {
        Ok(self
            .store
            .list_by_owner(owner_id)
            .await?
            .into_iter()
            .filter(Note::is_trashed)
            .map(|n| n.id)
            .collect())
    }
}

fn require_owner(owner_id: &str) -> Result<()> {
    if owner_id.trim().is_empty() {
        Err(Error::Unauthenticated("missing owner identity".to_string()))
    } else {
        Ok(())
    }
}

/// Stored form of user-supplied fields: blank titles dropped, tags normalised.
fn normalize_fields(mut fields: NoteFields) -> NoteFields {
    fields.title = fields
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    fields.tags = tags::normalize_tags(&fields.tags);
    fields
}

/// Run `op` for every id concurrently. `Ok(false)` means the note was already
/// gone and counts as skipped.
async fn run_bulk<F, Fut>(op: &'static str, ids: Vec<Uuid>, f: F) -> Result<BulkReport>
where
    F: Fn(Uuid) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();
    let attempted = ids.len();
    let outcomes = join_all(ids.iter().map(|&id| f(id))).await;

    let mut report = BulkReport {
        attempted,
        ..Default::default()
    };
    let mut failures = Vec::new();
    for (id, outcome) in ids.iter().zip(outcomes) {
        match outcome {
            Ok(true) => report.succeeded += 1,
            Ok(false) => {
                trace!(note_id = %id, op, "Note vanished before bulk step");
                report.skipped += 1;
            }
            Err(e) => {
                warn!(note_id = %id, op, error = %e, "Bulk step failed");
                failures.push(format!("{}: {}", id, e));
            }
        }
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    if !failures.is_empty() {
        error!(
            op,
            attempted,
            succeeded = report.succeeded,
            failed = failures.len(),
            duration_ms,
            "Bulk operation incomplete"
        );
        return Err(Error::BulkIncomplete {
            succeeded: report.succeeded,
            failed: failures.len(),
            message: failures.join("; "),
        });
    }

    debug!(
        op,
        attempted,
        succeeded = report.succeeded,
        skipped = report.skipped,
        duration_ms,
        "Bulk operation finished"
    );
    Ok(report)
}
