//! In-memory [`NoteStore`].
//!
//! Backs the API when `STORE_BACKEND=memory` and every core test. Notes are
//! kept in insertion order so `list_by_owner` matches what a database would
//! return for an insert-ordered table. Failure injection lets tests exercise
//! the unavailable-store and partial-bulk paths.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::trace;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{NewNoteRecord, Note, NoteFields, NotePatch};
use crate::traits::NoteStore;

#[derive(Debug, Default)]
struct State {
    notes: Vec<Note>,
    failing: HashSet<Uuid>,
}

/// Thread-safe note collection held in process memory.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    state: RwLock<State>,
    unavailable: AtomicBool,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing notes, kept in the given order.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            state: RwLock::new(State {
                notes,
                failing: HashSet::new(),
            }),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every call fail with [`Error::StoreUnavailable`] until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make writes (patch, replace, delete) to `id` fail.
    pub async fn fail_writes_for(&self, id: Uuid) {
        self.state.write().await.failing.insert(id);
    }

    /// Stop injecting write failures.
    pub async fn clear_failures(&self) {
        self.state.write().await.failing.clear();
    }

    /// Number of notes held, across all owners.
    pub async fn len(&self) -> usize {
        self.state.read().await.notes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(Error::StoreUnavailable("memory store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

fn check_writable(state: &State, id: Uuid) -> Result<()> {
    if state.failing.contains(&id) {
        Err(Error::Internal(format!("injected write failure for {}", id)))
    } else {
        Ok(())
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn insert(&self, record: NewNoteRecord) -> Result<Note> {
        self.check_available()?;
        let note = Note::from_record(Uuid::now_v7(), record);
        self.state.write().await.notes.push(note.clone());
        trace!(note_id = %note.id, "Inserted note into memory store");
        Ok(note)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Note>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state.notes.iter().find(|n| n.id == id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Note>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .notes
            .iter()
            .filter(|n| n.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn patch(&self, id: Uuid, patch: NotePatch) -> Result<Option<Note>> {
        self.check_available()?;
        let mut state = self.state.write().await;
        check_writable(&state, id)?;
        Ok(state.notes.iter_mut().find(|n| n.id == id).map(|note| {
            patch.apply_to(note);
            note.clone()
        }))
    }

    async fn replace(
        &self,
        id: Uuid,
        fields: NoteFields,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Note>> {
        self.check_available()?;
        let mut state = self.state.write().await;
        check_writable(&state, id)?;
        Ok(state.notes.iter_mut().find(|n| n.id == id).map(|note| {
            note.replace_fields(fields, updated_at);
            note.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.check_available()?;
        let mut state = self.state.write().await;
        check_writable(&state, id)?;
        let before = state.notes.len();
        state.notes.retain(|n| n.id != id);
        Ok(state.notes.len() != before)
    }
}
