//! PostgreSQL [`NoteStore`] implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use jhonote_core::{
    Error, NewNoteRecord, Note, NoteFields, NotePatch, NoteStore, Priority, Result,
};

use crate::map_sqlx_error;

const NOTE_COLUMNS: &str = "id, owner_id, title, content, completed, start_date, due_date, \
     tags, pinned, is_favorite, priority, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of [`NoteStore`].
#[derive(Clone)]
pub struct PgNoteStore {
    pool: Pool<Postgres>,
}

impl PgNoteStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn map_row_to_note(row: PgRow) -> Result<Note> {
    let priority: String = row.try_get("priority").map_err(Error::Database)?;
    Ok(Note {
        id: row.try_get("id").map_err(Error::Database)?,
        owner_id: row.try_get("owner_id").map_err(Error::Database)?,
        title: row.try_get("title").map_err(Error::Database)?,
        content: row.try_get("content").map_err(Error::Database)?,
        completed: row.try_get("completed").map_err(Error::Database)?,
        start_date: row.try_get("start_date").map_err(Error::Database)?,
        due_date: row.try_get("due_date").map_err(Error::Database)?,
        tags: row.try_get("tags").map_err(Error::Database)?,
        pinned: row.try_get("pinned").map_err(Error::Database)?,
        is_favorite: row.try_get("is_favorite").map_err(Error::Database)?,
        priority: priority
            .parse::<Priority>()
            .map_err(|e| Error::Internal(format!("corrupt priority column: {}", e)))?,
        created_at: row.try_get("created_at").map_err(Error::Database)?,
        updated_at: row.try_get("updated_at").map_err(Error::Database)?,
        deleted_at: row.try_get("deleted_at").map_err(Error::Database)?,
    })
}

#[async_trait]
impl NoteStore for PgNoteStore {
    #[instrument(skip(self, record), fields(subsystem = "db", component = "pg_store", op = "insert"))]
    async fn insert(&self, record: NewNoteRecord) -> Result<Note> {
        let note = Note::from_record(Uuid::now_v7(), record);
        let row = sqlx::query(&format!(
            "INSERT INTO note (id, owner_id, title, content, completed, start_date, due_date,
                               tags, pinned, is_favorite, priority, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(note.id)
        .bind(&note.owner_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.completed)
        .bind(note.start_date)
        .bind(note.due_date)
        .bind(&note.tags)
        .bind(note.pinned)
        .bind(note.is_favorite)
        .bind(note.priority.as_str())
        .bind(note.created_at)
        .bind(note.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        // Stored timestamps are rounded to microseconds.
        let stored = map_row_to_note(row)?;
        debug!(note_id = %stored.id, "Inserted note row");
        Ok(stored)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Note>> {
        let row = sqlx::query(&format!("SELECT {} FROM note WHERE id = $1", NOTE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.map(map_row_to_note).transpose()
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM note WHERE owner_id = $1 ORDER BY created_at, id",
            NOTE_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.into_iter().map(map_row_to_note).collect()
    }

    #[instrument(skip(self, patch), fields(subsystem = "db", component = "pg_store", op = "patch", note_id = %id))]
    async fn patch(&self, id: Uuid, patch: NotePatch) -> Result<Option<Note>> {
        let row = sqlx::query(&format!(
            "UPDATE note SET
                completed = COALESCE($2, completed),
                pinned = COALESCE($3, pinned),
                is_favorite = COALESCE($4, is_favorite),
                updated_at = COALESCE($5, updated_at),
                deleted_at = CASE WHEN $6 THEN $7 ELSE deleted_at END
             WHERE id = $1
             RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(id)
        .bind(patch.completed)
        .bind(patch.pinned)
        .bind(patch.is_favorite)
        .bind(patch.updated_at)
        .bind(patch.deleted_at.is_some())
        .bind(patch.deleted_at.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        row.map(map_row_to_note).transpose()
    }

    #[instrument(skip(self, fields), fields(subsystem = "db", component = "pg_store", op = "replace", note_id = %id))]
    async fn replace(
        &self,
        id: Uuid,
        fields: NoteFields,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Note>> {
        let row = sqlx::query(&format!(
            "UPDATE note SET
                title = $2, content = $3, completed = $4, start_date = $5, due_date = $6,
                tags = $7, pinned = $8, is_favorite = $9, priority = $10, updated_at = $11
             WHERE id = $1
             RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(fields.completed)
        .bind(fields.start_date)
        .bind(fields.due_date)
        .bind(&fields.tags)
        .bind(fields.pinned)
        .bind(fields.is_favorite)
        .bind(fields.priority.as_str())
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        row.map(map_row_to_note).transpose()
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "pg_store", op = "delete", note_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
