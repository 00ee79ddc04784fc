//! Core data models for JHONOTE.
//!
//! These types are shared across all JHONOTE crates and represent the note
//! entity, its inputs, and the derived read models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Title shown for notes stored without one.
pub const UNTITLED: &str = "Sin título";

// =============================================================================
// NOTE TYPES
// =============================================================================

/// Priority level of a note. Wire names follow the stored values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, utoipa::ToSchema,
)]
pub enum Priority {
    #[serde(rename = "alta")]
    High,
    #[default]
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "baja")]
    Low,
}

impl Priority {
    /// Stored/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "alta",
            Priority::Medium => "media",
            Priority::Low => "baja",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alta" => Ok(Priority::High),
            "media" => Ok(Priority::Medium),
            "baja" => Ok(Priority::Low),
            other => Err(Error::Validation(format!("unknown priority '{}'", other))),
        }
    }
}

/// A single note owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Note {
    pub id: Uuid,
    pub owner_id: String,
    pub title: Option<String>,
    pub content: String,
    pub completed: bool,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub pinned: bool,
    pub is_favorite: bool,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set while the note sits in the trash.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Build the persisted form of a record once the store has assigned an id.
    pub fn from_record(id: Uuid, record: NewNoteRecord) -> Self {
        let NewNoteRecord {
            owner_id,
            fields,
            created_at,
        } = record;
        Self {
            id,
            owner_id,
            title: fields.title,
            content: fields.content,
            completed: fields.completed,
            start_date: fields.start_date,
            due_date: fields.due_date,
            tags: fields.tags,
            pinned: fields.pinned,
            is_favorite: fields.is_favorite,
            priority: fields.priority,
            created_at,
            updated_at: created_at,
            deleted_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Title for display, falling back to [`UNTITLED`].
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Current value of a toggleable flag.
    pub fn flag(&self, flag: NoteFlag) -> bool {
        match flag {
            NoteFlag::Completed => self.completed,
            NoteFlag::Pinned => self.pinned,
            NoteFlag::Favorite => self.is_favorite,
        }
    }

    /// Overwrite every mutable field.
    pub fn replace_fields(&mut self, fields: NoteFields, updated_at: DateTime<Utc>) {
        self.title = fields.title;
        self.content = fields.content;
        self.completed = fields.completed;
        self.start_date = fields.start_date;
        self.due_date = fields.due_date;
        self.tags = fields.tags;
        self.pinned = fields.pinned;
        self.is_favorite = fields.is_favorite;
        self.priority = fields.priority;
        self.updated_at = updated_at;
    }
}

/// Input for creating a note. Everything except `content` is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewNote {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub priority: Priority,
}

impl NewNote {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }
}

/// The full set of mutable note fields, replaced together by `update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoteFields {
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub priority: Priority,
}

impl From<&Note> for NoteFields {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            completed: note.completed,
            start_date: note.start_date,
            due_date: note.due_date,
            tags: note.tags.clone(),
            pinned: note.pinned,
            is_favorite: note.is_favorite,
            priority: note.priority,
        }
    }
}

impl From<NewNote> for NoteFields {
    fn from(new: NewNote) -> Self {
        Self {
            title: new.title,
            content: new.content,
            completed: false,
            start_date: new.start_date,
            due_date: new.due_date,
            tags: new.tags,
            pinned: new.pinned,
            is_favorite: new.is_favorite,
            priority: new.priority,
        }
    }
}

/// What the repository hands to a store on creation; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewNoteRecord {
    pub owner_id: String,
    pub fields: NoteFields,
    pub created_at: DateTime<Utc>,
}

/// Boolean fields that can be toggled one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoteFlag {
    Completed,
    Pinned,
    Favorite,
}

impl NoteFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteFlag::Completed => "completed",
            NoteFlag::Pinned => "pinned",
            NoteFlag::Favorite => "favorite",
        }
    }
}

impl FromStr for NoteFlag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" | "complete" => Ok(NoteFlag::Completed),
            "pinned" | "pin" => Ok(NoteFlag::Pinned),
            "favorite" | "is_favorite" => Ok(NoteFlag::Favorite),
            other => Err(Error::NotFound(format!("unknown note flag '{}'", other))),
        }
    }
}

/// Store-level partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub completed: Option<bool>,
    pub pinned: Option<bool>,
    pub is_favorite: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
    /// `Some(None)` clears the deletion timestamp.
    pub deleted_at: Option<Option<DateTime<Utc>>>,
}

impl NotePatch {
    /// Single-flag change that also touches `updated_at`.
    pub fn flag(flag: NoteFlag, value: bool, now: DateTime<Utc>) -> Self {
        let mut patch = Self {
            updated_at: Some(now),
            ..Default::default()
        };
        match flag {
            NoteFlag::Completed => patch.completed = Some(value),
            NoteFlag::Pinned => patch.pinned = Some(value),
            NoteFlag::Favorite => patch.is_favorite = Some(value),
        }
        patch
    }

    /// Move to trash. Leaves `updated_at` alone.
    pub fn trash(now: DateTime<Utc>) -> Self {
        Self {
            deleted_at: Some(Some(now)),
            ..Default::default()
        }
    }

    /// Take out of the trash and touch `updated_at`.
    pub fn restore(now: DateTime<Utc>) -> Self {
        Self {
            updated_at: Some(now),
            deleted_at: Some(None),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, note: &mut Note) {
        if let Some(completed) = self.completed {
            note.completed = completed;
        }
        if let Some(pinned) = self.pinned {
            note.pinned = pinned;
        }
        if let Some(is_favorite) = self.is_favorite {
            note.is_favorite = is_favorite;
        }
        if let Some(updated_at) = self.updated_at {
            note.updated_at = updated_at;
        }
        if let Some(deleted_at) = self.deleted_at {
            note.deleted_at = deleted_at;
        }
    }
}

// =============================================================================
// QUERY TYPES
// =============================================================================

/// Flag-based view filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagFilter {
    #[default]
    All,
    Favorites,
    Pinned,
}

impl FromStr for FlagFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(FlagFilter::All),
            "favorites" => Ok(FlagFilter::Favorites),
            "pinned" => Ok(FlagFilter::Pinned),
            other => Err(Error::Validation(format!("unknown filter '{}'", other))),
        }
    }
}

/// Priority view filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl FromStr for PriorityFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(PriorityFilter::All),
            other => other.parse().map(PriorityFilter::Only),
        }
    }
}

/// Parameters for listing a user's active notes.
#[derive(Debug, Clone, Default)]
pub struct NoteQuery {
    /// Case-insensitive substring over title and content
    pub search: Option<String>,
    pub filter: FlagFilter,
    /// Exact stored tag
    pub tag: Option<String>,
    pub priority: PriorityFilter,
}

// =============================================================================
// READ MODELS
// =============================================================================

/// Aggregate counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoteStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub due_soon: usize,
    pub trashed: usize,
}

/// Notes created on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

/// Everything the home screen needs in one read.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Dashboard {
    pub stats: NoteStats,
    pub favorites: usize,
    /// Completed share of active notes, 0-100
    pub progress: u8,
    /// Last seven days, oldest first
    pub weekly_activity: Vec<DayActivity>,
    pub recent: Vec<Note>,
    pub pinned: Vec<Note>,
}

/// Outcome of a read-then-each bulk operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BulkReport {
    pub attempted: usize,
    pub succeeded: usize,
    /// Items that were already gone when their turn came
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note() -> Note {
        let now = Utc::now();
        Note::from_record(
            Uuid::nil(),
            NewNoteRecord {
                owner_id: "owner-1".to_string(),
                fields: NewNote::new("Buy milk").into(),
                created_at: now,
            },
        )
    }

    #[test]
    fn test_priority_wire_names() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"alta\"");
        assert_eq!(
            serde_json::from_str::<Priority>("\"baja\"").unwrap(),
            Priority::Low
        );
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("Media".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_new_note_defaults_from_json() {
        let new: NewNote = serde_json::from_str(r#"{"content": "hola"}"#).unwrap();
        assert_eq!(new.content, "hola");
        assert!(new.title.is_none());
        assert!(new.tags.is_empty());
        assert!(!new.pinned);
        assert!(!new.is_favorite);
        assert_eq!(new.priority, Priority::Medium);
    }

    #[test]
    fn test_from_record_starts_active_and_untouched() {
        let note = sample_note();
        assert!(note.is_active());
        assert!(!note.completed);
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(note.display_title(), UNTITLED);
    }

    #[test]
    fn test_patch_trash_leaves_updated_at() {
        let mut note = sample_note();
        let before = note.updated_at;
        let later = before + chrono::Duration::minutes(5);
        NotePatch::trash(later).apply_to(&mut note);
        assert_eq!(note.deleted_at, Some(later));
        assert_eq!(note.updated_at, before);
    }

    #[test]
    fn test_patch_restore_clears_and_touches() {
        let mut note = sample_note();
        let later = note.updated_at + chrono::Duration::minutes(5);
        note.deleted_at = Some(note.updated_at);
        NotePatch::restore(later).apply_to(&mut note);
        assert!(note.is_active());
        assert_eq!(note.updated_at, later);
    }

    #[test]
    fn test_patch_flag_sets_single_field() {
        let mut note = sample_note();
        let later = note.updated_at + chrono::Duration::seconds(1);
        NotePatch::flag(NoteFlag::Favorite, true, later).apply_to(&mut note);
        assert!(note.is_favorite);
        assert!(!note.pinned);
        assert!(!note.completed);
        assert_eq!(note.updated_at, later);
    }

    #[test]
    fn test_flag_filter_parsing() {
        assert_eq!("".parse::<FlagFilter>().unwrap(), FlagFilter::All);
        assert_eq!("Pinned".parse::<FlagFilter>().unwrap(), FlagFilter::Pinned);
        assert!("starred".parse::<FlagFilter>().is_err());
    }

    #[test]
    fn test_priority_filter_parsing() {
        assert_eq!("all".parse::<PriorityFilter>().unwrap(), PriorityFilter::All);
        assert_eq!(
            "alta".parse::<PriorityFilter>().unwrap(),
            PriorityFilter::Only(Priority::High)
        );
        assert!("none".parse::<PriorityFilter>().is_err());
    }

    #[test]
    fn test_note_flag_parsing() {
        assert_eq!("pin".parse::<NoteFlag>().unwrap(), NoteFlag::Pinned);
        assert_eq!("favorite".parse::<NoteFlag>().unwrap(), NoteFlag::Favorite);
        assert!("archived".parse::<NoteFlag>().is_err());
    }
}
