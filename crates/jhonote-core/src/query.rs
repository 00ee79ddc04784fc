//! Query engine over one owner's notes.
//!
//! Everything here is a pure function of an in-memory snapshot: no I/O, no
//! shared state. Sorting is stable, so notes that tie on the sort key keep
//! the order the store returned them in.

use std::cmp::Reverse;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{
    Dashboard, DayActivity, FlagFilter, Note, NoteQuery, NoteStats, PriorityFilter,
};
use crate::temporal::is_due_soon;

/// Number of notes shown in the dashboard's recent and pinned strips.
pub const DASHBOARD_STRIP_LEN: usize = 3;

/// Days covered by the dashboard activity chart.
pub const ACTIVITY_DAYS: i64 = 7;

// =============================================================================
// ACTIVE / TRASH
// =============================================================================

/// Sort in place: pinned first, then most recently updated.
pub fn sort_by_pin_then_recency(notes: &mut [Note]) {
    notes.sort_by_key(|n| (Reverse(n.pinned), Reverse(n.updated_at)));
}

/// Active notes, pinned first then by `updated_at` descending.
pub fn active_notes(all: &[Note]) -> Vec<Note> {
    let mut notes: Vec<Note> = all.iter().filter(|n| n.is_active()).cloned().collect();
    sort_by_pin_then_recency(&mut notes);
    notes
}

/// Trashed notes, most recently deleted first.
pub fn trashed_notes(all: &[Note]) -> Vec<Note> {
    let mut notes: Vec<Note> = all.iter().filter(|n| n.is_trashed()).cloned().collect();
    notes.sort_by_key(|n| Reverse(n.deleted_at));
    notes
}

// =============================================================================
// FILTERS
// =============================================================================

/// Case-insensitive substring match on title or content. An empty or absent
/// term returns the input unchanged.
pub fn search(mut notes: Vec<Note>, term: Option<&str>) -> Vec<Note> {
    let term = match term {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return notes,
    };
    notes.retain(|n| {
        n.title
            .as_deref()
            .is_some_and(|title| title.to_lowercase().contains(&term))
            || n.content.to_lowercase().contains(&term)
    });
    notes
}

pub fn filter_by_flag(mut notes: Vec<Note>, filter: FlagFilter) -> Vec<Note> {
    match filter {
        FlagFilter::All => {}
        FlagFilter::Favorites => notes.retain(|n| n.is_favorite),
        FlagFilter::Pinned => notes.retain(|n| n.pinned),
    }
    notes
}

/// Exact, case-sensitive match against stored tags.
pub fn filter_by_tag(mut notes: Vec<Note>, tag: &str) -> Vec<Note> {
    notes.retain(|n| n.has_tag(tag));
    notes
}

pub fn filter_by_priority(mut notes: Vec<Note>, priority: PriorityFilter) -> Vec<Note> {
    if let PriorityFilter::Only(p) = priority {
        notes.retain(|n| n.priority == p);
    }
    notes
}

/// The listing pipeline: active → flag → tag → priority → sort → search.
pub fn apply_query(all: &[Note], query: &NoteQuery) -> Vec<Note> {
    let mut notes: Vec<Note> = all.iter().filter(|n| n.is_active()).cloned().collect();
    notes = filter_by_flag(notes, query.filter);
    if let Some(tag) = query.tag.as_deref() {
        notes = filter_by_tag(notes, tag);
    }
    notes = filter_by_priority(notes, query.priority);
    sort_by_pin_then_recency(&mut notes);
    search(notes, query.search.as_deref())
}

// =============================================================================
// AGGREGATES
// =============================================================================

/// Dashboard counters. Only active entries of `notes` are counted.
pub fn compute_stats(notes: &[Note], trashed: &[Note], now: DateTime<Utc>) -> NoteStats {
    let active: Vec<&Note> = notes.iter().filter(|n| n.is_active()).collect();
    let completed = active.iter().filter(|n| n.completed).count();
    NoteStats {
        total: active.len(),
        completed,
        pending: active.len() - completed,
        due_soon: active.iter().filter(|n| is_due_soon(n, now)).count(),
        trashed: trashed.len(),
    }
}

/// Split into (pending, completed), preserving order.
pub fn split_by_completion(notes: &[Note]) -> (Vec<Note>, Vec<Note>) {
    notes.iter().cloned().partition(|n| !n.completed)
}

pub fn count_favorites(notes: &[Note]) -> usize {
    notes.iter().filter(|n| n.is_favorite).count()
}

/// Notes starting or due on `date`.
pub fn notes_on(notes: &[Note], date: NaiveDate) -> Vec<Note> {
    notes
        .iter()
        .filter(|n| n.due_date == Some(date) || n.start_date == Some(date))
        .cloned()
        .collect()
}

/// Rounded completion percentage; 0 for an empty set.
pub fn completion_progress(stats: &NoteStats) -> u8 {
    if stats.total == 0 {
        return 0;
    }
    let pct = (stats.completed as f64 / stats.total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Notes created on each of the last seven UTC days, oldest first.
pub fn weekly_activity(notes: &[Note], today: NaiveDate) -> Vec<DayActivity> {
    (0..ACTIVITY_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let (total, completed) = notes
                .iter()
                .filter(|n| n.created_at.date_naive() == date)
                .fold((0, 0), |(t, c), n| (t + 1, c + usize::from(n.completed)));
            DayActivity {
                date,
                total,
                pending: total - completed,
                completed,
            }
        })
        .collect()
}

/// Home screen read model. `active` is expected in listing order.
pub fn dashboard(active: &[Note], trashed: &[Note], now: DateTime<Utc>) -> Dashboard {
    let stats = compute_stats(active, trashed, now);
    Dashboard {
        stats,
        favorites: count_favorites(active),
        progress: completion_progress(&stats),
        weekly_activity: weekly_activity(active, now.date_naive()),
        recent: active.iter().take(DASHBOARD_STRIP_LEN).cloned().collect(),
        pinned: active
            .iter()
            .filter(|n| n.pinned)
            .take(DASHBOARD_STRIP_LEN)
            .cloned()
            .collect(),
    }
}
