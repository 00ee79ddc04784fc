//! Due-date predicates.
//!
//! Calendar dates are compared with "now" as midnight UTC of that date.
//! Due-soon and overdue are independent predicates with different operators
//! and are never folded into a single status.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::models::Note;

/// Width of the due-soon window, inclusive on both ends.
pub const DUE_SOON_WINDOW_DAYS: i64 = 3;

/// Instant a calendar date refers to when compared with a timestamp.
pub fn date_to_instant(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

/// `now <= due <= now + 3 days`, for active, incomplete notes with a due date.
pub fn is_due_soon(note: &Note, now: DateTime<Utc>) -> bool {
    if !note.is_active() || note.completed {
        return false;
    }
    match note.due_date {
        Some(date) => {
            let due = date_to_instant(date);
            due >= now && due <= now + Duration::days(DUE_SOON_WINDOW_DAYS)
        }
        None => false,
    }
}

/// `due < now`. Display-only; not part of the statistics.
pub fn is_overdue(note: &Note, now: DateTime<Utc>) -> bool {
    note.due_date
        .map(|date| date_to_instant(date) < now)
        .unwrap_or(false)
}
