//! Tag normalisation and the per-owner tag catalogue.
//!
//! Stored tags are trimmed, lowercase, carry no leading `#`, and appear at
//! most once per note. First-seen order is kept so the editor shows tags in
//! the order they were typed.

use std::collections::HashSet;

use crate::models::Note;

/// Normalise a single raw tag. Returns `None` when nothing is left.
///
/// ```
/// use jhonote_core::tags::normalize_tag;
///
/// assert_eq!(normalize_tag("  #Clase "), Some("clase".to_string()));
/// assert_eq!(normalize_tag("#"), None);
/// ```
pub fn normalize_tag(raw: &str) -> Option<String> {
    let cleaned = raw.trim().trim_start_matches('#').trim().to_lowercase();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Normalise and deduplicate a list of raw tags.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|t| normalize_tag(t.as_ref()))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Add a raw tag to an already-normalised list. Returns whether it was new.
pub fn add_tag(tags: &mut Vec<String>, raw: &str) -> bool {
    match normalize_tag(raw) {
        Some(tag) if !tags.contains(&tag) => {
            tags.push(tag);
            true
        }
        _ => false,
    }
}

/// Every distinct tag used across `notes`, in first-seen order.
pub fn collect_tags(notes: &[Note]) -> Vec<String> {
    let mut seen = HashSet::new();
    notes
        .iter()
        .flat_map(|n| n.tags.iter())
        .filter(|t| seen.insert(t.as_str()))
        .cloned()
        .collect()
}

/// Known tags containing `input` (case-insensitive) that are not already in
/// `current`.
pub fn suggest_tags(known: &[String], input: &str, current: &[String]) -> Vec<String> {
    let needle = input.trim().trim_start_matches('#').to_lowercase();
    known
        .iter()
        .filter(|t| t.contains(needle.as_str()) && !current.contains(*t))
        .cloned()
        .collect()
}
