//! Read-model tests: listings, statistics, dashboard, tags and calendar.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use jhonote_core::{
    FlagFilter, ManualClock, MemoryNoteStore, NewNote, NoteFlag, NoteQuery, NoteRepository,
    Priority, PriorityFilter,
};

const OWNER: &str = "reader";

fn repo() -> (NoteRepository, Arc<ManualClock>) {
    let store = Arc::new(MemoryNoteStore::new());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 10, 5, 9, 0, 0).unwrap(),
    ));
    (NoteRepository::with_clock(store, clock.clone()), clock)
}

fn today(clock: &ManualClock) -> NaiveDate {
    use jhonote_core::Clock;
    clock.now().date_naive()
}

#[tokio::test]
async fn test_pinned_note_leads_listing() {
    let (repo, clock) = repo();
    let a = repo.create(OWNER, NewNote::new("A").pinned()).await.unwrap();
    clock.advance(Duration::hours(2));
    let b = repo.create(OWNER, NewNote::new("B")).await.unwrap();

    let listed = repo.list_notes(OWNER, &NoteQuery::default()).await.unwrap();
    assert_eq!(
        listed.iter().map(|n| n.id).collect::<Vec<_>>(),
        vec![a.id, b.id]
    );
}

#[tokio::test]
async fn test_list_notes_with_filters() {
    let (repo, clock) = repo();
    repo.create(OWNER, NewNote::new("leche").with_tags(["super"]).favorite())
        .await
        .unwrap();
    clock.advance(Duration::minutes(1));
    let hit = repo
        .create(
            OWNER,
            NewNote::new("Leche de avena")
                .with_tags(["#Super"])
                .with_priority(Priority::High)
                .favorite(),
        )
        .await
        .unwrap();
    repo.create(OWNER, NewNote::new("leche").with_priority(Priority::High))
        .await
        .unwrap();

    let query = NoteQuery {
        search: Some("LECHE".into()),
        filter: FlagFilter::Favorites,
        tag: Some("super".into()),
        priority: PriorityFilter::Only(Priority::High),
    };
    let listed = repo.list_notes(OWNER, &query).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, hit.id);
}

#[tokio::test]
async fn test_due_soon_versus_overdue_in_stats() {
    let (repo, clock) = repo();
    let soon = repo
        .create(OWNER, NewNote::new("soon").with_due_date(today(&clock) + Duration::days(2)))
        .await
        .unwrap();
    let stats = repo.stats(OWNER).await.unwrap();
    assert_eq!(stats.due_soon, 1);

    let mut fields = jhonote_core::NoteFields::from(&soon);
    fields.due_date = Some(today(&clock) - Duration::days(1));
    let late = repo.update(OWNER, soon.id, fields).await.unwrap();

    let stats = repo.stats(OWNER).await.unwrap();
    assert_eq!(stats.due_soon, 0);
    assert_eq!(stats.pending, 1);
    assert!(jhonote_core::is_overdue(&late, jhonote_core::Clock::now(&*clock)));
}

#[tokio::test]
async fn test_stats_invariants_hold() {
    let (repo, clock) = repo();
    for i in 0..5 {
        let note = repo
            .create(
                OWNER,
                NewNote::new(format!("n{i}")).with_due_date(today(&clock) + Duration::days(i)),
            )
            .await
            .unwrap();
        if i % 2 == 0 {
            repo.patch_flag(OWNER, note.id, NoteFlag::Completed, true)
                .await
                .unwrap();
        }
        if i == 4 {
            repo.soft_delete(OWNER, note.id).await.unwrap();
        }
    }

    let stats = repo.stats(OWNER).await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.trashed, 1);
    assert_eq!(stats.total, stats.completed + stats.pending);
    assert!(stats.due_soon <= stats.pending);
}

#[tokio::test]
async fn test_dashboard_summary() {
    let (repo, clock) = repo();
    let first = repo.create(OWNER, NewNote::new("one").favorite()).await.unwrap();
    clock.advance(Duration::minutes(1));
    repo.create(OWNER, NewNote::new("two")).await.unwrap();
    repo.patch_flag(OWNER, first.id, NoteFlag::Completed, true)
        .await
        .unwrap();

    let dash = repo.dashboard(OWNER).await.unwrap();
    assert_eq!(dash.stats.total, 2);
    assert_eq!(dash.favorites, 1);
    assert_eq!(dash.progress, 50);
    assert_eq!(dash.weekly_activity.len(), 7);
    assert_eq!(dash.weekly_activity[6].total, 2);
    assert_eq!(dash.recent.len(), 2);
    assert!(dash.pinned.is_empty());
}

#[tokio::test]
async fn test_tags_catalogue_and_suggestions() {
    let (repo, _) = repo();
    repo.create(OWNER, NewNote::new("a").with_tags(["Trabajo", "casa"]))
        .await
        .unwrap();
    repo.create(OWNER, NewNote::new("b").with_tags(["casa", "tarea"]))
        .await
        .unwrap();
    repo.create("other", NewNote::new("c").with_tags(["secreto"]))
        .await
        .unwrap();

    let tags = repo.tags(OWNER).await.unwrap();
    assert_eq!(tags, vec!["trabajo", "casa", "tarea"]);

    let suggested = repo
        .suggest_tags(OWNER, "ta", &["tarea".to_string()])
        .await
        .unwrap();
    assert!(suggested.is_empty());
    let suggested = repo.suggest_tags(OWNER, "a", &[]).await.unwrap();
    assert_eq!(suggested, vec!["trabajo", "casa", "tarea"]);
}

#[tokio::test]
async fn test_calendar_day() {
    let (repo, clock) = repo();
    let day = today(&clock) + Duration::days(4);
    let due = repo
        .create(OWNER, NewNote::new("entrega").with_due_date(day))
        .await
        .unwrap();
    let starts = repo
        .create(OWNER, NewNote::new("inicio").with_start_date(day))
        .await
        .unwrap();
    let trashed = repo
        .create(OWNER, NewNote::new("borrada").with_due_date(day))
        .await
        .unwrap();
    repo.soft_delete(OWNER, trashed.id).await.unwrap();

    let ids: Vec<_> = repo
        .notes_on(OWNER, day)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&due.id) && ids.contains(&starts.id));
}
