//! PostgreSQL note store tests.
//!
//! These need a migrated database at `DATABASE_URL` and are ignored by
//! default. Run with `cargo test -p jhonote-db -- --ignored`.

use chrono::{NaiveDate, TimeZone, Utc};
use jhonote_core::{NewNote, NewNoteRecord, NoteFields, NoteFlag, NoteQuery, NoteStore, Priority};
use jhonote_db::test_fixtures::TestDatabase;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_create_and_fetch_round_trip() {
    let _ = dotenvy::dotenv();
    let test_db = TestDatabase::new().await;
    let repo = test_db.repository();

    let due = NaiveDate::from_ymd_opt(2026, 11, 3).unwrap();
    let created = repo
        .create(
            &test_db.owner_id,
            NewNote::new("Buy milk")
                .with_tags(["#Super", "super", "casa"])
                .with_priority(Priority::Low)
                .with_due_date(due),
        )
        .await
        .unwrap();

    let fetched = repo.get(&test_db.owner_id, created.id).await.unwrap();
    assert!(fetched.title.is_none());
    assert_eq!(fetched.tags, vec!["super", "casa"]);
    assert_eq!(fetched.priority, Priority::Low);
    assert_eq!(fetched.due_date, Some(due));
    assert!(fetched.deleted_at.is_none());
    assert_eq!(fetched.created_at, created.created_at);
    assert_eq!(fetched.updated_at, created.updated_at);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_patch_and_replace() {
    let _ = dotenvy::dotenv();
    let test_db = TestDatabase::new().await;
    let repo = test_db.repository();
    let owner = &test_db.owner_id;

    let note = repo.create(owner, NewNote::new("draft")).await.unwrap();
    let pinned = repo
        .patch_flag(owner, note.id, NoteFlag::Pinned, true)
        .await
        .unwrap();
    assert!(pinned.pinned);
    assert!(!pinned.completed);

    let mut fields = NoteFields::from(&pinned);
    fields.content = "final".into();
    fields.title = Some("Plan".into());
    let updated = repo.update(owner, note.id, fields).await.unwrap();
    assert_eq!(updated.content, "final");
    assert_eq!(updated.title.as_deref(), Some("Plan"));
    assert!(updated.pinned);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_trash_lifecycle() {
    let _ = dotenvy::dotenv();
    let test_db = TestDatabase::new().await;
    let repo = test_db.repository();
    let owner = &test_db.owner_id;

    let a = repo.create(owner, NewNote::new("a")).await.unwrap();
    let b = repo.create(owner, NewNote::new("b")).await.unwrap();
    repo.soft_delete(owner, a.id).await.unwrap();
    repo.soft_delete(owner, b.id).await.unwrap();
    repo.restore(owner, b.id).await.unwrap();

    let trash = repo.list_trash(owner).await.unwrap();
    assert_eq!(trash.len(), 1);
    assert_eq!(trash[0].id, a.id);

    let report = repo.purge_all_trashed(owner).await.unwrap();
    assert_eq!(report.succeeded, 1);
    let again = repo.purge_all_trashed(owner).await.unwrap();
    assert_eq!(again.attempted, 0);

    let active = repo.list_notes(owner, &NoteQuery::default()).await.unwrap();
    assert_eq!(active.len(), 1);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_missing_rows() {
    let _ = dotenvy::dotenv();
    let test_db = TestDatabase::new().await;
    let store = &test_db.db.notes;
    let id = Uuid::now_v7();

    assert!(store.fetch(id).await.unwrap().is_none());
    assert!(!store.delete(id).await.unwrap());
    assert!(store
        .replace(id, NoteFields::from(NewNote::new("x")), chrono::Utc::now())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_insert_returns_stored_timestamps() {
    let _ = dotenvy::dotenv();
    let test_db = TestDatabase::new().await;
    let store = &test_db.db.notes;
    let created_at = Utc.timestamp_opt(1_790_000_000, 123_456_789).unwrap();

    let inserted = store
        .insert(NewNoteRecord {
            owner_id: test_db.owner_id.clone(),
            fields: NewNote::new("precise").into(),
            created_at,
        })
        .await
        .unwrap();
    assert_eq!(inserted.created_at.timestamp_subsec_nanos(), 123_456_000);

    let fetched = store.fetch(inserted.id).await.unwrap().unwrap();
    assert_eq!(fetched, inserted);

    test_db.cleanup().await;
}
