//! Durability across reopen and single-owner enforcement.

use super::*;

fn open(dir: &TempDir) -> Result<Database, AppError> {
    let path = dir.path().join("vault");
    Database::new(path.to_str().expect("db path"))
}

#[test]
fn records_survive_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let now = fixed_now();
    let (id, updated_at) = {
        let db = open(&dir).expect("first open");
        let created = db.pastes.create_at(&public_request("durable"), now).expect("create");
        db.pastes.get_at(&created.id, true, now).expect("view");
        db.pastes.get_at(&created.id, true, now).expect("view");
        let updated_at = db
            .pastes
            .update_at(&created.id, "durable v2", now + Duration::seconds(1))
            .expect("update");
        (created.id, updated_at)
    };

    let db = open(&dir).expect("reopen");
    let stored = db.pastes.find(&id).expect("find").expect("exists after reopen");
    assert_eq!(stored.content, "durable v2");
    assert_eq!(stored.views, 2);
    assert_eq!(stored.updated_at, Some(updated_at));
    assert_eq!(db.pastes.list_recent_at(10, now).expect("list").len(), 1);
}

#[test]
fn sequence_continues_after_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let now = fixed_now();
    let first = {
        let db = open(&dir).expect("first open");
        db.pastes.create_at(&public_request("a"), now).expect("create")
    };
    let db = open(&dir).expect("reopen");
    let second = db.pastes.create_at(&public_request("b"), now).expect("create");

    let ids: Vec<String> = db
        .pastes
        .list_recent_at(10, now)
        .expect("list")
        .into_iter()
        .map(|summary| summary.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn second_open_fails_while_first_is_held() {
    let dir = TempDir::new().expect("temp dir");
    let held = open(&dir).expect("first open");
    assert!(held.path().ends_with("vault"));

    let err = open(&dir).err().expect("second open must fail");
    assert!(matches!(err, AppError::StorageMessage(ref message) if message.contains("already in use")));

    drop(held);
    open(&dir).expect("open after release");
}
