use projectdesk_core::db::open_db_in_memory;
use projectdesk_core::{
    FieldPatch, Lookup, NewProject, ProjectChanges, ProjectStore, SqliteProjectStore, StoreError,
};
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn insert_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteProjectStore::try_new(&conn).unwrap();

    let created = store
        .insert(&NewProject::new("first").with_description("about it"))
        .unwrap();
    assert!(!created.id.is_nil());
    assert_eq!(created.created_at, created.updated_at);

    let loaded = store.find_by_id(created.id).unwrap();
    assert_eq!(loaded, Lookup::Found(created));
}

#[test]
fn insert_keeps_name_exactly_as_supplied() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteProjectStore::try_new(&conn).unwrap();

    let created = store.insert(&NewProject::new("  padded  ")).unwrap();
    let loaded = store.find_by_id(created.id).unwrap().into_option().unwrap();
    assert_eq!(loaded.name, "  padded  ");
    assert_eq!(loaded.description, None);
}

#[test]
fn find_missing_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteProjectStore::try_new(&conn).unwrap();

    assert_eq!(store.find_by_id(Uuid::new_v4()).unwrap(), Lookup::NotFound);
}

#[test]
fn list_all_returns_every_record_with_unique_ids() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteProjectStore::try_new(&conn).unwrap();
    assert!(store.list_all().unwrap().is_empty());

    for index in 0..5 {
        store.insert(&NewProject::new(format!("p{index}"))).unwrap();
    }

    let listed = store.list_all().unwrap();
    assert_eq!(listed.len(), 5);
    let ids: HashSet<_> = listed.iter().map(|project| project.id).collect();
    assert_eq!(ids.len(), 5);
    assert!(listed
        .windows(2)
        .all(|pair| (pair[0].created_at, pair[0].id) <= (pair[1].created_at, pair[1].id)));
}

#[test]
fn update_merges_supplied_fields_only() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteProjectStore::try_new(&conn).unwrap();
    let created = store
        .insert(&NewProject::new("draft").with_description("keep"))
        .unwrap();

    let renamed = store
        .update_by_id(
            created.id,
            &ProjectChanges {
                name: Some("final".to_string()),
                description: FieldPatch::Keep,
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "final");
    assert_eq!(renamed.description.as_deref(), Some("keep"));
    assert_eq!(renamed.created_at, created.created_at);
    assert!(renamed.updated_at >= created.updated_at);

    let described = store
        .update_by_id(
            created.id,
            &ProjectChanges {
                name: None,
                description: FieldPatch::Set("replaced".to_string()),
            },
        )
        .unwrap();
    assert_eq!(described.name, "final");
    assert_eq!(described.description.as_deref(), Some("replaced"));

    let cleared = store
        .update_by_id(
            created.id,
            &ProjectChanges {
                name: None,
                description: FieldPatch::Clear,
            },
        )
        .unwrap();
    assert_eq!(cleared.description, None);
}

#[test]
fn update_missing_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteProjectStore::try_new(&conn).unwrap();

    let id = Uuid::new_v4();
    let err = store
        .update_by_id(
            id,
            &ProjectChanges {
                name: Some("x".to_string()),
                description: FieldPatch::Keep,
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
}

#[test]
fn delete_is_permanent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteProjectStore::try_new(&conn).unwrap();
    let kept = store.insert(&NewProject::new("kept")).unwrap();
    let removed = store.insert(&NewProject::new("removed")).unwrap();

    assert!(store.delete_by_id(removed.id).unwrap().is_found());
    assert_eq!(store.find_by_id(removed.id).unwrap(), Lookup::NotFound);
    assert_eq!(store.delete_by_id(removed.id).unwrap(), Lookup::NotFound);

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 1);
    assert_eq!(store.list_all().unwrap(), vec![kept]);
}
