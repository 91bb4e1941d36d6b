use projectdesk_core::db::open_db_in_memory;
use projectdesk_core::{
    ErrorKind, FieldPatch, InMemoryProjectStore, Lookup, NewProject, ProjectChanges,
    ProjectService, ProjectStore, SqliteProjectStore,
};

/// Runs a scenario against both the durable and in-memory stores.
fn with_each_store(scenario: impl Fn(&dyn ProjectStore)) {
    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteProjectStore::try_new(&conn).unwrap();
    scenario(&sqlite);

    let memory = InMemoryProjectStore::new();
    scenario(&memory);
}

#[test]
fn create_then_get_by_id_returns_same_fields() {
    with_each_store(|store| {
        let service = ProjectService::new(store);
        let cases = [
            ("Alpha", None),
            ("Beta", Some("")),
            ("  spaced name ", Some("multi\nline")),
            ("ユニコード", Some("説明")),
        ];

        for (name, description) in cases {
            let mut candidate = NewProject::new(name);
            candidate.description = description.map(str::to_string);
            let created = service.create(candidate).unwrap();

            let loaded = service
                .get_by_id(&created.id.to_string())
                .unwrap()
                .into_option()
                .unwrap();
            assert_eq!(loaded.name, name);
            assert_eq!(loaded.description.as_deref(), description);
        }
    });
}

#[test]
fn get_all_counts_created_records() {
    with_each_store(|store| {
        let service = ProjectService::new(store);
        assert!(service.get_all().unwrap().is_empty());

        let mut created_ids = Vec::new();
        for index in 0..4 {
            created_ids.push(service.create(NewProject::new(format!("p{index}"))).unwrap().id);
        }

        let listed = service.get_all().unwrap();
        assert_eq!(listed.len(), created_ids.len());
        assert!(listed.iter().all(|project| created_ids.contains(&project.id)));
    });
}

#[test]
fn renaming_leaves_description_unchanged() {
    with_each_store(|store| {
        let service = ProjectService::new(store);
        let created = service
            .create(NewProject::new("before").with_description("stays"))
            .unwrap();
        let id = created.id.to_string();

        service
            .update(
                &id,
                ProjectChanges {
                    name: Some("after".to_string()),
                    description: FieldPatch::Keep,
                },
            )
            .unwrap();

        let loaded = service.get_by_id(&id).unwrap().into_option().unwrap();
        assert_eq!(loaded.name, "after");
        assert_eq!(loaded.description.as_deref(), Some("stays"));
    });
}

#[test]
fn omitted_description_is_never_cleared() {
    with_each_store(|store| {
        let service = ProjectService::new(store);
        let created = service
            .create(NewProject::new("p").with_description("kept"))
            .unwrap();
        let id = created.id.to_string();

        let updated = service.update(&id, ProjectChanges::default()).unwrap();
        assert_eq!(updated.description.as_deref(), Some("kept"));
        assert_eq!(updated.name, "p");
    });
}

#[test]
fn explicit_clear_removes_description() {
    with_each_store(|store| {
        let service = ProjectService::new(store);
        let created = service
            .create(NewProject::new("p").with_description("gone soon"))
            .unwrap();

        let updated = service
            .update(
                &created.id.to_string(),
                ProjectChanges {
                    name: None,
                    description: FieldPatch::Clear,
                },
            )
            .unwrap();
        assert_eq!(updated.description, None);
    });
}

#[test]
fn updating_missing_record_is_not_found() {
    with_each_store(|store| {
        let service = ProjectService::new(store);
        let missing = uuid::Uuid::new_v4().to_string();

        let err = service
            .update(
                &missing,
                ProjectChanges {
                    name: Some("x".to_string()),
                    description: FieldPatch::Keep,
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    });
}

#[test]
fn delete_then_lookup_is_not_found_and_second_delete_fails() {
    with_each_store(|store| {
        let service = ProjectService::new(store);
        let created = service.create(NewProject::new("short-lived")).unwrap();
        let id = created.id.to_string();

        let ack = service.delete(&id).unwrap();
        assert_eq!(ack.id, created.id);
        assert_eq!(service.get_by_id(&id).unwrap(), Lookup::NotFound);

        let err = service.delete(&id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    });
}

#[test]
fn empty_name_create_is_rejected_and_store_untouched() {
    with_each_store(|store| {
        let service = ProjectService::new(store);

        for name in ["", "   "] {
            let err = service.create(NewProject::new(name)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(store.list_all().unwrap().is_empty());
    });
}

#[test]
fn alpha_lifecycle_scenario() {
    with_each_store(|store| {
        let service = ProjectService::new(store);

        let created = service.create(NewProject::new("Alpha")).unwrap();
        let id = created.id.to_string();
        assert!(!id.is_empty());
        assert_eq!(created.name, "Alpha");
        assert_eq!(created.description, None);

        assert_eq!(service.get_all().unwrap(), vec![created.clone()]);

        service
            .update(
                &id,
                ProjectChanges {
                    name: None,
                    description: FieldPatch::Set("first project".to_string()),
                },
            )
            .unwrap();
        let loaded = service.get_by_id(&id).unwrap().into_option().unwrap();
        assert_eq!(loaded.name, "Alpha");
        assert_eq!(loaded.description.as_deref(), Some("first project"));

        service.delete(&id).unwrap();
        assert_eq!(service.get_by_id(&id).unwrap(), Lookup::NotFound);
    });
}
