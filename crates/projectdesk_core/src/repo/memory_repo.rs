//! In-memory project store.
//!
//! Substitutable for `SqliteProjectStore` in tests and ephemeral runs. Every
//! operation holds the map lock for its whole duration, which gives the same
//! single-record atomicity the SQLite store provides.

use crate::model::patch::Lookup;
use crate::model::project::{NewProject, Project, ProjectChanges, ProjectId};
use crate::repo::now_epoch_ms;
use crate::repo::project_repo::{ProjectStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Mutex-guarded map of live projects.
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    records: Mutex<HashMap<ProjectId, Project>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<ProjectId, Project>>> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn insert(&self, candidate: &NewProject) -> StoreResult<Project> {
        let mut records = self.lock()?;

        let mut id = Uuid::new_v4();
        while records.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let now = now_epoch_ms();
        let project = Project {
            id,
            name: candidate.name.clone(),
            description: candidate.description.clone(),
            created_at: now,
            updated_at: now,
        };
        records.insert(id, project.clone());
        Ok(project)
    }

    fn list_all(&self) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> = self.lock()?.values().cloned().collect();
        projects.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(projects)
    }

    fn find_by_id(&self, id: ProjectId) -> StoreResult<Lookup<Project>> {
        Ok(self.lock()?.get(&id).cloned().into())
    }

    fn update_by_id(&self, id: ProjectId, changes: &ProjectChanges) -> StoreResult<Project> {
        let mut records = self.lock()?;
        let project = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        changes.clone().apply_to(project);
        project.updated_at = now_epoch_ms().max(project.updated_at);
        Ok(project.clone())
    }

    fn delete_by_id(&self, id: ProjectId) -> StoreResult<Lookup<Project>> {
        Ok(self.lock()?.remove(&id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryProjectStore;
    use crate::model::patch::{FieldPatch, Lookup};
    use crate::model::project::{NewProject, ProjectChanges};
    use crate::repo::project_repo::{ProjectStore, StoreError};
    use crate::service::project_service::ProjectService;
    use std::collections::HashSet;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::thread;
    use uuid::Uuid;

    #[test]
    fn insert_assigns_distinct_ids() {
        let store = InMemoryProjectStore::new();
        let first = store.insert(&NewProject::new("a")).unwrap();
        let second = store.insert(&NewProject::new("b")).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn update_merges_and_reports_missing() {
        let store = InMemoryProjectStore::new();
        let created = store
            .insert(&NewProject::new("a").with_description("keep me"))
            .unwrap();

        let updated = store
            .update_by_id(
                created.id,
                &ProjectChanges {
                    name: Some("b".to_string()),
                    description: FieldPatch::Keep,
                },
            )
            .unwrap();
        assert_eq!(updated.name, "b");
        assert_eq!(updated.description.as_deref(), Some("keep me"));

        let err = store
            .update_by_id(Uuid::new_v4(), &ProjectChanges::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn delete_removes_record() {
        let store = InMemoryProjectStore::new();
        let created = store.insert(&NewProject::new("a")).unwrap();

        assert!(store.delete_by_id(created.id).unwrap().is_found());
        assert_eq!(store.find_by_id(created.id).unwrap(), Lookup::NotFound);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn poisoned_lock_reports_unavailable() {
        let store = InMemoryProjectStore::new();
        store.insert(&NewProject::new("before")).unwrap();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _guard = store.records.lock().unwrap();
            panic!("writer died while holding the lock");
        }));
        assert!(outcome.is_err());
        assert!(store.records.is_poisoned());

        assert!(matches!(store.list_all(), Err(StoreError::Unavailable(_))));
        assert!(matches!(
            store.insert(&NewProject::new("after")),
            Err(StoreError::Unavailable(_))
        ));
    }

    #[test]
    fn concurrent_creates_through_a_shared_service_keep_every_record() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 50;

        let store = InMemoryProjectStore::new();
        let service = ProjectService::new(&store);

        let ids: Vec<Uuid> = thread::scope(|scope| {
            let workers: Vec<_> = (0..THREADS)
                .map(|worker| {
                    let service = &service;
                    scope.spawn(move || {
                        (0..PER_THREAD)
                            .map(|n| {
                                service
                                    .create(NewProject::new(format!("w{worker}-{n}")))
                                    .unwrap()
                                    .id
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers
                .into_iter()
                .flat_map(|worker| worker.join().unwrap())
                .collect()
        });

        let distinct: HashSet<Uuid> = ids.iter().copied().collect();
        assert_eq!(ids.len(), THREADS * PER_THREAD);
        assert_eq!(distinct.len(), THREADS * PER_THREAD);
        assert_eq!(store.len().unwrap(), THREADS * PER_THREAD);
        assert_eq!(service.get_all().unwrap().len(), THREADS * PER_THREAD);
    }
}
