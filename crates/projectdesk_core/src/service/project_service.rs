//! Project use-case service.
//!
//! # Responsibility
//! - Expose create/get_all/get_by_id/update/delete over any `ProjectStore`.
//! - Reject malformed input before any store call.
//! - Classify failures as validation, not-found or store faults.
//!
//! # Invariants
//! - The service holds no state besides the injected store.
//! - A rejected input never causes a store mutation.
//! - Failures are returned as-is; nothing is retried locally.
//! - Log events carry ids and codes only, never names or descriptions.

use crate::model::patch::Lookup;
use crate::model::project::{
    parse_project_id, NewProject, Project, ProjectChanges, ProjectId, ProjectValidationError,
};
use crate::repo::project_repo::{ProjectStore, StoreError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ProjectServiceError>;

/// Coarse failure class, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input. Retrying unchanged will fail again.
    Validation,
    /// The referenced record does not exist.
    NotFound,
    /// Persistence fault. May be retried at the caller's discretion.
    Store,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Store => "store",
        }
    }
}

/// Typed failure returned by every service operation.
#[derive(Debug)]
pub enum ProjectServiceError {
    Validation(ProjectValidationError),
    NotFound(ProjectId),
    Store(StoreError),
}

impl ProjectServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ProjectValidationError> for ProjectServiceError {
    fn from(value: ProjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ProjectServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Acknowledgment returned by a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteAck {
    pub id: ProjectId,
}

/// Stateless façade over an injected project store.
pub struct ProjectService<S: ProjectStore> {
    store: S,
}

impl<S: ProjectStore> ProjectService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates one project and returns the stored record with its new id.
    ///
    /// # Errors
    /// - `Validation(EmptyName)` for an empty or whitespace-only name.
    /// - `Store` when persistence fails.
    pub fn create(&self, candidate: NewProject) -> ServiceResult<Project> {
        reject_invalid("project_create", candidate.validate())?;

        let project = self
            .store
            .insert(&candidate)
            .map_err(|err| log_failure("project_create", err.into()))?;
        info!(
            "event=project_create module=service status=ok project_id={}",
            project.id
        );
        Ok(project)
    }

    /// Returns every stored project. An empty store yields an empty vector.
    pub fn get_all(&self) -> ServiceResult<Vec<Project>> {
        let projects = self
            .store
            .list_all()
            .map_err(|err| log_failure("project_list", err.into()))?;
        debug!(
            "event=project_list module=service status=ok count={}",
            projects.len()
        );
        Ok(projects)
    }

    /// Looks up one project by its identifier token.
    ///
    /// Absence is reported as `Lookup::NotFound`, not as an error.
    pub fn get_by_id(&self, id: &str) -> ServiceResult<Lookup<Project>> {
        let id = reject_invalid("project_get", parse_project_id(id))?;

        let lookup = self
            .store
            .find_by_id(id)
            .map_err(|err| log_failure("project_get", err.into()))?;
        debug!(
            "event=project_get module=service status=ok project_id={id} found={}",
            lookup.is_found()
        );
        Ok(lookup)
    }

    /// Merges the supplied fields into an existing project.
    ///
    /// # Errors
    /// - `Validation` for a malformed id or an empty replacement name.
    /// - `NotFound` when no project has this id.
    /// - `Store` when persistence fails.
    pub fn update(&self, id: &str, changes: ProjectChanges) -> ServiceResult<Project> {
        let id = reject_invalid("project_update", parse_project_id(id))?;
        reject_invalid("project_update", changes.validate())?;

        let project = self
            .store
            .update_by_id(id, &changes)
            .map_err(|err| log_failure("project_update", err.into()))?;
        info!(
            "event=project_update module=service status=ok project_id={id} name_changed={} description_changed={}",
            changes.name.is_some(),
            !changes.description.is_keep()
        );
        Ok(project)
    }

    /// Permanently removes a project.
    ///
    /// # Errors
    /// - `Validation` for a malformed id.
    /// - `NotFound` when no project has this id, including a repeated delete.
    /// - `Store` when persistence fails.
    pub fn delete(&self, id: &str) -> ServiceResult<DeleteAck> {
        let id = reject_invalid("project_delete", parse_project_id(id))?;

        let removed = self
            .store
            .delete_by_id(id)
            .map_err(|err| log_failure("project_delete", err.into()))?;
        match removed {
            Lookup::Found(_) => {
                info!("event=project_delete module=service status=ok project_id={id}");
                Ok(DeleteAck { id })
            }
            Lookup::NotFound => Err(log_failure(
                "project_delete",
                ProjectServiceError::NotFound(id),
            )),
        }
    }
}

fn reject_invalid<T>(
    event: &str,
    result: Result<T, ProjectValidationError>,
) -> ServiceResult<T> {
    result.map_err(|err| log_failure(event, err.into()))
}

fn log_failure(event: &str, err: ProjectServiceError) -> ProjectServiceError {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::NotFound => warn!(
            "event={event} module=service status=rejected error_code={}",
            err.kind().as_str()
        ),
        ErrorKind::Store => error!(
            "event={event} module=service status=error error_code={} error={}",
            err.kind().as_str(),
            err
        ),
    }
    err
}
