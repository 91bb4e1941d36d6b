//! Project domain model.
//!
//! # Responsibility
//! - Define the stored `Project` record and the create/update inputs.
//! - Validate input shapes before anything reaches a store.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another project.
//! - `name` is never empty (after trimming) once a record exists.
//! - Names are stored exactly as supplied; trimming is only used to judge
//!   emptiness.

use crate::model::patch::FieldPatch;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MAX_ID_CHARS_IN_ERROR: usize = 64;

/// Stable identifier for a project record.
pub type ProjectId = Uuid;

/// Persisted project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Store-assigned identifier.
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Last write timestamp in epoch milliseconds.
    pub updated_at: i64,
}

/// Candidate record passed to `ProjectStore::insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates create-time constraints.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        validate_name(&self.name)
    }
}

/// Partial field set for `ProjectStore::update_by_id`.
///
/// `name: None` keeps the stored name; a name can never be cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: FieldPatch<String>,
}

impl ProjectChanges {
    /// Returns whether applying these changes would leave every field as-is.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_keep()
    }

    /// Validates update-time constraints.
    ///
    /// # Errors
    /// - `EmptyName` when a supplied `name` is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        match self.name.as_deref() {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }

    /// Merges these changes into `project` in place.
    pub fn apply_to(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        project.description = self.description.apply(project.description.take());
    }
}

/// Input-shape violations. Always the caller's fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    /// `name` is empty or whitespace-only.
    EmptyName,
    /// `id` is empty or whitespace-only.
    EmptyId,
    /// `id` is not a well-formed identifier token.
    MalformedId(String),
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "project name must not be empty"),
            Self::EmptyId => write!(f, "project id must not be empty"),
            Self::MalformedId(raw) => write!(f, "malformed project id `{raw}`"),
        }
    }
}

impl Error for ProjectValidationError {}

/// Checks that a project name has visible content.
pub fn validate_name(name: &str) -> Result<(), ProjectValidationError> {
    if name.trim().is_empty() {
        return Err(ProjectValidationError::EmptyName);
    }
    Ok(())
}

/// Parses a caller-supplied identifier token.
///
/// Surrounding whitespace is ignored. Ids are store-assigned UUIDs, so any
/// other token can never name a record and is rejected as malformed.
pub fn parse_project_id(raw: &str) -> Result<ProjectId, ProjectValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProjectValidationError::EmptyId);
    }

    Uuid::parse_str(trimmed).map_err(|_| {
        ProjectValidationError::MalformedId(trimmed.chars().take(MAX_ID_CHARS_IN_ERROR).collect())
    })
}
