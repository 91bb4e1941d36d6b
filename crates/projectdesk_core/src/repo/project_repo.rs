//! Project store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the insert/list/find/update/delete contract over `projects`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `insert` assigns a fresh UUID v4 and writes in a single statement.
//! - `update_by_id` and `delete_by_id` return `NotFound` for absent ids.
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::patch::{FieldPatch, Lookup};
use crate::model::project::{NewProject, Project, ProjectChanges, ProjectId};
use crate::repo::now_epoch_ms;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    created_at,
    updated_at
FROM projects";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence-layer failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// No live record carries this id.
    NotFound(ProjectId),
    /// A persisted row could not be mapped back into a `Project`.
    InvalidData(String),
    /// The store cannot serve requests right now.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted project data: {message}"),
            Self::Unavailable(message) => write!(f, "project store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable record keeper for projects.
///
/// Implementations own atomicity of each single-record operation. Callers get
/// no cross-operation isolation.
pub trait ProjectStore {
    /// Assigns an id, persists the candidate and returns the stored form.
    fn insert(&self, candidate: &NewProject) -> StoreResult<Project>;
    /// Returns a snapshot of every record, ordered by `created_at, id`.
    fn list_all(&self) -> StoreResult<Vec<Project>>;
    /// Point lookup by id.
    fn find_by_id(&self, id: ProjectId) -> StoreResult<Lookup<Project>>;
    /// Merges `changes` into the record and returns the result.
    fn update_by_id(&self, id: ProjectId, changes: &ProjectChanges) -> StoreResult<Project>;
    /// Removes the record, returning it when it existed.
    fn delete_by_id(&self, id: ProjectId) -> StoreResult<Lookup<Project>>;
}

impl<S: ProjectStore + ?Sized> ProjectStore for &S {
    fn insert(&self, candidate: &NewProject) -> StoreResult<Project> {
        (**self).insert(candidate)
    }

    fn list_all(&self) -> StoreResult<Vec<Project>> {
        (**self).list_all()
    }

    fn find_by_id(&self, id: ProjectId) -> StoreResult<Lookup<Project>> {
        (**self).find_by_id(id)
    }

    fn update_by_id(&self, id: ProjectId, changes: &ProjectChanges) -> StoreResult<Project> {
        (**self).update_by_id(id, changes)
    }

    fn delete_by_id(&self, id: ProjectId) -> StoreResult<Lookup<Project>> {
        (**self).delete_by_id(id)
    }
}

/// SQLite-backed project store.
pub struct SqliteProjectStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `InvalidData` when the connection's schema is not at the latest
    ///   version (for example a raw `Connection::open` handle).
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if version != latest_version() {
            return Err(StoreError::InvalidData(format!(
                "connection schema version {version} does not match expected {}",
                latest_version()
            )));
        }
        Ok(Self { conn })
    }

    fn select_one(conn: &Connection, id: ProjectId) -> StoreResult<Option<Project>> {
        let mut stmt = conn.prepare_cached(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let raw = stmt
            .query_row([id.to_string()], read_raw_row)
            .optional()?;
        raw.map(RawProjectRow::into_project).transpose()
    }
}

impl ProjectStore for SqliteProjectStore<'_> {
    fn insert(&self, candidate: &NewProject) -> StoreResult<Project> {
        let now = now_epoch_ms();
        let project = Project {
            id: Uuid::new_v4(),
            name: candidate.name.clone(),
            description: candidate.description.clone(),
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            "INSERT INTO projects (
                id,
                name,
                description,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                project.id.to_string(),
                project.name.as_str(),
                project.description.as_deref(),
                project.created_at,
                project.updated_at,
            ],
        )?;

        Ok(project)
    }

    fn list_all(&self) -> StoreResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{PROJECT_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let rows = stmt.query_map([], read_raw_row)?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(row?.into_project()?);
        }
        Ok(projects)
    }

    fn find_by_id(&self, id: ProjectId) -> StoreResult<Lookup<Project>> {
        Ok(Self::select_one(self.conn, id)?.into())
    }

    fn update_by_id(&self, id: ProjectId, changes: &ProjectChanges) -> StoreResult<Project> {
        let mut assignments = vec!["updated_at = MAX(updated_at, ?)"];
        let mut bind_values: Vec<Value> = vec![Value::Integer(now_epoch_ms())];

        if let Some(name) = &changes.name {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }

        match changes.description.as_ref() {
            FieldPatch::Keep => {}
            FieldPatch::Set(description) => {
                assignments.push("description = ?");
                bind_values.push(Value::Text(description.clone()));
            }
            FieldPatch::Clear => {
                assignments.push("description = ?");
                bind_values.push(Value::Null);
            }
        }

        bind_values.push(Value::Text(id.to_string()));
        let sql = format!("UPDATE projects SET {} WHERE id = ?;", assignments.join(", "));

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        let updated = Self::select_one(&tx, id)?.ok_or(StoreError::NotFound(id))?;
        tx.commit()?;

        Ok(updated)
    }

    fn delete_by_id(&self, id: ProjectId) -> StoreResult<Lookup<Project>> {
        let tx = self.conn.unchecked_transaction()?;
        let Some(existing) = Self::select_one(&tx, id)? else {
            return Ok(Lookup::NotFound);
        };
        tx.execute("DELETE FROM projects WHERE id = ?1;", [id.to_string()])?;
        tx.commit()?;

        Ok(Lookup::Found(existing))
    }
}

/// Column values as read, before domain parsing.
struct RawProjectRow {
    id: String,
    name: String,
    description: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl RawProjectRow {
    fn into_project(self) -> StoreResult<Project> {
        let id = Uuid::parse_str(&self.id).map_err(|_| {
            StoreError::InvalidData(format!("invalid id value `{}` in projects.id", self.id))
        })?;

        Ok(Project {
            id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawProjectRow> {
    Ok(RawProjectRow {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
