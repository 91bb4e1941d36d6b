//! Wire shapes for procedure inputs, outputs and failures.
//!
//! # Invariants
//! - Output field names are camelCase and stable.
//! - In `UpdateInput`, a missing `description` keeps the stored value while an
//!   explicit `null` clears it.
//! - `null` is not a stand-in for an omitted key anywhere else: `name` on
//!   update and `description` on create reject it.

use projectdesk_core::{
    DeleteAck, ErrorKind, FieldPatch, Lookup, NewProject, Project, ProjectChanges,
    ProjectServiceError,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Input of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateInput {
    pub name: String,
    #[serde(default, deserialize_with = "present_value")]
    pub description: Option<String>,
}

impl From<CreateInput> for NewProject {
    fn from(input: CreateInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
        }
    }
}

/// Input of `getById` and `delete`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdInput {
    pub id: String,
}

/// Input of `update`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateInput {
    pub id: String,
    #[serde(default, deserialize_with = "present_value")]
    pub name: Option<String>,
    /// Outer `None`: key absent. `Some(None)`: explicit `null`.
    #[serde(default, deserialize_with = "present_value")]
    pub description: Option<Option<String>>,
}

impl UpdateInput {
    /// Splits the input into the target id and the field changes.
    pub fn into_parts(self) -> (String, ProjectChanges) {
        let changes = ProjectChanges {
            name: self.name,
            description: FieldPatch::from(self.description),
        };
        (self.id, changes)
    }
}

/// Wraps a present value in `Some`; absent keys fall back to `default`.
///
/// `null` reaches `T` unchanged, so it only succeeds when `T` accepts it.
fn present_value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Project as rendered to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Project> for ProjectPayload {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.name,
            description: project.description,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Output of `getById`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupPayload {
    Found { project: ProjectPayload },
    NotFound,
}

impl From<Lookup<Project>> for LookupPayload {
    fn from(lookup: Lookup<Project>) -> Self {
        match lookup {
            Lookup::Found(project) => Self::Found {
                project: project.into(),
            },
            Lookup::NotFound => Self::NotFound,
        }
    }
}

/// Output of `delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload {
    pub success: bool,
    pub id: String,
}

impl From<DeleteAck> for DeletePayload {
    fn from(ack: DeleteAck) -> Self {
        Self {
            success: true,
            id: ack.id.to_string(),
        }
    }
}

/// Stable failure signal for callers to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Validation failure or unreadable input.
    BadRequest,
    NotFound,
    /// Store fault; retrying later may succeed.
    ServiceUnavailable,
    /// Unknown procedure name.
    MethodNotFound,
    /// Output could not be rendered.
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::MethodNotFound => "METHOD_NOT_FOUND",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => Self::BadRequest,
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::Store => Self::ServiceUnavailable,
        }
    }
}

/// Failure half of the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureError {
    pub code: ErrorCode,
    pub message: String,
}

impl ProcedureError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Classifies a service failure raised while running `procedure`.
    pub fn from_service(procedure: &str, err: &ProjectServiceError) -> Self {
        Self::new(err.kind().into(), format!("{procedure} failed: {err}"))
    }
}

/// JSON envelope returned by every procedure call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProcedureError>,
}

impl ProcedureResponse {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: ProcedureError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error),
        }
    }

    /// Error code of a failed call, `None` on success.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|error| error.code)
    }
}
