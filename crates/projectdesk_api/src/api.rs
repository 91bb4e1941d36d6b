//! Project procedures for RPC-style callers.
//!
//! # Responsibility
//! - Expose `create`, `getAll`, `getById`, `update` and `delete` as typed
//!   methods and as a name-based JSON dispatcher.
//! - Map service failures onto stable envelope codes.
//!
//! # Invariants
//! - Dispatch never panics; every outcome becomes a `ProcedureResponse`.
//! - The router owns no state besides the service and its injected store.

use crate::payload::{
    CreateInput, DeletePayload, ErrorCode, IdInput, LookupPayload, ProcedureError,
    ProcedureResponse, ProjectPayload, UpdateInput,
};
use log::{info, warn};
use projectdesk_core::{ProjectService, ProjectStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

type ProcedureResult<T> = Result<T, ProcedureError>;

/// The five callable procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    Create,
    GetAll,
    GetById,
    Update,
    Delete,
}

impl Procedure {
    pub const ALL: [Procedure; 5] = [
        Self::Create,
        Self::GetAll,
        Self::GetById,
        Self::Update,
        Self::Delete,
    ];

    /// Wire name of the procedure.
    pub fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::GetAll => "getAll",
            Self::GetById => "getById",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|procedure| procedure.name() == name.trim())
    }
}

/// Procedure router over a project service.
pub struct ProjectRouter<S: ProjectStore> {
    service: ProjectService<S>,
}

impl<S: ProjectStore> ProjectRouter<S> {
    pub fn new(service: ProjectService<S>) -> Self {
        Self { service }
    }

    /// Builds a router with a fresh service over `store`.
    pub fn from_store(store: S) -> Self {
        Self::new(ProjectService::new(store))
    }

    /// Creates a project; returns the stored record.
    pub fn create(&self, input: CreateInput) -> ProcedureResult<ProjectPayload> {
        self.service
            .create(input.into())
            .map(ProjectPayload::from)
            .map_err(|err| ProcedureError::from_service(Procedure::Create.name(), &err))
    }

    /// Lists every project.
    pub fn get_all(&self) -> ProcedureResult<Vec<ProjectPayload>> {
        self.service
            .get_all()
            .map(|projects| projects.into_iter().map(ProjectPayload::from).collect())
            .map_err(|err| ProcedureError::from_service(Procedure::GetAll.name(), &err))
    }

    /// Fetches one project; absence is a successful `not_found` payload.
    pub fn get_by_id(&self, input: IdInput) -> ProcedureResult<LookupPayload> {
        self.service
            .get_by_id(&input.id)
            .map(LookupPayload::from)
            .map_err(|err| ProcedureError::from_service(Procedure::GetById.name(), &err))
    }

    /// Applies a partial update; returns the updated record.
    pub fn update(&self, input: UpdateInput) -> ProcedureResult<ProjectPayload> {
        let (id, changes) = input.into_parts();
        self.service
            .update(&id, changes)
            .map(ProjectPayload::from)
            .map_err(|err| ProcedureError::from_service(Procedure::Update.name(), &err))
    }

    /// Deletes a project; a missing id is `NOT_FOUND`.
    pub fn delete(&self, input: IdInput) -> ProcedureResult<DeletePayload> {
        self.service
            .delete(&input.id)
            .map(DeletePayload::from)
            .map_err(|err| ProcedureError::from_service(Procedure::Delete.name(), &err))
    }

    /// Dispatches a procedure by wire name with a JSON input value.
    ///
    /// `getAll` ignores its input. Other procedures reject inputs that do not
    /// match their schema with `BAD_REQUEST`.
    pub fn call(&self, procedure: &str, input: Value) -> ProcedureResponse {
        let started_at = Instant::now();
        let Some(resolved) = Procedure::from_name(procedure) else {
            warn!("event=procedure_call module=api status=rejected error_code=METHOD_NOT_FOUND");
            return ProcedureResponse::failure(ProcedureError::new(
                ErrorCode::MethodNotFound,
                format!("unknown procedure `{}`", procedure.trim()),
            ));
        };

        let result = match resolved {
            Procedure::Create => parse_input(resolved, input)
                .and_then(|input| self.create(input))
                .and_then(render),
            Procedure::GetAll => self.get_all().and_then(render),
            Procedure::GetById => parse_input(resolved, input)
                .and_then(|input| self.get_by_id(input))
                .and_then(render),
            Procedure::Update => parse_input(resolved, input)
                .and_then(|input| self.update(input))
                .and_then(render),
            Procedure::Delete => parse_input(resolved, input)
                .and_then(|input| self.delete(input))
                .and_then(render),
        };

        let duration_ms = started_at.elapsed().as_millis();
        match result {
            Ok(data) => {
                info!(
                    "event=procedure_call module=api procedure={} status=ok duration_ms={duration_ms}",
                    resolved.name()
                );
                ProcedureResponse::success(data)
            }
            Err(error) => {
                warn!(
                    "event=procedure_call module=api procedure={} status=error duration_ms={duration_ms} error_code={}",
                    resolved.name(),
                    error.code.as_str()
                );
                ProcedureResponse::failure(error)
            }
        }
    }

    /// Like `call`, taking the input as JSON text. Blank text means no input.
    pub fn call_json(&self, procedure: &str, raw_input: &str) -> ProcedureResponse {
        let trimmed = raw_input.trim();
        if trimmed.is_empty() {
            return self.call(procedure, Value::Null);
        }

        match serde_json::from_str(trimmed) {
            Ok(input) => self.call(procedure, input),
            Err(err) => ProcedureResponse::failure(ProcedureError::new(
                ErrorCode::BadRequest,
                format!("input is not valid JSON: {err}"),
            )),
        }
    }
}

fn parse_input<T: DeserializeOwned>(procedure: Procedure, input: Value) -> ProcedureResult<T> {
    serde_json::from_value(input).map_err(|err| {
        ProcedureError::new(
            ErrorCode::BadRequest,
            format!("invalid input for `{}`: {err}", procedure.name()),
        )
    })
}

fn render<T: Serialize>(output: T) -> ProcedureResult<Value> {
    serde_json::to_value(output).map_err(|err| {
        ProcedureError::new(
            ErrorCode::InternalServerError,
            format!("failed to render output: {err}"),
        )
    })
}
