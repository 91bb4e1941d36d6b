//! Procedure surface for projectdesk.
//!
//! Maps the five named procedures onto `ProjectService` calls and renders
//! every outcome as a JSON envelope with a stable error code.

pub mod api;
pub mod payload;

pub use api::{Procedure, ProjectRouter};
pub use payload::{
    CreateInput, DeletePayload, ErrorCode, IdInput, LookupPayload, ProcedureError,
    ProcedureResponse, ProjectPayload, UpdateInput,
};
