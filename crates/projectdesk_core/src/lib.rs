//! Core domain logic for projectdesk.
//! Validation, the store contract and the project service live here; transport
//! layers only translate to and from these types.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, ServiceConfig};
pub use logging::{
    default_log_level, init_logging, logging_status, LogLevel, LoggingError, LoggingStatus,
};
pub use model::patch::{FieldPatch, Lookup};
pub use model::project::{
    parse_project_id, NewProject, Project, ProjectChanges, ProjectId, ProjectValidationError,
};
pub use repo::memory_repo::InMemoryProjectStore;
pub use repo::project_repo::{ProjectStore, SqliteProjectStore, StoreError, StoreResult};
pub use service::project_service::{
    DeleteAck, ErrorKind, ProjectService, ProjectServiceError, ServiceResult,
};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
