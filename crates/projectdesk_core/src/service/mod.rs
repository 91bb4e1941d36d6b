//! Use-case services.
//!
//! # Responsibility
//! - Validate procedure inputs and translate them into store calls.
//! - Keep procedure/transport layers decoupled from storage details.

pub mod project_service;
