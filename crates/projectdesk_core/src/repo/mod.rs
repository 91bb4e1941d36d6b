//! Store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the narrow `ProjectStore` contract the service depends on.
//! - Isolate SQL details from the service layer.
//!
//! # Invariants
//! - Store APIs report absence (`NotFound`) separately from transport faults.
//! - Stores never validate names; that happens at the service boundary.

pub mod memory_repo;
pub mod project_repo;

use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time in epoch milliseconds, clamped to zero before the epoch.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
