/// Resource models
///
/// The four record variants sharing the generic CRUD contract, each a typed
/// struct with a closed field set (no open maps, no runtime casts):
///
/// - `client`: client accounts
/// - `prospect`: sales prospects
/// - `task`: project tasks
/// - `user`: back-office users (doubles as the identity record for login)
///
/// Every variant pairs the stored record with a `Create*` input struct that
/// derives `validator::Validate` and reports the complete set of violations
/// in a single pass. Wire representation is camelCase throughout.

pub mod client;
pub mod prospect;
pub mod task;
pub mod user;

pub use client::{Client, CreateClient};
pub use prospect::{CreateProspect, Prospect};
pub use task::{CreateTask, Task};
pub use user::{CreateUser, User};

use validator::ValidationError;

/// Violation for a field whose value is outside its enumerated set.
pub(crate) fn one_of(allowed: &[&str]) -> ValidationError {
    let mut error = ValidationError::new("one_of");
    error.message = Some(format!("must be one of: {}", allowed.join(", ")).into());
    error
}

/// Violation for a missing required field (used where the derive macro's
/// field naming does not match the wire name).
pub(crate) fn missing() -> ValidationError {
    let mut error = ValidationError::new("required");
    error.message = Some("this field is required".into());
    error
}

/// Violation for a date field that is not `YYYY-MM-DD`.
pub(crate) fn invalid_date() -> ValidationError {
    let mut error = ValidationError::new("date");
    error.message = Some("must be a date in YYYY-MM-DD format".into());
    error
}
