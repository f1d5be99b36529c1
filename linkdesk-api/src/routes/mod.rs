/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Session endpoints (login, me)
/// - `resources`: Generic CRUD, nested once per resource root

pub mod auth;
pub mod health;
pub mod resources;
