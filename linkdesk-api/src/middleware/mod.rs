/// Middleware modules for the API server
///
/// - `security`: hardening headers on every response
/// - `session`: the session gate (cookie verification and login redirect)

pub mod security;
pub mod session;
