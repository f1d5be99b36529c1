/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: signed, time-bounded session tokens (HS256, 24h TTL)
/// - [`verifier`]: email/password verification against the credential store
///
/// # Security properties
///
/// - Token verification fails closed and never distinguishes the cause
/// - Credential mismatches collapse into one undifferentiated error
/// - Passwords are stored only as salted Argon2id hashes and never logged

pub mod password;
pub mod token;
pub mod verifier;
