/// Credential verification
///
/// Checks an email/password pair against the [`CredentialStore`] and returns
/// the matching [`Identity`]. Every way the check can be wrong — unknown
/// email, identity without stored credential material, wrong password,
/// unreadable stored hash — collapses into one undifferentiated
/// [`AuthError::InvalidCredentials`], so a caller can never probe which
/// sub-condition failed. Only backend failures are reported separately.
///
/// Each failed attempt emits a `warn` event carrying the email (never the
/// password) for audit purposes.

use std::sync::Arc;

use tracing::warn;

use crate::auth::password;
use crate::store::{CredentialStore, Identity, StoreError};

/// Error type for credential verification
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Bad email or password; the cause is deliberately not distinguished
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Credential store failure
    #[error("credential lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// Validates login credentials against the credential store.
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Verifies an email/password pair.
    ///
    /// Lookup is by exact, case-sensitive email match; the password is
    /// checked against the stored Argon2id hash. The combined check fails
    /// closed: a stored hash that cannot be parsed counts as a mismatch.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let Some(identity) = self.store.find_by_email(email).await? else {
            return Err(self.reject(email));
        };

        let Some(hash) = identity.password_hash.as_deref() else {
            return Err(self.reject(email));
        };

        match password::verify_password(password, hash) {
            Ok(true) => Ok(identity),
            Ok(false) | Err(_) => Err(self.reject(email)),
        }
    }

    /// Re-resolves a session subject against the store.
    ///
    /// Sessions are stateless, so the identity behind a still-valid token may
    /// have been deleted since issuance; callers get `None` in that case.
    pub async fn resolve(&self, id: uuid::Uuid) -> Result<Option<Identity>, AuthError> {
        Ok(self.store.find_by_id(id).await?)
    }

    fn reject(&self, email: &str) -> AuthError {
        // One uniform event for every failure cause.
        warn!(email = %email, "authentication failed");
        AuthError::InvalidCredentials
    }
}
