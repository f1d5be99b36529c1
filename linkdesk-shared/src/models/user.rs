/// User resource
///
/// A back-office user. This collection doubles as the credential store: an
/// optional write-only `password` accepted at creation is hashed with
/// Argon2id before persistence. The stored hash never appears in any
/// response — the `User` record simply has no field for it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::auth::password;
use crate::repository::{Resource, ResourceInput, RepositoryError};
use crate::store::StoreError;

/// A stored user, as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier
    pub id: Uuid,

    pub name: String,

    pub email: String,

    pub role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Resource for User {
    const COLLECTION: &'static str = "users";
    type Create = CreateUser;
}

/// Input for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "email is required"),
        email(message = "email must be a valid address")
    )]
    pub email: Option<String>,

    #[validate(required(message = "role is required"))]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Write-only; hashed before persistence. A user created without one
    /// cannot log in until a password is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
}

impl ResourceInput for CreateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validate::validate(self)
    }

    fn into_document(mut self) -> Result<serde_json::Value, RepositoryError> {
        if let Some(plain) = self.password.take() {
            let hash = password::hash_password(&plain)
                .map_err(|e| StoreError::Backend(format!("password hashing failed: {}", e)))?;
            self.password = Some(hash);
        }
        serde_json::to_value(&self).map_err(|e| StoreError::from(e).into())
    }
}
