/// Client resource
///
/// A client account. `type` is free-form (the set of client types is a
/// business decision, not a schema constraint); `portalAccess` defaults to
/// `false` by schema default.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::missing;
use crate::repository::{Resource, ResourceInput, RepositoryError};

/// A stored client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Store-assigned identifier
    pub id: Uuid,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,

    /// Whether the client can sign into the portal
    #[serde(default)]
    pub portal_access: bool,

    /// User reference, unverified by design
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_biz_dev: Option<String>,
}

impl Resource for Client {
    const COLLECTION: &'static str = "clients";
    type Create = CreateClient;
}

/// Input for creating a client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClient {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,

    // Required; checked by hand so the violation reports the wire name
    // "type" rather than the field name.
    #[serde(rename = "type")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,

    /// Defaults to `false` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_access: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_biz_dev: Option<String>,
}

impl ResourceInput for CreateClient {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = match Validate::validate(self) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.kind.as_deref().map_or(true, str::is_empty) {
            errors.add("type", missing());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn into_document(mut self) -> Result<serde_json::Value, RepositoryError> {
        if self.portal_access.is_none() {
            self.portal_access = Some(false);
        }
        serde_json::to_value(&self).map_err(|e| crate::store::StoreError::from(e).into())
    }
}
