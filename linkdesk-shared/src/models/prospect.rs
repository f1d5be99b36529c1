/// Prospect resource
///
/// A sales prospect working its way through the pipeline. Status starts at
/// `"New"` by schema default when the caller does not supply one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::one_of;
use crate::repository::{Resource, ResourceInput, RepositoryError};

/// Allowed pipeline statuses.
pub const STATUSES: &[&str] = &["New", "Contacted", "Qualified", "Won", "Lost"];

/// Schema-declared default status for new prospects.
pub const DEFAULT_STATUS: &str = "New";

/// A stored prospect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    /// Store-assigned identifier
    pub id: Uuid,

    pub name: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub status: String,

    /// User reference, unverified by design
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Resource for Prospect {
    const COLLECTION: &'static str = "prospects";
    type Create = CreateProspect;
}

/// Input for creating a prospect.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProspect {
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

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Defaults to [`DEFAULT_STATUS`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl ResourceInput for CreateProspect {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = match Validate::validate(self) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(status) = self.status.as_deref() {
            if !STATUSES.contains(&status) {
                errors.add("status", one_of(STATUSES));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn into_document(mut self) -> Result<serde_json::Value, RepositoryError> {
        if self.status.is_none() {
            self.status = Some(DEFAULT_STATUS.to_string());
        }
        serde_json::to_value(&self).map_err(|e| crate::store::StoreError::from(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CreateProspect {
        CreateProspect {
            name: Some("Jordan Vale".to_string()),
            email: Some("jordan@example.com".to_string()),
            phone: None,
            status: None,
            assigned_to: None,
        }
    }

    #[test]
    fn status_defaults_to_new() {
        let body = valid_input().into_document().unwrap();
        assert_eq!(body["status"], DEFAULT_STATUS);
    }

    #[test]
    fn explicit_status_is_kept() {
        let input = CreateProspect {
            status: Some("Qualified".to_string()),
            ..valid_input()
        };
        let body = input.into_document().unwrap();
        assert_eq!(body["status"], "Qualified");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let input = CreateProspect {
            status: Some("Maybe".to_string()),
            ..valid_input()
        };
        assert!(ResourceInput::validate(&input).is_err());
    }

    #[test]
    fn bad_email_and_missing_name_are_both_reported() {
        let input = CreateProspect {
            name: None,
            email: Some("not-an-email".to_string()),
            ..valid_input()
        };

        let errors = ResourceInput::validate(&input).unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
    }
}
