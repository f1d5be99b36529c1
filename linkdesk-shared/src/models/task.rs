/// Task resource
///
/// A project task: what needs doing, for which project, by whom, by when.
/// `assignedTo` is a free-form user reference — the core deliberately does
/// not verify it against the users collection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::{invalid_date, one_of};
use crate::repository::{Resource, ResourceInput};

/// Allowed task priorities.
pub const PRIORITIES: &[&str] = &["Low", "Normal", "High", "Urgent"];

/// Allowed task statuses. There is no default: a new task must say where it
/// starts.
pub const STATUSES: &[&str] = &["Open", "In Progress", "Completed", "Blocked"];

/// A stored task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier
    pub id: Uuid,

    /// Project this task belongs to (opaque reference)
    pub project_id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// User reference, unverified by design
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    /// Due date, YYYY-MM-DD
    pub due_date: String,

    pub priority: String,

    pub status: String,
}

impl Resource for Task {
    const COLLECTION: &'static str = "tasks";
    type Create = CreateTask;
}

/// Input for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    #[validate(required(message = "projectId is required"))]
    pub project_id: Option<String>,

    #[validate(
        required(message = "title is required"),
        length(min = 1, message = "title must not be empty")
    )]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    #[validate(required(message = "dueDate is required"))]
    pub due_date: Option<String>,

    #[validate(required(message = "priority is required"))]
    pub priority: Option<String>,

    #[validate(required(message = "status is required"))]
    pub status: Option<String>,
}

impl ResourceInput for CreateTask {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = match Validate::validate(self) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(due_date) = self.due_date.as_deref() {
            if chrono::NaiveDate::parse_from_str(due_date, "%Y-%m-%d").is_err() {
                errors.add("due_date", invalid_date());
            }
        }
        if let Some(priority) = self.priority.as_deref() {
            if !PRIORITIES.contains(&priority) {
                errors.add("priority", one_of(PRIORITIES));
            }
        }
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
}
