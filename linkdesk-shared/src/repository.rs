/// Generic resource repository
///
/// One CRUD contract, instantiated once per record type. A [`Resource`]
/// names its collection and its create-input type; [`ResourceRepository`]
/// supplies `list`/`get`/`create`/`update`/`delete` with uniform error
/// semantics on top of any [`DocumentStore`]:
///
/// - a syntactically malformed identifier is indistinguishable from an
///   absent record — both are [`RepositoryError::NotFound`], so storage-layer
///   identifier formats never leak to clients
/// - creation validates first and reports every violation at once
/// - update is a top-level field merge of the supplied object; patched
///   fields must keep the document decodable as its record type, but finer
///   creation constraints (enum membership, formats) are not re-applied
///   (accepted simplification)
/// - deletion is irreversible and a second delete of the same id fails
///
/// Find-then-update sequences are not atomic under concurrent writers; only
/// the single store operation is. That is a documented property of the
/// design, not something the repository tries to fix.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use linkdesk_shared::models::{CreateTask, Task};
/// use linkdesk_shared::repository::ResourceRepository;
/// use linkdesk_shared::store::memory::MemoryStore;
///
/// # async fn example() -> Result<(), linkdesk_shared::repository::RepositoryError> {
/// let store = Arc::new(MemoryStore::new());
/// let tasks: ResourceRepository<Task> = ResourceRepository::new(store);
///
/// let created = tasks
///     .create(CreateTask {
///         project_id: Some("proj-1".into()),
///         title: Some("Follow up".into()),
///         description: None,
///         assigned_to: None,
///         due_date: Some("2026-09-01".into()),
///         priority: Some("Normal".into()),
///         status: Some("Open".into()),
///     })
///     .await?;
///
/// assert_eq!(tasks.get(&created.id.to_string()).await?.title, created.title);
/// # Ok(())
/// # }
/// ```

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::store::{Document, DocumentStore, StoreError};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Absent record, or an identifier that cannot name one
    #[error("resource not found")]
    NotFound,

    /// One or more schema violations, collected in a single pass
    #[error("validation failed")]
    Validation(ValidationErrors),

    /// Patch fields whose JSON type conflicts with the record schema
    #[error("invalid patch")]
    InvalidPatch(Vec<FieldViolation>),

    /// Unexpected storage failure; never retried here
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// A rejected patch field and why. The field name is already in wire form,
/// since patch keys arrive as the client wrote them.
#[derive(Debug, Clone)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// A record type participating in the generic CRUD contract.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The collection owning this record type. Exactly one per type.
    const COLLECTION: &'static str;

    /// The validated creation input.
    type Create: ResourceInput + 'static;
}

/// Creation input for a resource: schema validation plus conversion into the
/// document body to persist.
pub trait ResourceInput: Serialize + DeserializeOwned + Send + Sync + Sized {
    /// Validates the input, reporting the complete set of violations.
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Converts validated input into the document body. Schema-declared
    /// defaults (and any write-only transformations) are applied here.
    fn into_document(self) -> Result<JsonValue, RepositoryError> {
        serde_json::to_value(&self).map_err(|e| StoreError::from(e).into())
    }
}

/// Generic CRUD access to one collection of one resource type.
pub struct ResourceRepository<R: Resource> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceRepository<R> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Lists all records in storage-native (insertion) order.
    pub async fn list(&self) -> Result<Vec<R>, RepositoryError> {
        let docs = self.store.find_all(R::COLLECTION).await?;
        docs.into_iter().map(hydrate::<R>).collect()
    }

    /// Fetches one record. Malformed identifiers are `NotFound`.
    pub async fn get(&self, id: &str) -> Result<R, RepositoryError> {
        let id = parse_id(id)?;
        let doc = self
            .store
            .find_by_id(R::COLLECTION, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        hydrate(doc)
    }

    /// Validates and persists a new record, returning it with its assigned
    /// identifier.
    pub async fn create(&self, input: R::Create) -> Result<R, RepositoryError> {
        input
            .validate()
            .map_err(RepositoryError::Validation)?;

        let body = input.into_document()?;
        let doc = self.store.insert(R::COLLECTION, body).await?;
        hydrate(doc)
    }

    /// Merges the supplied fields into an existing record and returns the
    /// post-merge state. The patch must be a JSON object; an `id` key in the
    /// patch is ignored — identifiers are immutable.
    ///
    /// Each patched field is checked against the record type before anything
    /// is persisted: a wrong-typed value (say, a number where the schema has
    /// a string) would otherwise poison the stored document and break every
    /// later read of it. The check is per field, so a bad patch reports all
    /// of its offending fields at once.
    pub async fn update(&self, id: &str, patch: JsonValue) -> Result<R, RepositoryError> {
        let id = parse_id(id)?;

        let JsonValue::Object(mut fields) = patch else {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("object");
            error.message = Some("request body must be a JSON object".into());
            errors.add("body", error);
            return Err(RepositoryError::Validation(errors));
        };
        fields.remove("id");

        let current = self
            .store
            .find_by_id(R::COLLECTION, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut violations = Vec::new();
        for (key, value) in &fields {
            let mut preview = current.body.clone();
            if let JsonValue::Object(ref mut body) = preview {
                body.insert(key.clone(), value.clone());
            }
            if let Err(err) = decode::<R>(id, preview) {
                violations.push(FieldViolation {
                    field: key.clone(),
                    message: err.to_string(),
                });
            }
        }
        if !violations.is_empty() {
            return Err(RepositoryError::InvalidPatch(violations));
        }

        let doc = self
            .store
            .merge(R::COLLECTION, id, JsonValue::Object(fields))
            .await?
            .ok_or(RepositoryError::NotFound)?;
        hydrate(doc)
    }

    /// Deletes a record. Deleting an id that no longer exists is `NotFound`,
    /// so a repeated delete reports failure even though the end state is the
    /// same.
    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let id = parse_id(id)?;
        if self.store.delete(R::COLLECTION, id).await? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

/// Collapses identifier-parse failures into `NotFound`.
fn parse_id(id: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(id).map_err(|_| RepositoryError::NotFound)
}

/// Rebuilds a typed record from a stored document by injecting the
/// store-assigned identifier into the body.
fn hydrate<R: Resource>(doc: Document) -> Result<R, RepositoryError> {
    decode(doc.id, doc.body).map_err(|e| StoreError::from(e).into())
}

fn decode<R: Resource>(id: Uuid, mut body: JsonValue) -> Result<R, serde_json::Error> {
    if let JsonValue::Object(ref mut fields) = body {
        fields.insert("id".to_string(), JsonValue::String(id.to_string()));
    }
    serde_json::from_value(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateTask, Task};
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn repo() -> ResourceRepository<Task> {
        ResourceRepository::new(Arc::new(MemoryStore::new()))
    }

    fn task_input(title: &str) -> CreateTask {
        CreateTask {
            project_id: Some("proj-1".to_string()),
            title: Some(title.to_string()),
            description: None,
            assigned_to: None,
            due_date: Some("2026-09-01".to_string()),
            priority: Some("Normal".to_string()),
            status: Some("Open".to_string()),
        }
    }

    #[tokio::test]
    async fn create_then_get_roundtrip() {
        let tasks = repo();
        let created = tasks.create(task_input("Follow up")).await.unwrap();

        let fetched = tasks.get(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, "Follow up");
        assert_eq!(fetched.status, "Open");
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let tasks = repo();
        tasks.create(task_input("first")).await.unwrap();
        tasks.create(task_input("second")).await.unwrap();

        let all = tasks.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "first");
        assert_eq!(all[1].title, "second");
    }

    #[tokio::test]
    async fn malformed_id_is_not_found() {
        let tasks = repo();
        assert!(matches!(
            tasks.get("not-a-valid-id").await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            tasks.delete("zzz").await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let tasks = repo();
        let result = tasks
            .create(CreateTask {
                title: None,
                status: None,
                ..task_input("ignored")
            })
            .await;

        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert!(tasks.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let tasks = repo();
        let created = tasks.create(task_input("Call back")).await.unwrap();

        let updated = tasks
            .update(&created.id.to_string(), json!({"status": "Completed"}))
            .await
            .unwrap();

        assert_eq!(updated.status, "Completed");
        assert_eq!(updated.title, "Call back");
        assert_eq!(updated.priority, "Normal");
    }

    #[tokio::test]
    async fn update_ignores_id_in_patch() {
        let tasks = repo();
        let created = tasks.create(task_input("Immutable id")).await.unwrap();

        let updated = tasks
            .update(
                &created.id.to_string(),
                json!({"id": Uuid::new_v4().to_string(), "status": "Blocked"}),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status, "Blocked");
    }

    #[tokio::test]
    async fn wrong_typed_patch_is_rejected_before_persisting() {
        let tasks = repo();
        let created = tasks.create(task_input("Call back")).await.unwrap();
        let id = created.id.to_string();

        let result = tasks.update(&id, json!({"title": 5})).await;
        let Err(RepositoryError::InvalidPatch(violations)) = result else {
            panic!("expected an invalid-patch error");
        };
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "title");

        // Nothing was merged: the record and the whole collection still read.
        let fetched = tasks.get(&id).await.unwrap();
        assert_eq!(fetched.title, "Call back");
        assert_eq!(tasks.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bad_patch_reports_every_offending_field() {
        let tasks = repo();
        let created = tasks.create(task_input("typed")).await.unwrap();

        let result = tasks
            .update(
                &created.id.to_string(),
                json!({"title": 5, "priority": ["High"], "status": "Blocked"}),
            )
            .await;

        let Err(RepositoryError::InvalidPatch(violations)) = result else {
            panic!("expected an invalid-patch error");
        };
        let mut fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        fields.sort();
        assert_eq!(fields, vec!["priority", "title"]);
    }

    #[tokio::test]
    async fn patch_values_outside_creation_sets_are_accepted() {
        // Partial updates are not re-validated against creation constraints,
        // only against the record's shape.
        let tasks = repo();
        let created = tasks.create(task_input("loose")).await.unwrap();

        let updated = tasks
            .update(&created.id.to_string(), json!({"status": "Someday"}))
            .await
            .unwrap();
        assert_eq!(updated.status, "Someday");
    }

    #[tokio::test]
    async fn update_rejects_non_object_patch() {
        let tasks = repo();
        let created = tasks.create(task_input("typed")).await.unwrap();

        let result = tasks
            .update(&created.id.to_string(), json!(["not", "an", "object"]))
            .await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let tasks = repo();
        let created = tasks.create(task_input("temporary")).await.unwrap();
        let id = created.id.to_string();

        tasks.delete(&id).await.unwrap();
        assert!(matches!(
            tasks.delete(&id).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            tasks.get(&id).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
