/// In-memory document store
///
/// Implements [`DocumentStore`] and [`CredentialStore`] over a `HashMap` of
/// insertion-ordered vectors. Used by unit and integration tests so the full
/// request path can run without a database; also handy for demos.
///
/// The lock is a plain `std::sync::RwLock` — no method holds it across an
/// `.await`, so it is safe under the one-task-per-request model.
///
/// # Example
///
/// ```
/// use linkdesk_shared::store::{memory::MemoryStore, DocumentStore};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), linkdesk_shared::store::StoreError> {
/// let store = MemoryStore::new();
/// let doc = store.insert("tasks", json!({"title": "Call back"})).await?;
/// assert!(store.find_by_id("tasks", doc.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use super::{CredentialStore, Document, DocumentStore, Identity, StoreError};

/// In-memory store. One entry per collection, insertion order preserved.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_err() -> StoreError {
        StoreError::Backend("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, body: JsonValue) -> Result<Document, StoreError> {
        let doc = Document {
            id: Uuid::new_v4(),
            body,
        };

        let mut collections = self.collections.write().map_err(|_| Self::lock_err())?;

        // Same uniqueness rule the PostgreSQL partial index enforces.
        if collection == Identity::COLLECTION {
            if let Some(email) = doc.body.get("email").and_then(JsonValue::as_str) {
                let taken = collections.get(collection).map_or(false, |docs| {
                    docs.iter()
                        .any(|d| d.body.get("email").and_then(JsonValue::as_str) == Some(email))
                });
                if taken {
                    return Err(StoreError::Conflict("Email already exists".to_string()));
                }
            }
        }

        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());

        Ok(doc)
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::lock_err())?;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::lock_err())?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn merge(
        &self,
        collection: &str,
        id: Uuid,
        patch: JsonValue,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::lock_err())?;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
        else {
            return Ok(None);
        };

        let mut merged = match doc.body.take() {
            JsonValue::Object(fields) => fields,
            _ => Map::new(),
        };
        if let JsonValue::Object(fields) = patch {
            for (key, value) in fields {
                merged.insert(key, value);
            }
        }
        doc.body = JsonValue::Object(merged);

        Ok(Some(doc.clone()))
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::lock_err())?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        Ok(docs.len() < before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.collections.read().map_err(|_| Self::lock_err())?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::lock_err())?;
        let Some(users) = collections.get(Identity::COLLECTION) else {
            return Ok(None);
        };

        users
            .iter()
            .find(|doc| doc.body.get("email").and_then(JsonValue::as_str) == Some(email))
            .map(Identity::from_document)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        let doc = DocumentStore::find_by_id(self, Identity::COLLECTION, id).await?;
        doc.as_ref().map(Identity::from_document).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_unique_ids_and_preserves_order() {
        let store = MemoryStore::new();
        let first = store.insert("clients", json!({"name": "a"})).await.unwrap();
        let second = store.insert("clients", json!({"name": "b"})).await.unwrap();
        assert_ne!(first.id, second.id);

        let all = store.find_all("clients").await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[1].id, second.id);
    }

    #[tokio::test]
    async fn merge_overwrites_only_supplied_fields() {
        let store = MemoryStore::new();
        let doc = store
            .insert("tasks", json!({"title": "Call", "status": "Open"}))
            .await
            .unwrap();

        let merged = store
            .merge("tasks", doc.id, json!({"status": "Completed"}))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(merged.body["title"], "Call");
        assert_eq!(merged.body["status"], "Completed");
    }

    #[tokio::test]
    async fn merge_and_delete_on_absent_id() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        assert!(store.merge("tasks", id, json!({})).await.unwrap().is_none());
        assert!(!store.delete("tasks", id).await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_document() {
        let store = MemoryStore::new();
        let keep = store.insert("tasks", json!({"title": "keep"})).await.unwrap();
        let gone = store.insert("tasks", json!({"title": "gone"})).await.unwrap();

        assert!(store.delete("tasks", gone.id).await.unwrap());
        assert!(!store.delete("tasks", gone.id).await.unwrap());

        let all = store.find_all("tasks").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, keep.id);
    }

    #[tokio::test]
    async fn duplicate_user_email_is_a_conflict() {
        let store = MemoryStore::new();
        store
            .insert("users", json!({"email": "ana@example.com"}))
            .await
            .unwrap();

        let result = store.insert("users", json!({"email": "ana@example.com"})).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        // A different email is fine, and other collections are unconstrained.
        store
            .insert("users", json!({"email": "bob@example.com"}))
            .await
            .unwrap();
        store
            .insert("prospects", json!({"email": "ana@example.com"}))
            .await
            .unwrap();
        store
            .insert("prospects", json!({"email": "ana@example.com"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn credential_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        store
            .insert("users", json!({"email": "Ana@example.com", "role": "admin"}))
            .await
            .unwrap();

        assert!(store.find_by_email("Ana@example.com").await.unwrap().is_some());
        assert!(store.find_by_email("ana@example.com").await.unwrap().is_none());
    }
}
