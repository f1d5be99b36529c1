/// Storage abstractions
///
/// The core never talks to a database driver directly. It reaches storage
/// through two object-safe traits:
///
/// - [`DocumentStore`]: per-collection create/find/update/delete of JSON
///   documents keyed by an opaque [`Uuid`] identifier.
/// - [`CredentialStore`]: identity lookup for authentication (by email at
///   login time, by id when re-resolving a session).
///
/// Both are shared across request handlers as `Arc<dyn ...>`; concurrency
/// is delegated to the backing implementation. Each single operation is
/// atomic per document — sequences of operations are not, and the core does
/// not pretend otherwise.
///
/// # Implementations
///
/// - [`postgres::PgStore`]: one JSONB `documents` table per deployment
/// - [`memory::MemoryStore`]: in-memory store for tests and demos

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unexpected backend failure (connection loss, ...)
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// Uniqueness violation; currently only user emails are constrained
    #[error("{0}")]
    Conflict(String),

    /// A document body could not be encoded or decoded
    #[error("document codec failure: {0}")]
    Codec(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                if db_err.constraint().map_or(false, |c| c.contains("email")) {
                    StoreError::Conflict("Email already exists".to_string())
                } else {
                    StoreError::Backend(db_err.to_string())
                }
            }
            err => StoreError::Backend(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Codec(err.to_string())
    }
}

/// A stored document: the opaque identifier plus the JSON body.
///
/// The identifier is assigned by the store at insertion and immutable
/// afterwards; it is intentionally kept outside the body so the body stays
/// exactly what the caller persisted.
#[derive(Debug, Clone)]
pub struct Document {
    /// Store-assigned identifier, never reused after deletion
    pub id: Uuid,

    /// Document body (always a JSON object)
    pub body: JsonValue,
}

/// Generic per-collection document storage.
///
/// Listing returns documents in insertion order (storage-native order).
/// `merge` performs a top-level field merge, MongoDB `$set` style: supplied
/// keys overwrite, absent keys are untouched.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document and returns it with its newly assigned id.
    ///
    /// Inserting into the users collection with an email already present
    /// there is a [`StoreError::Conflict`].
    async fn insert(&self, collection: &str, body: JsonValue) -> Result<Document, StoreError>;

    /// Lists all documents of a collection in insertion order.
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Finds one document by id. `Ok(None)` if absent.
    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Document>, StoreError>;

    /// Merges `patch` into the document's top-level fields and returns the
    /// post-merge document. `Ok(None)` if absent.
    async fn merge(
        &self,
        collection: &str,
        id: Uuid,
        patch: JsonValue,
    ) -> Result<Option<Document>, StoreError>;

    /// Deletes a document. Returns `false` if it did not exist.
    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError>;

    /// Verifies the backend is reachable. Used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// An identity record as the authentication subsystem sees it.
///
/// Identities live in the `users` collection; this is the read-only
/// projection used for credential verification and session re-resolution.
/// `password_hash` is the stored Argon2id PHC string — identities seeded
/// without one can never authenticate (verification fails closed).
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub password_hash: Option<String>,
}

impl Identity {
    /// Collection holding identity records.
    pub const COLLECTION: &'static str = "users";

    /// Projects a stored user document into an `Identity`.
    ///
    /// A record without an email is not a usable identity and is reported as
    /// a codec failure rather than silently skipped.
    pub fn from_document(doc: &Document) -> Result<Self, StoreError> {
        let email = doc
            .body
            .get("email")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| StoreError::Codec(format!("user {} has no email", doc.id)))?
            .to_string();

        let field = |key: &str| {
            doc.body
                .get(key)
                .and_then(JsonValue::as_str)
                .map(str::to_string)
        };

        Ok(Identity {
            id: doc.id,
            email,
            name: field("name"),
            role: field("role").unwrap_or_else(|| "user".to_string()),
            password_hash: field("password"),
        })
    }
}

/// Identity lookup for the authentication subsystem.
///
/// Email matching is exact and case-sensitive.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks an identity up by exact email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;

    /// Looks an identity up by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError>;
}
