/// PostgreSQL document store
///
/// Implements [`DocumentStore`] and [`CredentialStore`] over a single
/// `documents` table:
///
/// ```sql
/// CREATE TABLE documents (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     collection TEXT NOT NULL,
///     body JSONB NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Listing orders by `(created_at, id)`, which is insertion order. Partial
/// updates use the JSONB `||` operator — a top-level field merge, atomic per
/// document. A partial unique index keeps user emails unique.
///
/// # Example
///
/// ```no_run
/// use linkdesk_shared::{db, store::postgres::PgStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = db::create_pool(db::DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgStore::new(pool);
/// store.init_schema().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{CredentialStore, Document, DocumentStore, Identity, StoreError};

/// PostgreSQL-backed document store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Row shape shared by every query.
type DocumentRow = (Uuid, JsonValue);

fn into_document((id, body): DocumentRow) -> Document {
    Document { id, body }
}

impl PgStore {
    /// Wraps an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `documents` table and its indexes if they do not exist.
    ///
    /// Idempotent; run once at startup.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                collection TEXT NOT NULL,
                body JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_documents_collection
                ON documents (collection, created_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        // User emails are unique; other collections are unconstrained.
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_documents_user_email
                ON documents ((body->>'email'))
                WHERE collection = 'users'
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("document store schema ready");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert(&self, collection: &str, body: JsonValue) -> Result<Document, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (collection, body)
            VALUES ($1, $2)
            RETURNING id, body
            "#,
        )
        .bind(collection)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;

        Ok(into_document(row))
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_document).collect())
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_document))
    }

    async fn merge(
        &self,
        collection: &str,
        id: Uuid,
        patch: JsonValue,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
            SET body = body || $3
            WHERE collection = $1 AND id = $2
            RETURNING id, body
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(patch)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_document))
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::db::health_check(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = 'users' AND body->>'email' = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_document)
            .as_ref()
            .map(Identity::from_document)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, StoreError> {
        let doc = DocumentStore::find_by_id(self, Identity::COLLECTION, id).await?;
        doc.as_ref().map(Identity::from_document).transpose()
    }
}
