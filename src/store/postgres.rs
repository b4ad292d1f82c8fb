use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{
    generate_id, merge_documents, CollectionPath, DocPath, Document, DocumentStore, Result,
    SetOptions, StoreError,
};

/// PostgreSQL-backed store: one `documents` row per path with a JSONB body.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("migration failed: {}", e)))?;
        tracing::info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>> {
        let row: Option<(Json<Document>,)> =
            sqlx::query_as("SELECT data FROM documents WHERE path = $1")
                .bind(path.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(Json(doc),)| doc))
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<(String, Document)>> {
        let rows: Vec<(String, Json<Document>)> = sqlx::query_as(
            "SELECT path, data FROM documents WHERE collection = $1 ORDER BY path COLLATE \"C\"",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(path, Json(doc))| Ok((DocPath::parse(&path)?.id().to_string(), doc)))
            .collect()
    }

    async fn set(&self, path: &DocPath, doc: Document, options: SetOptions) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let body = if options.merge {
            let existing: Option<(Json<Document>,)> =
                sqlx::query_as("SELECT data FROM documents WHERE path = $1 FOR UPDATE")
                    .bind(path.as_str())
                    .fetch_optional(&mut *tx)
                    .await?;
            match existing {
                Some((Json(mut current),)) => {
                    merge_documents(&mut current, doc);
                    current
                }
                None => doc,
            }
        } else {
            doc
        };

        sqlx::query(
            r#"
            INSERT INTO documents (path, collection, data, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (path) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(path.as_str())
        .bind(path.collection().as_str())
        .bind(Json(body))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn update(&self, path: &DocPath, fields: Document) -> Result<()> {
        let result = sqlx::query(
            "UPDATE documents SET data = data || $2, updated_at = NOW() WHERE path = $1",
        )
        .bind(path.as_str())
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(path.to_string()));
        }
        Ok(())
    }

    async fn add(&self, collection: &CollectionPath, doc: Document) -> Result<String> {
        let id = generate_id();
        let path = collection.doc(&id)?;

        sqlx::query(
            r#"
            INSERT INTO documents (path, collection, data, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            "#,
        )
        .bind(path.as_str())
        .bind(collection.as_str())
        .bind(Json(doc))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn delete(&self, path: &DocPath) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE path = $1")
            .bind(path.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
