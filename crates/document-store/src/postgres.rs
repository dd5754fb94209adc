use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use uuid::Uuid;

use crate::{
    Document, DocumentId, Fields, Filter, Result,
    document::without_reserved,
    store::{DocumentStore, Mutation, UpsertOutcome},
};

/// PostgreSQL-backed document store.
///
/// All collections share the `documents` table. The body is kept in a
/// JSONB column. Field filters compare each field for exact equality,
/// matching the in-memory backend.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

const COLUMNS: &str = "id, created_at, updated_at, body";

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_document(row: PgRow) -> Result<Document> {
        let body: Value = row.try_get("body")?;

        Ok(Document {
            id: DocumentId::from_uuid(row.try_get::<Uuid, _>("id")?),
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
            fields: serde_json::from_value(body)?,
        })
    }

    /// Builds the WHERE clause for a filter. Parameters start at `$1`
    /// (the collection); returns the clause and the next free parameter.
    fn where_clause(filter: &Filter) -> (String, usize) {
        let mut sql = String::from("collection = $1");
        let mut param_count = 1;

        if filter.id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND id = ${param_count}"));
        }
        if !filter.fields.is_empty() {
            // Containment lets the GIN index narrow the scan; the per-field
            // comparison keeps arrays and objects to exact equality.
            param_count += 1;
            sql.push_str(&format!(" AND body @> ${param_count}"));
            for _ in filter.fields.iter() {
                sql.push_str(&format!(
                    " AND body -> ${} = ${}",
                    param_count + 1,
                    param_count + 2
                ));
                param_count += 2;
            }
        }

        (sql, param_count + 1)
    }

    /// Binds the parameters of `where_clause` in the same order.
    fn bind_filter<'q>(
        query: Query<'q, Postgres, PgArguments>,
        collection: &'q str,
        filter: &Filter,
    ) -> Query<'q, Postgres, PgArguments> {
        let mut query = query.bind(collection);
        if let Some(id) = filter.id {
            query = query.bind(id.as_uuid());
        }
        if !filter.fields.is_empty() {
            query = query.bind(Value::Object(filter.fields.clone()));
            for (name, value) in filter.fields.iter() {
                query = query.bind(name.clone()).bind(value.clone());
            }
        }
        query
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn create(&self, collection: &str, data: Fields) -> Result<DocumentId> {
        let document = Document::new(data, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO documents (id, collection, created_at, updated_at, body)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(collection)
        .bind(document.created_at)
        .bind(document.updated_at)
        .bind(Value::Object(document.fields))
        .execute(&self.pool)
        .await?;

        tracing::debug!(collection, id = %document.id, "document created");
        Ok(document.id)
    }

    async fn update(&self, collection: &str, filter: &Filter, data: Fields) -> Result<u64> {
        let (clause, next) = Self::where_clause(filter);
        let sql = format!(
            "UPDATE documents SET body = body || ${patch}, updated_at = ${now} \
             WHERE id = (SELECT id FROM documents WHERE {clause} LIMIT 1 FOR UPDATE)",
            patch = next,
            now = next + 1,
        );

        let result = Self::bind_filter(sqlx::query(&sql), collection, filter)
            .bind(Value::Object(without_reserved(data)))
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let (clause, next) = Self::where_clause(filter);
        let sql = format!("SELECT {COLUMNS} FROM documents WHERE {clause} LIMIT ${next}");

        let rows = Self::bind_filter(sqlx::query(&sql), collection, filter)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn get_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        let (clause, _) = Self::where_clause(filter);
        let sql = format!("SELECT {COLUMNS} FROM documents WHERE {clause} LIMIT 1");

        let row = Self::bind_filter(sqlx::query(&sql), collection, filter)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_document).transpose()
    }

    async fn delete(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let (clause, _) = Self::where_clause(filter);
        let sql = format!(
            "DELETE FROM documents \
             WHERE id = (SELECT id FROM documents WHERE {clause} LIMIT 1 FOR UPDATE)"
        );

        let result = Self::bind_filter(sqlx::query(&sql), collection, filter)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn upsert_with(
        &self,
        collection: &str,
        filter: &Filter,
        mutation: Mutation,
    ) -> Result<UpsertOutcome> {
        let mut tx = self.pool.begin().await?;

        // Row locks cannot cover a document that does not exist yet, so
        // callers racing on the same filter are serialized by an advisory
        // lock held until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(filter.key(collection))
            .execute(&mut *tx)
            .await?;

        let (clause, _) = Self::where_clause(filter);
        let sql = format!("SELECT {COLUMNS} FROM documents WHERE {clause} LIMIT 1 FOR UPDATE");
        let existing = Self::bind_filter(sqlx::query(&sql), collection, filter)
            .fetch_optional(&mut *tx)
            .await?
            .map(Self::row_to_document)
            .transpose()?;

        let now = Utc::now();
        let outcome = match existing {
            Some(document) => {
                let fields = without_reserved(mutation(Some(document.fields))?);
                sqlx::query("UPDATE documents SET body = $1, updated_at = $2 WHERE id = $3")
                    .bind(Value::Object(fields))
                    .bind(now)
                    .bind(document.id.as_uuid())
                    .execute(&mut *tx)
                    .await?;
                UpsertOutcome::Updated(document.id)
            }
            None => {
                let document = Document::new(mutation(None)?, now);
                sqlx::query(
                    r#"
                    INSERT INTO documents (id, collection, created_at, updated_at, body)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(document.id.as_uuid())
                .bind(collection)
                .bind(document.created_at)
                .bind(document.updated_at)
                .bind(Value::Object(document.fields))
                .execute(&mut *tx)
                .await?;
                UpsertOutcome::Created(document.id)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_for_empty_filter() {
        let (sql, next) = PostgresDocumentStore::where_clause(&Filter::all());
        assert_eq!(sql, "collection = $1");
        assert_eq!(next, 2);
    }

    #[test]
    fn where_clause_numbers_parameters_in_bind_order() {
        let filter = Filter::by_id(DocumentId::new()).field("status", "pending");
        let (sql, next) = PostgresDocumentStore::where_clause(&filter);
        assert_eq!(
            sql,
            "collection = $1 AND id = $2 AND body @> $3 AND body -> $4 = $5"
        );
        assert_eq!(next, 6);
    }

    #[test]
    fn where_clause_with_fields_only() {
        let (sql, next) = PostgresDocumentStore::where_clause(&Filter::by_field("session_id", "s1"));
        assert_eq!(sql, "collection = $1 AND body @> $2 AND body -> $3 = $4");
        assert_eq!(next, 5);
    }

    #[test]
    fn where_clause_compares_every_field() {
        let filter = Filter::by_field("session_id", "s1").field("status", "open");
        let (sql, next) = PostgresDocumentStore::where_clause(&filter);
        assert_eq!(
            sql,
            "collection = $1 AND body @> $2 AND body -> $3 = $4 AND body -> $5 = $6"
        );
        assert_eq!(next, 7);
    }
}
