use super::MarkerStore;
use crate::error::StoreError;
use crate::migration::ensure_markers_table;
use crate::model::{FindOptions, Marker, MarkerId, MarkerPatch, NewMarker};
use crate::sql::{self, bind_all, QueryBuf, TableRef};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL-backed store: one row per marker in `<schema>.markers`.
#[derive(Clone, Debug)]
pub struct PgMarkerStore {
    pool: PgPool,
    table: TableRef,
}

impl PgMarkerStore {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgMarkerStore {
            pool,
            table: TableRef::markers(schema),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn schema(&self) -> &str {
        &self.table.schema
    }

    /// Creates the schema, table and title index when missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        ensure_markers_table(&self.pool, &self.table).await
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Marker>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let query = bind_all(sqlx::query_as::<_, Marker>(&q.sql), &q.params);
        Ok(query.fetch_optional(&self.pool).await?)
    }

    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<Marker>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let query = bind_all(sqlx::query_as::<_, Marker>(&q.sql), &q.params);
        Ok(query.fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl MarkerStore for PgMarkerStore {
    async fn insert(&self, marker: NewMarker) -> Result<Marker, StoreError> {
        let id = MarkerId::generate();
        let q = sql::insert(&self.table, &id, &marker);
        self.fetch_optional(&q)
            .await?
            .ok_or(StoreError::Db(sqlx::Error::RowNotFound))
    }

    async fn find_by_id(&self, id: &MarkerId) -> Result<Option<Marker>, StoreError> {
        self.fetch_optional(&sql::select_by_id(&self.table, id)).await
    }

    async fn find(&self, options: &FindOptions) -> Result<Vec<Marker>, StoreError> {
        self.fetch_all(&sql::select_page(&self.table, options)).await
    }

    async fn update_by_id(
        &self,
        id: &MarkerId,
        patch: &MarkerPatch,
    ) -> Result<Option<Marker>, StoreError> {
        self.fetch_optional(&sql::update(&self.table, id, patch)).await
    }

    async fn delete_by_id(&self, id: &MarkerId) -> Result<bool, StoreError> {
        let removed = self.fetch_optional(&sql::delete(&self.table, id)).await?;
        Ok(removed.is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
