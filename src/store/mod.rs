//! Marker persistence behind one async trait.
//!
//! The store assigns identifiers and creation timestamps; everything else is
//! decided by the caller. Two backends exist: [`PgMarkerStore`] for PostgreSQL
//! and [`MemoryMarkerStore`] for tests and database-less runs.

mod memory;
mod postgres;

pub use memory::MemoryMarkerStore;
pub use postgres::PgMarkerStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::StoreError;
use crate::model::{FindOptions, Marker, MarkerId, MarkerPatch, NewMarker};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait MarkerStore: Send + Sync {
    /// Persists a new marker, assigning its id and `created_at`.
    async fn insert(&self, marker: NewMarker) -> Result<Marker, StoreError>;

    async fn find_by_id(&self, id: &MarkerId) -> Result<Option<Marker>, StoreError>;

    /// Window over all markers, title descending. Equal titles order by id, descending.
    async fn find(&self, options: &FindOptions) -> Result<Vec<Marker>, StoreError>;

    /// Applies the supplied fields and returns the new state; `None` if the id is unknown.
    async fn update_by_id(
        &self,
        id: &MarkerId,
        patch: &MarkerPatch,
    ) -> Result<Option<Marker>, StoreError>;

    /// `true` if a marker was removed.
    async fn delete_by_id(&self, id: &MarkerId) -> Result<bool, StoreError>;

    /// Cheap liveness probe used by `/ready`.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Opens the configured backend. For PostgreSQL this also creates the table if needed.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn MarkerStore>, StoreError> {
    match &config.backend {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory marker store; data is lost on restart");
            Ok(Arc::new(MemoryMarkerStore::new()))
        }
        StoreBackend::Postgres { url } => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await?;
            let store = PgMarkerStore::new(pool, &config.schema);
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
    }
}
