use super::MarkerStore;
use crate::error::StoreError;
use crate::model::{FindOptions, Marker, MarkerId, MarkerPatch, NewMarker};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory store using `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct MemoryMarkerStore {
    markers: RwLock<HashMap<MarkerId, Marker>>,
}

impl MemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<MarkerId, Marker>>, StoreError> {
        self.markers
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<MarkerId, Marker>>, StoreError> {
        self.markers
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

/// Title descending by bytes, then id descending.
fn title_desc(a: &Marker, b: &Marker) -> Ordering {
    b.title
        .as_bytes()
        .cmp(a.title.as_bytes())
        .then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl MarkerStore for MemoryMarkerStore {
    async fn insert(&self, marker: NewMarker) -> Result<Marker, StoreError> {
        let mut markers = self.write()?;
        let id = loop {
            let id = MarkerId::generate();
            if !markers.contains_key(&id) {
                break id;
            }
        };
        let now = Utc::now();
        let stored = Marker {
            id: id.clone(),
            title: marker.title,
            description: marker.description,
            latitude: marker.latitude,
            longitude: marker.longitude,
            created_at: now,
            updated_at: now,
        };
        markers.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &MarkerId) -> Result<Option<Marker>, StoreError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find(&self, options: &FindOptions) -> Result<Vec<Marker>, StoreError> {
        let markers = self.read()?;
        let mut all: Vec<&Marker> = markers.values().collect();
        all.sort_by(|a, b| title_desc(a, b));
        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(options.limit).unwrap_or(usize::MAX);
        Ok(all.into_iter().skip(skip).take(limit).cloned().collect())
    }

    async fn update_by_id(
        &self,
        id: &MarkerId,
        patch: &MarkerPatch,
    ) -> Result<Option<Marker>, StoreError> {
        let mut markers = self.write()?;
        let Some(marker) = markers.get_mut(id) else {
            return Ok(None);
        };
        if !patch.is_empty() {
            patch.apply(marker);
            marker.updated_at = Utc::now();
        }
        Ok(Some(marker.clone()))
    }

    async fn delete_by_id(&self, id: &MarkerId) -> Result<bool, StoreError> {
        Ok(self.write()?.remove(id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }
}
