//! Marker operations on top of any [`MarkerStore`].

use crate::error::AppError;
use crate::model::{FindOptions, ListParams, Marker, MarkerId, MarkerPatch, NewMarker};
use crate::service::{FieldError, Location, ValidationErrors};
use crate::store::MarkerStore;

pub const NOT_FOUND_MESSAGE: &str = "Marker does not exist";

fn not_found() -> AppError {
    AppError::NotFound(NOT_FOUND_MESSAGE.into())
}

/// Titles are stored trimmed; one that trims to nothing counts as missing.
fn normalize_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        let mut errors = ValidationErrors::default();
        errors.push(FieldError::new(
            "title",
            Location::Body,
            "\"title\" is required".into(),
        ));
        return Err(errors.into());
    }
    Ok(trimmed.to_string())
}

pub struct MarkerService;

impl MarkerService {
    /// Fetch one marker. An empty, malformed or unknown id is NotFound.
    pub async fn get(store: &dyn MarkerStore, id: &str) -> Result<Marker, AppError> {
        let found = match MarkerId::parse(id) {
            Some(id) => store.find_by_id(&id).await?,
            None => None,
        };
        found.ok_or_else(not_found)
    }

    /// One page, title descending. No total count.
    pub async fn list(store: &dyn MarkerStore, params: &ListParams) -> Result<Vec<Marker>, AppError> {
        let options = FindOptions::by_title_desc(params);
        Ok(store.find(&options).await?)
    }

    pub async fn create(store: &dyn MarkerStore, mut marker: NewMarker) -> Result<Marker, AppError> {
        marker.title = normalize_title(&marker.title)?;
        let created = store.insert(marker).await?;
        tracing::info!(id = %created.id, "marker created");
        Ok(created)
    }

    /// Replace only the supplied fields. An empty patch returns the current state.
    pub async fn update(
        store: &dyn MarkerStore,
        id: &MarkerId,
        mut patch: MarkerPatch,
    ) -> Result<Marker, AppError> {
        if let Some(title) = patch.title.as_deref() {
            patch.title = Some(normalize_title(title)?);
        }
        let updated = store.update_by_id(id, &patch).await?.ok_or_else(not_found)?;
        if !patch.is_empty() {
            tracing::info!(id = %id, "marker updated");
        }
        Ok(updated)
    }

    pub async fn remove(store: &dyn MarkerStore, id: &MarkerId) -> Result<(), AppError> {
        if !store.delete_by_id(id).await? {
            return Err(not_found());
        }
        tracing::info!(id = %id, "marker removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryMarkerStore;

    fn new_marker(title: &str) -> NewMarker {
        NewMarker {
            title: title.into(),
            description: Some("First simple marker".into()),
            latitude: 37.78825,
            longitude: -122.4324,
        }
    }

    #[tokio::test]
    async fn get_reports_missing_and_malformed_ids_as_not_found() {
        let store = MemoryMarkerStore::new();
        for id in ["", "nope", "507f191e810c19729de860ea"] {
            let err = MarkerService::get(&store, id).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(ref m) if m == NOT_FOUND_MESSAGE), "{id}");
        }
    }

    #[tokio::test]
    async fn create_trims_title() {
        let store = MemoryMarkerStore::new();
        let created = MarkerService::create(&store, new_marker("  Pier 39 \t"))
            .await
            .unwrap();
        assert_eq!(created.title, "Pier 39");
        let fetched = MarkerService::get(&store, created.id.as_str()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let store = MemoryMarkerStore::new();
        let err = MarkerService::create(&store, new_marker("   ")).await.unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.field("title").unwrap().location, Location::Body);
    }

    #[tokio::test]
    async fn update_and_remove_unknown_ids() {
        let store = MemoryMarkerStore::new();
        let id = MarkerId::generate();
        assert!(matches!(
            MarkerService::update(&store, &id, MarkerPatch::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            MarkerService::remove(&store, &id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_uses_title_descending_pages() {
        let store = MemoryMarkerStore::new();
        MarkerService::create(&store, new_marker("Simple Marker One")).await.unwrap();
        MarkerService::create(&store, new_marker("Simple Marker Two")).await.unwrap();
        let page = MarkerService::list(&store, &ListParams { page: 2, per_page: 1 })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Simple Marker One");
    }
}
