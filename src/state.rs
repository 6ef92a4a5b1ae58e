//! Shared application state for all routes.

use crate::store::{MarkerStore, MemoryMarkerStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarkerStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn MarkerStore>) -> Self {
        AppState { store }
    }

    /// State over a fresh [`MemoryMarkerStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryMarkerStore::new()))
    }
}
