//! Markers API: a small REST service storing geographic markers.
//!
//! Requests are validated declaratively ([`service::RouteSchema`]), handled by
//! [`service::MarkerService`] and persisted through a [`store::MarkerStore`]
//! backend (PostgreSQL or in-memory).

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{ServerConfig, StoreBackend, StoreConfig};
pub use error::{AppError, ConfigError, StoreError};
pub use model::{Marker, MarkerId, MarkerPatch, MarkerView, NewMarker};
pub use response::{success_many, success_one, success_one_ok};
pub use routes::{app, common_routes, marker_routes};
pub use service::MarkerService;
pub use state::AppState;
pub use store::{connect, MarkerStore, MemoryMarkerStore, PgMarkerStore};
