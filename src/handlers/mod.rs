//! HTTP handlers for marker CRUD.

pub mod markers;
