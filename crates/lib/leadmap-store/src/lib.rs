//! Storage models and schema helpers for leadmap.
//!
//! This crate defines the serde-facing shapes persisted in the hosted store
//! and the table/status constants shared by the control plane.

pub mod models;
pub mod schema;
