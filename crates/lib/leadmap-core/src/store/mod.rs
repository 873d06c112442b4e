//! Store backends for leadmap.

mod surreal;

pub use surreal::{StoreError, StoreResult, SurrealLeadStore};
