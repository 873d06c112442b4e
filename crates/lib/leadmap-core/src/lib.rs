//! Core services for leadmap.
//!
//! Holds the outbound-call layer (resilient HTTP caller and request guard),
//! the SurrealDB-backed lead store and its control plane, the lazily
//! constructed shared data-store handle, and the static marketing knowledge
//! tables consumed by the scoring and lookup tools.

pub mod control;
pub mod enrich;
pub mod knowledge;
pub mod outbound;
pub mod services;
pub mod store;
