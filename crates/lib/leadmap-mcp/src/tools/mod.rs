//! MCP tool modules.
//!
//! Tools are grouped by domain: contextual help, knowledge lookups, lead
//! scoring, company enrichment, and lead storage. Each module owns its
//! descriptors and declines invocations for names it does not claim.

pub mod context;
pub mod enrich;
pub mod knowledge;
pub mod leads;
pub mod scoring;
