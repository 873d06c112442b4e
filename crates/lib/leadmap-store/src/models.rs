use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lead record tracked in the hosted store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub lead_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_funding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl Lead {
    /// Creates an empty lead shell for the given id.
    #[must_use]
    pub const fn new(lead_id: String) -> Self {
        Self {
            id: None,
            lead_id,
            company: None,
            domain: None,
            sector: None,
            employee_count: None,
            has_funding: None,
            score: None,
            status: None,
            notes: None,
            signals: Vec::new(),
            search_text: None,
            created_at: None,
            updated_at: None,
            extra: None,
        }
    }
}

/// Snapshot of one enrichment fetch performed for a lead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichmentRecord {
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub enrichment_id: String,
    pub lead_id: String,
    pub source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}
