//! Company enrichment over guarded outbound HTTP.
//!
//! Every caller-supplied target passes the request guard before any network
//! access, and every piece of fetched free text is sanitized before it can
//! be embedded in a generated prompt.

use std::error::Error;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::outbound::{
    CallError, CallRequest, GuardError, ResilientCaller, guard, sanitize_for_prompt,
    validate_external_url,
};

const NAME_KEYS: &[&str] = &["name", "company", "company_name"];
const SUMMARY_KEYS: &[&str] = &["description", "summary", "about"];
const SECTOR_KEYS: &[&str] = &["sector", "industry"];

#[derive(Debug)]
pub enum EnrichError {
    Guard(GuardError),
    Call(CallError),
}

impl fmt::Display for EnrichError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guard(err) => write!(f, "{err}"),
            Self::Call(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EnrichError {}

impl From<GuardError> for EnrichError {
    fn from(err: GuardError) -> Self {
        Self::Guard(err)
    }
}

impl From<CallError> for EnrichError {
    fn from(err: CallError) -> Self {
        Self::Call(err)
    }
}

/// Structured result of one enrichment fetch.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyEnrichment {
    pub source_url: String,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub sector_hint: Option<String>,
    pub payload: Value,
}

/// Fetches and normalizes company data from external enrichment sources.
pub struct Enricher {
    caller: ResilientCaller,
}

impl Enricher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_caller(ResilientCaller::new())
    }

    #[must_use]
    pub const fn with_caller(caller: ResilientCaller) -> Self {
        Self { caller }
    }

    /// Fetches company data from a caller-supplied URL.
    ///
    /// # Errors
    /// Returns `EnrichError::Guard` when the target fails validation and
    /// `EnrichError::Call` when the outbound request fails terminally.
    pub async fn fetch_company(
        &self,
        raw_url: &str,
        max_summary_chars: usize,
    ) -> Result<CompanyEnrichment, EnrichError> {
        let url = validate_external_url(raw_url)?;
        let payload: Value = self
            .caller
            .call(CallRequest::get(url.clone()).with_header("accept", "application/json"))
            .await?;

        Ok(build_enrichment(url.to_string(), payload, max_summary_chars))
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new()
    }
}

fn build_enrichment(
    source_url: String,
    payload: Value,
    max_summary_chars: usize,
) -> CompanyEnrichment {
    let name = first_text_field(&payload, NAME_KEYS, guard::DEFAULT_PROMPT_LENGTH);
    let summary = first_text_field(&payload, SUMMARY_KEYS, max_summary_chars);
    let sector_hint = first_text_field(&payload, SECTOR_KEYS, guard::DEFAULT_PROMPT_LENGTH);

    CompanyEnrichment {
        source_url,
        name,
        summary,
        sector_hint,
        payload,
    }
}

fn first_text_field(payload: &Value, keys: &[&str], max_chars: usize) -> Option<String> {
    for key in keys {
        if let Some(text) = payload.get(key).and_then(Value::as_str) {
            let cleaned = sanitize_for_prompt(text, max_chars);
            if !cleaned.is_empty() {
                return Some(cleaned);
            }
        }
    }
    None
}
