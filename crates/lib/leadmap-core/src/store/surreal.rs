use std::{error::Error, fmt, str::FromStr, sync::Arc};

use leadmap_store::models::{EnrichmentRecord, Lead};
use leadmap_store::schema::{TABLE_ENRICHMENT, TABLE_LEAD};
use surrealdb::sql::Regex;
use surrealdb::{Connection, Surreal};

#[derive(Debug)]
pub enum StoreError {
    Surreal(Box<surrealdb::Error>),
    InvalidInput(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surreal(err) => write!(f, "SurrealDB error: {err}"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
        }
    }
}

impl Error for StoreError {}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        Self::Surreal(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct SurrealLeadStore<C: Connection> {
    db: Arc<Surreal<C>>,
}

impl<C: Connection> Clone for SurrealLeadStore<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealLeadStore<C> {
    #[must_use]
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db: Arc::new(db),
        }
    }

    #[must_use]
    pub const fn from_arc(db: Arc<Surreal<C>>) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn db(&self) -> &Surreal<C> {
        &self.db
    }

    /// Upserts a lead record by lead id.
    ///
    /// # Errors
    /// Returns `StoreError` if validation fails or the database write fails.
    pub async fn upsert_lead(&self, lead: Lead) -> StoreResult<Lead> {
        ensure_non_empty(&lead.lead_id, "lead_id")?;
        let fallback = lead.clone();
        let record: Option<Lead> = self
            .db
            .update((TABLE_LEAD, lead.lead_id.clone()))
            .content(lead)
            .await?;
        Ok(record.unwrap_or(fallback))
    }

    /// Fetches a lead by id.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn get_lead(&self, lead_id: &str) -> StoreResult<Option<Lead>> {
        let record: Option<Lead> = self.db.select((TABLE_LEAD, lead_id)).await?;
        Ok(record)
    }

    /// Lists leads up to the provided limit.
    ///
    /// # Errors
    /// Returns `StoreError` if the limit is invalid or the database query fails.
    pub async fn list_leads(&self, limit: usize) -> StoreResult<Vec<Lead>> {
        let limit = limit_to_i64(limit)?;
        let query = "SELECT * FROM lead LIMIT $limit;";
        let mut response = self.db.query(query).bind(("limit", limit)).await?;
        let records: Vec<Lead> = response.take(0)?;
        Ok(records)
    }

    /// Searches leads by company, domain, or sector wildcard pattern.
    ///
    /// # Errors
    /// Returns `StoreError` if the limit or pattern is invalid or the
    /// database query fails.
    pub async fn search_leads(&self, pattern: &str, limit: usize) -> StoreResult<Vec<Lead>> {
        let Some(pattern) = normalize_pattern(pattern) else {
            return self.list_leads(limit).await;
        };
        let limit = limit_to_i64(limit)?;
        let regex = build_search_regex(&pattern)?;
        let query = "SELECT * FROM lead WHERE search_text != NONE AND string::matches(search_text, $pattern) LIMIT $limit;";
        let mut response = self
            .db
            .query(query)
            .bind(("pattern", regex))
            .bind(("limit", limit))
            .await?;
        let records: Vec<Lead> = response.take(0)?;
        Ok(records)
    }

    /// Creates an enrichment record.
    ///
    /// # Errors
    /// Returns `StoreError` if validation fails or the database write fails.
    pub async fn create_enrichment(
        &self,
        record: EnrichmentRecord,
    ) -> StoreResult<EnrichmentRecord> {
        ensure_non_empty(&record.lead_id, "lead_id")?;
        let created: Option<EnrichmentRecord> =
            self.db.create(TABLE_ENRICHMENT).content(record).await?;
        require_record(created, TABLE_ENRICHMENT)
    }

    /// Lists enrichment records for a lead, newest first.
    ///
    /// # Errors
    /// Returns `StoreError` if the limit is invalid or the database query fails.
    pub async fn list_enrichments(
        &self,
        lead_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<EnrichmentRecord>> {
        let lead_id = lead_id.to_string();
        let limit = limit_to_i64(limit)?;
        let query = "SELECT * FROM enrichment WHERE lead_id = $lead_id ORDER BY fetched_at DESC LIMIT $limit;";
        let mut response = self
            .db
            .query(query)
            .bind(("lead_id", lead_id))
            .bind(("limit", limit))
            .await?;
        let records: Vec<EnrichmentRecord> = response.take(0)?;
        Ok(records)
    }
}

fn ensure_non_empty(value: &str, field: &str) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

fn require_record<T>(record: Option<T>, table: &str) -> StoreResult<T> {
    record.ok_or_else(|| {
        StoreError::InvalidInput(format!(
            "No record returned when creating {table}"
        ))
    })
}

fn normalize_pattern(pattern: &str) -> Option<String> {
    let trimmed = pattern.trim().to_lowercase();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn limit_to_i64(limit: usize) -> StoreResult<i64> {
    i64::try_from(limit).map_err(|_| {
        StoreError::InvalidInput("limit exceeds supported range".to_string())
    })
}

fn build_search_regex(pattern: &str) -> StoreResult<Regex> {
    let body = glob_to_regex_body(pattern);
    let regex = format!(r"(^|\|){body}(\||$)");
    Regex::from_str(&regex).map_err(|err| {
        StoreError::InvalidInput(format!("Invalid lead search pattern: {err}"))
    })
}

fn glob_to_regex_body(pattern: &str) -> String {
    let mut escaped = String::new();
    for ch in pattern.chars() {
        match ch {
            '*' => escaped.push_str(".*"),
            '.' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}
