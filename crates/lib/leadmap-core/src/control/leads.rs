use std::collections::HashSet;

use chrono::Utc;
use leadmap_store::models::{EnrichmentRecord, Lead};
use leadmap_store::schema::make_lead_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use surrealdb::Connection;
use uuid::Uuid;

use crate::store::StoreError;

use super::{ControlError, LeadControlPlane};

/// Input payload for saving or updating a lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveLeadRequest {
    pub lead_id: Option<String>,
    pub company: Option<String>,
    pub domain: Option<String>,
    pub sector: Option<String>,
    pub employee_count: Option<u32>,
    pub has_funding: Option<bool>,
    pub score: Option<f64>,
    pub status: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub signals: Vec<String>,
}

/// Input payload for recording an enrichment fetch against a lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEnrichmentRequest {
    pub lead_id: String,
    pub source_url: String,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub payload: Option<Value>,
}

impl<C: Connection> LeadControlPlane<C> {
    /// Upserts a lead, merging fields and signals into any existing record.
    ///
    /// The lead id is taken from the request, or derived from the domain or
    /// company name when absent.
    ///
    /// # Errors
    /// Returns `ControlError` if no id can be derived or the store operation
    /// fails.
    pub async fn save_lead(&self, request: SaveLeadRequest) -> Result<Lead, ControlError> {
        let SaveLeadRequest {
            lead_id,
            company,
            domain,
            sector,
            employee_count,
            has_funding,
            score,
            status,
            notes,
            signals,
        } = request;

        let lead_id = derive_lead_id(lead_id.as_deref(), domain.as_deref(), company.as_deref())
            .ok_or_else(|| {
                ControlError::Store(StoreError::InvalidInput(
                    "lead_id, domain, or company is required".to_string(),
                ))
            })?;

        let mut lead = self
            .store()
            .get_lead(&lead_id)
            .await?
            .unwrap_or_else(|| Lead::new(lead_id.clone()));

        let now = Utc::now().to_rfc3339();
        if lead.created_at.is_none() {
            lead.created_at = Some(now.clone());
        }
        lead.updated_at = Some(now);

        if let Some(company) = company {
            lead.company = Some(company);
        }
        if let Some(domain) = domain {
            lead.domain = Some(domain);
        }
        if let Some(sector) = sector {
            lead.sector = Some(sector);
        }
        if let Some(employee_count) = employee_count {
            lead.employee_count = Some(employee_count);
        }
        if let Some(has_funding) = has_funding {
            lead.has_funding = Some(has_funding);
        }
        if let Some(score) = score {
            lead.score = Some(score);
        }
        if let Some(status) = status {
            lead.status = Some(status);
        }
        if let Some(notes) = notes {
            lead.notes = Some(notes);
        }

        merge_signals(&mut lead.signals, &signals);
        lead.search_text = build_lead_search_text(&lead);

        Ok(self.store().upsert_lead(lead).await?)
    }

    /// Fetches a lead by id.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn get_lead(&self, lead_id: &str) -> Result<Option<Lead>, ControlError> {
        Ok(self.store().get_lead(lead_id).await?)
    }

    /// Lists leads with a limit.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn list_leads(&self, limit: usize) -> Result<Vec<Lead>, ControlError> {
        Ok(self.store().list_leads(limit).await?)
    }

    /// Searches leads by a company, domain, or sector pattern.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn search_leads(
        &self,
        pattern: &str,
        limit: usize,
    ) -> Result<Vec<Lead>, ControlError> {
        Ok(self.store().search_leads(pattern, limit).await?)
    }

    /// Records an enrichment fetch for a lead.
    ///
    /// # Errors
    /// Returns `ControlError` if the input is invalid or the store write
    /// fails.
    pub async fn record_enrichment(
        &self,
        request: RecordEnrichmentRequest,
    ) -> Result<EnrichmentRecord, ControlError> {
        let RecordEnrichmentRequest {
            lead_id,
            source_url,
            name,
            summary,
            payload,
        } = request;

        if lead_id.trim().is_empty() {
            return Err(ControlError::Store(StoreError::InvalidInput(
                "lead_id is required".to_string(),
            )));
        }

        let record = EnrichmentRecord {
            id: None,
            enrichment_id: Uuid::new_v4().to_string(),
            lead_id,
            source_url,
            name,
            summary,
            fetched_at: Some(Utc::now().to_rfc3339()),
            payload,
        };

        Ok(self.store().create_enrichment(record).await?)
    }

    /// Lists enrichment records for a lead, newest first.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn list_enrichments(
        &self,
        lead_id: &str,
        limit: usize,
    ) -> Result<Vec<EnrichmentRecord>, ControlError> {
        Ok(self.store().list_enrichments(lead_id, limit).await?)
    }
}

fn derive_lead_id(lead_id: Option<&str>, domain: Option<&str>, company: Option<&str>) -> Option<String> {
    for candidate in [lead_id, domain, company] {
        if let Some(candidate) = candidate {
            let id = make_lead_id(candidate);
            if !id.is_empty() {
                return Some(id);
            }
        }
    }
    None
}

fn merge_signals(target: &mut Vec<String>, incoming: &[String]) {
    let mut seen: HashSet<String> = target
        .iter()
        .map(|signal| signal.trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .collect();

    for signal in incoming {
        let trimmed = signal.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if seen.insert(key) {
            target.push(trimmed.to_string());
        }
    }
}

fn build_lead_search_text(lead: &Lead) -> Option<String> {
    let mut values = HashSet::new();
    let mut ordered = Vec::new();

    push_search_value(&mut values, &mut ordered, &lead.lead_id);
    if let Some(company) = lead.company.as_ref() {
        push_search_value(&mut values, &mut ordered, company);
    }
    if let Some(domain) = lead.domain.as_ref() {
        push_search_value(&mut values, &mut ordered, domain);
    }
    if let Some(sector) = lead.sector.as_ref() {
        push_search_value(&mut values, &mut ordered, sector);
    }

    if ordered.is_empty() {
        None
    } else {
        Some(ordered.join("|"))
    }
}

fn push_search_value(values: &mut HashSet<String>, ordered: &mut Vec<String>, input: &str) {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return;
    }
    let lowered = trimmed.to_lowercase();
    if values.insert(lowered.clone()) {
        ordered.push(lowered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_id_prefers_explicit_then_domain_then_company() {
        assert_eq!(
            derive_lead_id(Some("Custom Id"), Some("acme.dev"), Some("Acme")),
            Some("custom-id".to_string())
        );
        assert_eq!(
            derive_lead_id(None, Some("acme.dev"), Some("Acme")),
            Some("acme-dev".to_string())
        );
        assert_eq!(
            derive_lead_id(None, None, Some("Acme Rocketry")),
            Some("acme-rocketry".to_string())
        );
        assert_eq!(derive_lead_id(None, None, None), None);
        assert_eq!(derive_lead_id(Some("  "), None, None), None);
    }

    #[test]
    fn signals_merge_without_duplicates() {
        let mut signals = vec!["Hiring SDRs".to_string()];
        merge_signals(
            &mut signals,
            &[
                "hiring sdrs".to_string(),
                "  ".to_string(),
                "Series B".to_string(),
            ],
        );
        assert_eq!(signals, vec!["Hiring SDRs".to_string(), "Series B".to_string()]);
    }

    #[test]
    fn search_text_joins_distinct_lowercased_fields() {
        let mut lead = Lead::new("acme-dev".to_string());
        lead.company = Some("Acme Rocketry".to_string());
        lead.domain = Some("acme.dev".to_string());
        lead.sector = Some("SaaS".to_string());
        assert_eq!(
            build_lead_search_text(&lead),
            Some("acme-dev|acme rocketry|acme.dev|saas".to_string())
        );
    }
}
