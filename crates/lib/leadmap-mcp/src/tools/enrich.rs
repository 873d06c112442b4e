use std::sync::Arc;

use async_trait::async_trait;
use leadmap_core::control::RecordEnrichmentRequest;
use leadmap_core::enrich::{EnrichError, Enricher};
use leadmap_core::services::DataStore;
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, Tool};
use serde::{Deserialize, Serialize};
use serde_json::json;
use surrealdb::Connection;

use crate::helpers;
use crate::router::{Dispatch, ToolInvocation, ToolModule};

const ENRICH_COMPANY: &str = "enrich_company";

const DEFAULT_SUMMARY_CHARS: usize = 600;

/// Parameters for fetching company data from an external source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichCompanyParams {
    pub url: String,
    pub lead_id: Option<String>,
    pub max_summary_chars: Option<usize>,
}

/// Company enrichment over guarded outbound HTTP.
pub struct EnrichTools<C: Connection> {
    enricher: Arc<Enricher>,
    store: Arc<DataStore<C>>,
}

impl<C: Connection> EnrichTools<C> {
    pub const fn new(enricher: Arc<Enricher>, store: Arc<DataStore<C>>) -> Self {
        Self { enricher, store }
    }
}

#[async_trait]
impl<C> ToolModule for EnrichTools<C>
where
    C: Connection + Send + Sync + 'static,
{
    fn descriptors(&self) -> Vec<Tool> {
        vec![helpers::tool(
            ENRICH_COMPANY,
            "Fetch company data from an external URL. External targets only; records a snapshot when a lead_id is given.",
            json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "Enrichment source URL; must resolve to a public host."
                    },
                    "lead_id": {
                        "type": "string",
                        "description": "Optional lead to record the snapshot against."
                    },
                    "max_summary_chars": {
                        "type": "integer",
                        "description": "Character budget for the extracted summary (default 600)."
                    }
                },
                "required": ["url"]
            }),
        )]
    }

    async fn call(&self, invocation: &ToolInvocation) -> Result<Dispatch, ErrorData> {
        match invocation.name.as_str() {
            ENRICH_COMPANY => {
                let params: EnrichCompanyParams = helpers::parse_params(invocation)?;
                let max_summary_chars =
                    params.max_summary_chars.unwrap_or(DEFAULT_SUMMARY_CHARS);
                let enrichment = self
                    .enricher
                    .fetch_company(&params.url, max_summary_chars)
                    .await
                    .map_err(map_enrich_err)?;

                if let Some(lead_id) = params
                    .lead_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                {
                    let control = self.store.control().await.map_err(helpers::map_store_err)?;
                    control
                        .record_enrichment(RecordEnrichmentRequest {
                            lead_id: lead_id.to_string(),
                            source_url: enrichment.source_url.clone(),
                            name: enrichment.name.clone(),
                            summary: enrichment.summary.clone(),
                            payload: Some(enrichment.payload.clone()),
                        })
                        .await
                        .map_err(helpers::map_control_err)?;
                }

                Ok(Dispatch::Handled(CallToolResult::success(vec![
                    Content::json(enrichment)?,
                ])))
            }
            _ => Ok(Dispatch::NotHandled),
        }
    }
}

fn map_enrich_err(err: EnrichError) -> ErrorData {
    match err {
        EnrichError::Guard(guard_err) => helpers::invalid_params(guard_err.to_string()),
        EnrichError::Call(call_err) => helpers::internal_error(call_err.to_string()),
    }
}
