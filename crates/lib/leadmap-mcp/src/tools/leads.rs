use std::sync::Arc;

use async_trait::async_trait;
use leadmap_core::control::{LeadControlPlane, SaveLeadRequest};
use leadmap_core::services::DataStore;
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, Tool};
use serde::{Deserialize, Serialize};
use serde_json::json;
use surrealdb::Connection;

use crate::helpers;
use crate::router::{Dispatch, ToolInvocation, ToolModule};

const SAVE_LEAD: &str = "save_lead";
const GET_LEAD: &str = "get_lead";
const LIST_LEADS: &str = "list_leads";
const SEARCH_LEADS: &str = "search_leads";
const LIST_ENRICHMENTS: &str = "list_enrichments";

const DEFAULT_LIST_LIMIT: usize = 200;

/// Parameters for fetching a lead by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetLeadParams {
    pub lead_id: String,
}

/// Parameters for listing stored leads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListLeadsParams {
    pub limit: Option<usize>,
}

/// Parameters for searching leads by wildcard pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchLeadsParams {
    pub pattern: String,
    pub limit: Option<usize>,
}

/// Parameters for listing enrichment snapshots of a lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEnrichmentsParams {
    pub lead_id: String,
    pub limit: Option<usize>,
}

/// Lead persistence tools over the shared data store.
pub struct LeadTools<C: Connection> {
    store: Arc<DataStore<C>>,
}

impl<C: Connection> LeadTools<C> {
    pub const fn new(store: Arc<DataStore<C>>) -> Self {
        Self { store }
    }

    async fn control(&self) -> Result<LeadControlPlane<C>, ErrorData> {
        self.store.control().await.map_err(helpers::map_store_err)
    }
}

#[async_trait]
impl<C> ToolModule for LeadTools<C>
where
    C: Connection + Send + Sync + 'static,
{
    fn descriptors(&self) -> Vec<Tool> {
        vec![
            helpers::tool(
                SAVE_LEAD,
                "Create or update a lead. Merges fields and signals into any existing record.",
                json!({
                    "type": "object",
                    "properties": {
                        "lead_id": {
                            "type": "string",
                            "description": "Explicit lead id; derived from domain or company when absent."
                        },
                        "company": {"type": "string"},
                        "domain": {"type": "string"},
                        "sector": {"type": "string"},
                        "employee_count": {"type": "integer"},
                        "has_funding": {"type": "boolean"},
                        "score": {"type": "number"},
                        "status": {
                            "type": "string",
                            "description": "Pipeline status, e.g. new, qualified, contacted, disqualified."
                        },
                        "notes": {"type": "string"},
                        "signals": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Buying signals; merged and deduplicated."
                        }
                    }
                }),
            ),
            helpers::tool(
                GET_LEAD,
                "Fetch a lead by id.",
                json!({
                    "type": "object",
                    "properties": {
                        "lead_id": {"type": "string"}
                    },
                    "required": ["lead_id"]
                }),
            ),
            helpers::tool(
                LIST_LEADS,
                "List stored leads.",
                json!({
                    "type": "object",
                    "properties": {
                        "limit": {"type": "integer"}
                    }
                }),
            ),
            helpers::tool(
                SEARCH_LEADS,
                "Search leads by company, domain, or sector wildcard pattern (e.g. acme*).",
                json!({
                    "type": "object",
                    "properties": {
                        "pattern": {"type": "string"},
                        "limit": {"type": "integer"}
                    },
                    "required": ["pattern"]
                }),
            ),
            helpers::tool(
                LIST_ENRICHMENTS,
                "List enrichment snapshots recorded for a lead, newest first.",
                json!({
                    "type": "object",
                    "properties": {
                        "lead_id": {"type": "string"},
                        "limit": {"type": "integer"}
                    },
                    "required": ["lead_id"]
                }),
            ),
        ]
    }

    async fn call(&self, invocation: &ToolInvocation) -> Result<Dispatch, ErrorData> {
        match invocation.name.as_str() {
            SAVE_LEAD => {
                let request: SaveLeadRequest = helpers::parse_params(invocation)?;
                let lead = self
                    .control()
                    .await?
                    .save_lead(request)
                    .await
                    .map_err(helpers::map_control_err)?;
                Ok(Dispatch::Handled(CallToolResult::success(vec![
                    Content::json(lead)?,
                ])))
            }
            GET_LEAD => {
                let params: GetLeadParams = helpers::parse_params(invocation)?;
                let lead = self
                    .control()
                    .await?
                    .get_lead(&params.lead_id)
                    .await
                    .map_err(helpers::map_control_err)?;
                Ok(Dispatch::Handled(CallToolResult::success(vec![
                    Content::json(lead)?,
                ])))
            }
            LIST_LEADS => {
                let params: ListLeadsParams = helpers::parse_params(invocation)?;
                let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
                let leads = self
                    .control()
                    .await?
                    .list_leads(limit)
                    .await
                    .map_err(helpers::map_control_err)?;
                Ok(Dispatch::Handled(CallToolResult::success(vec![
                    Content::json(leads)?,
                ])))
            }
            SEARCH_LEADS => {
                let params: SearchLeadsParams = helpers::parse_params(invocation)?;
                let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
                let leads = self
                    .control()
                    .await?
                    .search_leads(&params.pattern, limit)
                    .await
                    .map_err(helpers::map_control_err)?;
                Ok(Dispatch::Handled(CallToolResult::success(vec![
                    Content::json(leads)?,
                ])))
            }
            LIST_ENRICHMENTS => {
                let params: ListEnrichmentsParams = helpers::parse_params(invocation)?;
                let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
                let records = self
                    .control()
                    .await?
                    .list_enrichments(&params.lead_id, limit)
                    .await
                    .map_err(helpers::map_control_err)?;
                Ok(Dispatch::Handled(CallToolResult::success(vec![
                    Content::json(records)?,
                ])))
            }
            _ => Ok(Dispatch::NotHandled),
        }
    }
}
