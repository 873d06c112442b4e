use async_trait::async_trait;
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, Tool};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::helpers;
use crate::router::{Dispatch, ToolInvocation, ToolModule};

const HEALTH: &str = "health";
const HELP: &str = "help";

/// Payload listing the MCP commands this server exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpCommands {
    pub commands: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            commands: vec![
                "help - List the MCP commands this server exposes.".to_string(),
                "health - Health check. Returns 'ok'.".to_string(),
                "list_sectors - List the sectors with a go-to-market profile.".to_string(),
                "sector_profile - Fetch the go-to-market profile for a sector.".to_string(),
                "score_lead - Compute a 0-100 fit score with a component breakdown.".to_string(),
                "enrich_company - Fetch company data from an external URL; records it when a lead_id is given.".to_string(),
                "save_lead - Create or update a lead; merges fields and signals.".to_string(),
                "get_lead - Fetch a lead by id.".to_string(),
                "list_leads - List stored leads.".to_string(),
                "search_leads - Search leads by company, domain, or sector pattern.".to_string(),
                "list_enrichments - List enrichment snapshots recorded for a lead.".to_string(),
            ],
        }
    }
}

/// Contextual tools: health probe and catalogue help.
pub struct ContextTools;

#[async_trait]
impl ToolModule for ContextTools {
    fn descriptors(&self) -> Vec<Tool> {
        vec![
            helpers::tool(
                HEALTH,
                "Health check. Returns 'ok'.",
                json!({"type": "object", "properties": {}}),
            ),
            helpers::tool(
                HELP,
                "List the MCP commands this server exposes.",
                json!({"type": "object", "properties": {}}),
            ),
        ]
    }

    async fn call(&self, invocation: &ToolInvocation) -> Result<Dispatch, ErrorData> {
        match invocation.name.as_str() {
            HEALTH => Ok(Dispatch::Handled(CallToolResult::success(vec![
                Content::text("ok"),
            ]))),
            HELP => Ok(Dispatch::Handled(CallToolResult::success(vec![
                Content::json(HelpCommands::default())?,
            ]))),
            _ => Ok(Dispatch::NotHandled),
        }
    }
}
