use async_trait::async_trait;
use leadmap_core::knowledge;
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, ErrorCode, Tool};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::helpers;
use crate::router::{Dispatch, ToolInvocation, ToolModule};

const LIST_SECTORS: &str = "list_sectors";
const SECTOR_PROFILE: &str = "sector_profile";

/// Parameters for fetching a sector profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorProfileParams {
    pub sector: String,
}

/// Knowledge lookups over the static sector tables.
pub struct KnowledgeTools;

#[async_trait]
impl ToolModule for KnowledgeTools {
    fn descriptors(&self) -> Vec<Tool> {
        vec![
            helpers::tool(
                LIST_SECTORS,
                "List the sectors with a go-to-market profile.",
                json!({"type": "object", "properties": {}}),
            ),
            helpers::tool(
                SECTOR_PROFILE,
                "Fetch the go-to-market profile for a sector.",
                json!({
                    "type": "object",
                    "properties": {
                        "sector": {
                            "type": "string",
                            "description": "Sector name, e.g. saas or fintech."
                        }
                    },
                    "required": ["sector"]
                }),
            ),
        ]
    }

    async fn call(&self, invocation: &ToolInvocation) -> Result<Dispatch, ErrorData> {
        match invocation.name.as_str() {
            LIST_SECTORS => Ok(Dispatch::Handled(CallToolResult::success(vec![
                Content::json(knowledge::sector_names())?,
            ]))),
            SECTOR_PROFILE => {
                let params: SectorProfileParams = helpers::parse_params(invocation)?;
                let profile = knowledge::sector_profile(&params.sector).ok_or_else(|| {
                    helpers::mcp_err(
                        ErrorCode::RESOURCE_NOT_FOUND,
                        format!("unknown sector: {}", params.sector),
                    )
                })?;
                Ok(Dispatch::Handled(CallToolResult::success(vec![
                    Content::json(profile)?,
                ])))
            }
            _ => Ok(Dispatch::NotHandled),
        }
    }
}
