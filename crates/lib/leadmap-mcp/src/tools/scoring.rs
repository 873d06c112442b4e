use async_trait::async_trait;
use leadmap_core::knowledge::{self, ScoreInput};
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::json;

use crate::helpers;
use crate::router::{Dispatch, ToolInvocation, ToolModule};

const SCORE_LEAD: &str = "score_lead";

/// Deterministic lead-fit scoring over the knowledge weights.
pub struct ScoringTools;

#[async_trait]
impl ToolModule for ScoringTools {
    fn descriptors(&self) -> Vec<Tool> {
        vec![helpers::tool(
            SCORE_LEAD,
            "Compute a 0-100 fit score for a lead with a component breakdown.",
            json!({
                "type": "object",
                "properties": {
                    "sector": {
                        "type": "string",
                        "description": "Sector name used for the fit component."
                    },
                    "employee_count": {
                        "type": "integer",
                        "description": "Company head count."
                    },
                    "has_funding": {
                        "type": "boolean",
                        "description": "Whether the company has raised funding."
                    },
                    "signals": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Observed buying signals."
                    }
                },
                "required": ["sector"]
            }),
        )]
    }

    async fn call(&self, invocation: &ToolInvocation) -> Result<Dispatch, ErrorData> {
        match invocation.name.as_str() {
            SCORE_LEAD => {
                let input: ScoreInput = helpers::parse_params(invocation)?;
                let breakdown = knowledge::score_lead(&input);
                Ok(Dispatch::Handled(CallToolResult::success(vec![
                    Content::json(breakdown)?,
                ])))
            }
            _ => Ok(Dispatch::NotHandled),
        }
    }
}
