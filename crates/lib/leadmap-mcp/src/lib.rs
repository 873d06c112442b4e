//! MCP server implementation for leadmap.
//!
//! This crate assembles the domain tool modules into a single router and
//! exposes the MCP-facing surface: the aggregated catalogue answers list
//! requests directly, and call requests flow through chain dispatch.

mod helpers;
pub mod router;
pub mod server;
pub mod tools;

use std::sync::Arc;

use leadmap_core::enrich::Enricher;
use leadmap_core::services::DataStore;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData, ServerHandler};
use surrealdb::Connection;

use crate::router::{RouterError, ToolInvocation, ToolModule, ToolRouter};
use crate::tools::context::ContextTools;
use crate::tools::enrich::EnrichTools;
use crate::tools::knowledge::KnowledgeTools;
use crate::tools::leads::LeadTools;
use crate::tools::scoring::ScoringTools;

const SERVER_INSTRUCTIONS: &str = r"leadmap provides MCP tools for lead research, enrichment, scoring, and storage.

Workflow:
1. Explore the knowledge base: `list_sectors` and `sector_profile` describe
   how each sector buys and which channels work.
2. Score a prospect with `score_lead` (sector, head count, funding, signals).
3. Enrich a company with `enrich_company`; the URL must resolve to a public
   host, and passing `lead_id` records the snapshot against that lead.
4. Persist pipeline state with `save_lead`, `get_lead`, `list_leads`,
   `search_leads`, and `list_enrichments`.

Notes:
- Lead ids are derived from the domain or company name when not supplied,
  lowercased with runs of punctuation collapsed to dashes (acme.dev -> acme-dev).
- `save_lead` merges: existing fields survive unless the call provides a
  replacement, and signals are deduplicated case-insensitively.
- `search_leads` accepts `*` wildcards over company, domain, and sector.
- `health` returns `ok`.";

/// MCP server wrapper around the tool router.
#[derive(Clone)]
pub struct LeadmapMcp {
    tool_router: Arc<ToolRouter>,
}

impl LeadmapMcp {
    /// Assembles the server with every domain tool module registered.
    ///
    /// # Errors
    /// Returns `RouterError` if two modules claim the same tool name.
    pub fn new<C>(store: Arc<DataStore<C>>) -> Result<Self, RouterError>
    where
        C: Connection + Send + Sync + 'static,
    {
        let enricher = Arc::new(Enricher::new());
        let modules: Vec<Arc<dyn ToolModule>> = vec![
            Arc::new(ContextTools),
            Arc::new(KnowledgeTools),
            Arc::new(ScoringTools),
            Arc::new(EnrichTools::new(enricher, store.clone())),
            Arc::new(LeadTools::new(store)),
        ];
        Ok(Self {
            tool_router: Arc::new(ToolRouter::new(modules)?),
        })
    }

    /// The assembled tool router.
    #[must_use]
    pub fn router(&self) -> &ToolRouter {
        &self.tool_router
    }
}

impl ServerHandler for LeadmapMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: self.tool_router.list_tools(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let invocation = ToolInvocation {
            name: request.name.to_string(),
            arguments: request.arguments.unwrap_or_default(),
        };
        self.tool_router.dispatch(&invocation).await
    }
}
