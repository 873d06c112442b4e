//! Daemon entry point for the leadmap MCP server.
//!
//! Loads configuration from CLI arguments and the environment, wires the
//! lazily connected data store into the tool modules, and serves the MCP
//! protocol over stdio or streamable HTTP.

mod config;
mod store;

use std::sync::Arc;

use leadmap_mcp::LeadmapMcp;
use leadmap_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::LeadmapConfig;
use crate::store::build_data_store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config = LeadmapConfig::from_args()?;
    let data_store = Arc::new(build_data_store(&config));
    let service = LeadmapMcp::new(data_store)?;

    if config.serve_http {
        let http_config = McpHttpServerConfig::new(config.mcp_http_addr);
        info!("leadmap-mcpd serving streamable HTTP on {}", config.mcp_http_addr);
        serve_streamable_http(service, http_config).await?;
    } else {
        info!("leadmap-mcpd serving stdio");
        serve_stdio(service).await?;
    }
    Ok(())
}

// Logs go to stderr so the stdio transport keeps stdout for the protocol.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
