use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;

const DEFAULT_DB_NAMESPACE: &str = "leadmap";
const DEFAULT_DB_NAME: &str = "crm";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4030";

#[derive(Parser, Debug)]
#[command(name = "leadmap-mcpd", version, about = "Leadmap MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "LEADMAP_DB_NAMESPACE", default_value = DEFAULT_DB_NAMESPACE)]
    db_namespace: String,

    #[arg(long, env = "LEADMAP_DB_NAME", default_value = DEFAULT_DB_NAME)]
    db_name: String,

    #[arg(long, env = "LEADMAP_DB_URL")]
    db_url: Option<String>,

    #[arg(long, env = "LEADMAP_DB_KEY")]
    db_key: Option<String>,

    #[arg(
        long = "stdio",
        env = "LEADMAP_ENABLE_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long = "http",
        env = "LEADMAP_MCP_HTTP",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    serve_http: bool,

    #[arg(long, env = "LEADMAP_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
///
/// The data-store endpoint and access key stay optional here: their absence
/// only fails when the store is first touched, not at startup.
#[derive(Clone)]
pub struct LeadmapConfig {
    pub db_namespace: String,
    pub db_name: String,
    pub db_url: Option<String>,
    pub db_key: Option<String>,
    #[allow(dead_code)]
    pub enable_stdio: bool,
    pub serve_http: bool,
    pub mcp_http_addr: SocketAddr,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSetting { name: &'static str, value: String },
    NoTransport,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
            Self::NoTransport => {
                write!(f, "no transport enabled: pass --stdio or --http")
            }
        }
    }
}

impl Error for ConfigError {}

impl LeadmapConfig {
    /// # Errors
    /// Returns `ConfigError` if the parsed arguments fail validation.
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for LeadmapConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.db_namespace.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "LEADMAP_DB_NAMESPACE",
                value: args.db_namespace,
            });
        }
        if args.db_name.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "LEADMAP_DB_NAME",
                value: args.db_name,
            });
        }
        if !args.enable_stdio && !args.serve_http {
            return Err(ConfigError::NoTransport);
        }

        let db_url = args.db_url.filter(|value| !value.trim().is_empty());
        let db_key = args.db_key.filter(|value| !value.trim().is_empty());

        Ok(Self {
            db_namespace: args.db_namespace,
            db_name: args.db_name,
            db_url,
            db_key,
            enable_stdio: args.enable_stdio,
            serve_http: args.serve_http,
            mcp_http_addr: args.mcp_http_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            db_namespace: DEFAULT_DB_NAMESPACE.to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            db_url: None,
            db_key: None,
            enable_stdio: true,
            serve_http: false,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
        }
    }

    #[test]
    fn blank_store_settings_become_absent() {
        let mut args = base_args();
        args.db_url = Some("   ".to_string());
        args.db_key = Some(String::new());

        let config = LeadmapConfig::try_from(args).expect("config should parse");

        assert!(config.db_url.is_none());
        assert!(config.db_key.is_none());
    }

    #[test]
    fn missing_store_settings_are_not_a_startup_error() {
        let config = LeadmapConfig::try_from(base_args()).expect("config should parse");
        assert!(config.db_url.is_none());
        assert!(config.enable_stdio);
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let mut args = base_args();
        args.db_namespace = "  ".to_string();
        let err = LeadmapConfig::try_from(args).expect_err("namespace should be required");
        assert!(err.to_string().contains("LEADMAP_DB_NAMESPACE"));
    }

    #[test]
    fn at_least_one_transport_is_required() {
        let mut args = base_args();
        args.enable_stdio = false;
        args.serve_http = false;
        let err = LeadmapConfig::try_from(args).expect_err("transport should be required");
        assert!(matches!(err, ConfigError::NoTransport));
    }
}
