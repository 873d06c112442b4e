use std::borrow::Cow;
use std::sync::Arc;

use leadmap_core::control::ControlError;
use leadmap_core::services::DataStoreError;
use leadmap_core::store::StoreError;
use rmcp::ErrorData;
use rmcp::model::{ErrorCode, JsonObject, Tool};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::router::ToolInvocation;

pub(crate) fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub(crate) fn invalid_params(message: String) -> ErrorData {
    mcp_err(ErrorCode::INVALID_PARAMS, message)
}

pub(crate) fn internal_error(message: String) -> ErrorData {
    mcp_err(ErrorCode::INTERNAL_ERROR, message)
}

/// Builds a tool descriptor from a JSON-object schema literal.
pub(crate) fn tool(name: &'static str, description: &'static str, input_schema: Value) -> Tool {
    let schema = match input_schema {
        Value::Object(schema) => schema,
        _ => JsonObject::new(),
    };
    Tool::new(name, description, Arc::new(schema))
}

pub(crate) fn parse_params<T: DeserializeOwned>(
    invocation: &ToolInvocation,
) -> Result<T, ErrorData> {
    serde_json::from_value(Value::Object(invocation.arguments.clone())).map_err(|err| {
        invalid_params(format!("invalid arguments for {}: {err}", invocation.name))
    })
}

pub(crate) fn map_control_err(err: ControlError) -> ErrorData {
    match err {
        ControlError::Store(StoreError::InvalidInput(message)) => invalid_params(message),
        ControlError::Store(StoreError::Surreal(err)) => internal_error(err.to_string()),
    }
}

pub(crate) fn map_store_err(err: DataStoreError) -> ErrorData {
    internal_error(format!("data store unavailable: {err}"))
}
