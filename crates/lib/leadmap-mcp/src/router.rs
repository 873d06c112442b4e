//! Tool catalogue aggregation and invocation dispatch.
//!
//! Domain modules are independent: each contributes its descriptors and a
//! handler, and the router tries handlers in registration order until one
//! claims the invocation. Name collisions across modules are rejected when
//! the router is assembled, so chain order never silently shadows a tool.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde_json::json;

/// One tool call as received from the protocol layer.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: JsonObject,
}

/// Outcome of offering an invocation to one module.
pub enum Dispatch {
    Handled(CallToolResult),
    NotHandled,
}

/// A domain module contributing tools to the catalogue.
///
/// Descriptors are built once at startup and must stay immutable; a handler
/// returns `Dispatch::NotHandled` for names it does not own.
#[async_trait]
pub trait ToolModule: Send + Sync {
    fn descriptors(&self) -> Vec<Tool>;

    async fn call(&self, invocation: &ToolInvocation) -> Result<Dispatch, ErrorData>;
}

#[derive(Debug)]
pub enum RouterError {
    DuplicateToolName(String),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateToolName(name) => {
                write!(f, "duplicate tool name across modules: {name}")
            }
        }
    }
}

impl Error for RouterError {}

/// Ordered chain of tool modules with a uniqueness-checked catalogue.
pub struct ToolRouter {
    modules: Vec<Arc<dyn ToolModule>>,
}

impl ToolRouter {
    /// Assembles the router, validating that no two modules claim the same
    /// tool name.
    ///
    /// # Errors
    /// Returns `RouterError::DuplicateToolName` on the first collision.
    pub fn new(modules: Vec<Arc<dyn ToolModule>>) -> Result<Self, RouterError> {
        let mut seen = HashSet::new();
        for module in &modules {
            for tool in module.descriptors() {
                let name = tool.name.to_string();
                if !seen.insert(name.clone()) {
                    return Err(RouterError::DuplicateToolName(name));
                }
            }
        }
        Ok(Self { modules })
    }

    /// Every module's descriptors, concatenated in registration order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.modules
            .iter()
            .flat_map(|module| module.descriptors())
            .collect()
    }

    /// Offers the invocation to each module in order; the first `Handled`
    /// result wins. When every module declines, a well-formed unknown-tool
    /// payload is returned through the success channel so the protocol never
    /// sees an unhandled fault for this case.
    ///
    /// # Errors
    /// Returns `ErrorData` only when an owning handler fails.
    pub async fn dispatch(&self, invocation: &ToolInvocation) -> Result<CallToolResult, ErrorData> {
        for module in &self.modules {
            match module.call(invocation).await? {
                Dispatch::Handled(result) => return Ok(result),
                Dispatch::NotHandled => {}
            }
        }
        let payload = json!({ "error": format!("Unknown tool: {}", invocation.name) });
        Ok(CallToolResult::success(vec![Content::text(
            payload.to_string(),
        )]))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn invocation(name: &str) -> ToolInvocation {
        ToolInvocation {
            name: name.to_string(),
            arguments: JsonObject::new(),
        }
    }

    fn descriptor(name: &'static str) -> Tool {
        let schema = match json!({"type": "object", "properties": {}}) {
            serde_json::Value::Object(map) => map,
            _ => JsonObject::new(),
        };
        Tool::new(name, "test tool", Arc::new(schema))
    }

    struct DeclineAll {
        name: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ToolModule for DeclineAll {
        fn descriptors(&self) -> Vec<Tool> {
            vec![descriptor(self.name)]
        }

        async fn call(&self, _invocation: &ToolInvocation) -> Result<Dispatch, ErrorData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Dispatch::NotHandled)
        }
    }

    struct HandlesOne {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl ToolModule for HandlesOne {
        fn descriptors(&self) -> Vec<Tool> {
            vec![descriptor(self.name)]
        }

        async fn call(&self, invocation: &ToolInvocation) -> Result<Dispatch, ErrorData> {
            if invocation.name == self.name {
                Ok(Dispatch::Handled(CallToolResult::success(vec![
                    Content::text(self.reply),
                ])))
            } else {
                Ok(Dispatch::NotHandled)
            }
        }
    }

    fn first_text(result: &CallToolResult) -> String {
        let content = result.content.first().expect("result should carry content");
        content
            .as_text()
            .expect("content should be text")
            .text
            .clone()
    }

    #[tokio::test]
    async fn later_module_handles_after_earlier_declines() {
        let decliner = Arc::new(DeclineAll {
            name: "first_tool",
            calls: AtomicUsize::new(0),
        });
        let router = ToolRouter::new(vec![
            decliner.clone(),
            Arc::new(HandlesOne {
                name: "x",
                reply: "handled-x",
            }),
        ])
        .expect("unique names");

        let result = router
            .dispatch(&invocation("x"))
            .await
            .expect("dispatch should succeed");

        assert_eq!(first_text(&result), "handled-x");
        assert_eq!(decliner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_tool_yields_structured_error_payload() {
        let router = ToolRouter::new(vec![Arc::new(HandlesOne {
            name: "x",
            reply: "handled-x",
        }) as Arc<dyn ToolModule>])
        .expect("unique names");

        let result = router
            .dispatch(&invocation("nope"))
            .await
            .expect("dispatch should not fault");

        assert_eq!(first_text(&result), r#"{"error":"Unknown tool: nope"}"#);
    }

    #[tokio::test]
    async fn duplicate_names_fail_at_assembly() {
        let err = ToolRouter::new(vec![
            Arc::new(HandlesOne {
                name: "x",
                reply: "a",
            }) as Arc<dyn ToolModule>,
            Arc::new(HandlesOne {
                name: "x",
                reply: "b",
            }),
        ])
        .expect_err("duplicate names should be rejected");

        assert!(matches!(err, RouterError::DuplicateToolName(name) if name == "x"));
    }

    #[tokio::test]
    async fn catalogue_preserves_registration_order() {
        let router = ToolRouter::new(vec![
            Arc::new(HandlesOne {
                name: "alpha",
                reply: "a",
            }) as Arc<dyn ToolModule>,
            Arc::new(HandlesOne {
                name: "beta",
                reply: "b",
            }),
        ])
        .expect("unique names");

        let names: Vec<String> = router
            .list_tools()
            .iter()
            .map(|tool| tool.name.to_string())
            .collect();
        assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
    }
}
