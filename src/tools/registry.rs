//! Tool registry - manages and dispatches tool calls
//!
//! Central hub for registering domain tools and routing tool invocation
//! requests to handlers. Built once per worker agent at construction time
//! and immutable afterwards.
//!
//! Dispatch never raises: unknown tools and invalid arguments come back as
//! failure results so the worker loop can feed them to the model for
//! self-correction.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{ToolCall, ToolDefinition, ToolResult};

/// Handler for a registered tool
///
/// Handlers are synchronous functions over the domain record stores; all
/// failure paths must return descriptive text rather than panic.
pub type ToolHandler = Arc<dyn Fn(&ToolCall) -> String + Send + Sync>;

/// A tool descriptor: definition, dispatch policy, and handler
pub struct RegisteredTool {
    /// Declared definition (name, description, argument schema)
    pub definition: ToolDefinition,
    /// Whether the handler's result becomes the final reply immediately
    pub direct_return: bool,
    /// Handler over the domain stores
    handler: ToolHandler,
}

/// Registry of tools available to one worker agent
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register<F>(&mut self, definition: ToolDefinition, direct_return: bool, handler: F)
    where
        F: Fn(&ToolCall) -> String + Send + Sync + 'static,
    {
        let name = definition.function.name.clone();
        self.tools.insert(
            name,
            RegisteredTool {
                definition,
                direct_return,
                handler: Arc::new(handler),
            },
        );
    }

    /// Get all tool definitions for gateway binding
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition.clone()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry has no tools
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Whether a tool's result is surfaced directly as the final reply
    pub fn is_direct_return(&self, name: &str) -> bool {
        self.tools.get(name).map(|t| t.direct_return).unwrap_or(false)
    }

    /// Dispatch a tool invocation request
    ///
    /// Validates the tool name and arguments, then runs the handler.
    pub fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let tool = match self.tools.get(&call.name) {
            Some(t) => t,
            None => {
                return ToolResult::failure(
                    &call.name,
                    format!("Unknown tool: {}", call.name),
                )
            }
        };

        if let Err(reason) = validate_arguments(&tool.definition, call) {
            return ToolResult::failure(&call.name, reason);
        }

        ToolResult::success(&call.name, (tool.handler)(call))
    }
}

/// Validate presence and primitive type of required arguments
///
/// Only type and presence are enforced; parameter descriptions exist to
/// prime the model's argument generation, not to constrain values.
fn validate_arguments(
    definition: &ToolDefinition,
    call: &ToolCall,
) -> std::result::Result<(), String> {
    let schema = &definition.function.parameters;
    let properties = schema.get("properties").and_then(|p| p.as_object());

    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    for param in required {
        let value = match call.arguments.get(param) {
            Some(v) if !v.is_null() => v,
            _ => return Err(format!("Missing required argument: {}", param)),
        };

        let expected = properties
            .and_then(|p| p.get(param))
            .and_then(|prop| prop.get("type"))
            .and_then(|t| t.as_str());

        let matches = match expected {
            Some("string") => value.is_string(),
            Some("array") => value.is_array(),
            Some("integer") | Some("number") => value.is_number(),
            Some("boolean") => value.is_boolean(),
            _ => true,
        };

        if !matches {
            return Err(format!(
                "Argument '{}' has the wrong type (expected {})",
                param,
                expected.unwrap_or("unknown")
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(
            ToolDefinition::function(
                "check_property_availability",
                "Check if a property is available or unavailable for rent.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "The id of the property to check availability"
                        }
                    },
                    "required": ["id"]
                }),
            ),
            true,
            |call| format!("looked up {}", call.get_string("id").unwrap_or_default()),
        );
        registry
    }

    #[test]
    fn test_dispatch_success() {
        let registry = lookup_registry();
        let result = registry.dispatch(&ToolCall::new(
            "check_property_availability",
            serde_json::json!({"id": "123"}),
        ));
        assert!(result.success);
        assert_eq!(result.output, "looked up 123");
        assert!(registry.is_direct_return("check_property_availability"));
    }

    #[test]
    fn test_dispatch_unknown_tool() {
        let registry = lookup_registry();
        let result = registry.dispatch(&ToolCall::new("no_such_tool", serde_json::json!({})));
        assert!(!result.success);
        assert!(result.output.contains("Unknown tool"));
        assert!(!registry.is_direct_return("no_such_tool"));
    }

    #[test]
    fn test_dispatch_missing_argument() {
        let registry = lookup_registry();
        let result = registry.dispatch(&ToolCall::new(
            "check_property_availability",
            serde_json::json!({}),
        ));
        assert!(!result.success);
        assert!(result.output.contains("Missing required argument: id"));
    }

    #[test]
    fn test_dispatch_mistyped_argument() {
        let registry = lookup_registry();
        let result = registry.dispatch(&ToolCall::new(
            "check_property_availability",
            serde_json::json!({"id": 123}),
        ));
        assert!(!result.success);
        assert!(result.output.contains("wrong type"));
    }
}
