//! Chat gateway trait for abstracting different model backends
//!
//! Enables swapping between Ollama, OpenAI-compatible servers, etc.
//! The engine treats the gateway as an opaque capability: given a message
//! list and optional tool declarations, it returns either free text or a
//! tool invocation request.

use async_trait::async_trait;

use crate::core::{Message, Result, ToolCall, ToolDefinition};

/// Response from a chat gateway
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    /// Text content of the response
    pub content: String,
    /// Any tool calls the model wants to make
    pub tool_calls: Vec<ToolCall>,
    /// Token usage information
    pub usage: Option<TokenUsage>,
    /// Model that generated the response
    pub model: String,
}

impl GatewayResponse {
    /// Create a plain text response (useful for stubs in tests)
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
            usage: None,
            model: String::new(),
        }
    }

    /// Create a tool-call response (useful for stubs in tests)
    pub fn tool_call(call: ToolCall) -> Self {
        Self {
            content: String::new(),
            tool_calls: vec![call],
            usage: None,
            model: String::new(),
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Options for generation
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Temperature for sampling (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Stop sequences
    pub stop: Option<Vec<String>>,
}

/// Trait for chat gateways
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Generate a response from messages
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<GenerateOptions>,
    ) -> Result<GatewayResponse>;

    /// Generate a response with tool definitions bound
    async fn chat_with_tools(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: Option<GenerateOptions>,
    ) -> Result<GatewayResponse>;

    /// Generate a completion constrained to a JSON schema
    ///
    /// Used for classification-style outputs where the answer must come
    /// from a closed set rather than free text.
    async fn classify(
        &self,
        model: &str,
        messages: &[Message],
        schema: &serde_json::Value,
        options: Option<GenerateOptions>,
    ) -> Result<GatewayResponse>;

    /// Check if a model is available
    async fn is_model_available(&self, model: &str) -> Result<bool>;

    /// List available models
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Get the gateway name
    fn name(&self) -> &str;
}
