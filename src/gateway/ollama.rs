//! Ollama gateway implementation
//!
//! Async HTTP client for the Ollama API with tool calling and
//! schema-constrained (structured) completion support.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::core::{Config, EngineError, Message, Result, ToolCall, ToolDefinition};
use crate::gateway::traits::{ChatGateway, GatewayResponse, GenerateOptions, TokenUsage};

/// Ollama API client
#[derive(Clone)]
pub struct OllamaGateway {
    client: Client,
    base_url: String,
}

/// Ollama chat request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    /// JSON schema constraining the output (structured completion)
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

/// Ollama message format
///
/// Worker attribution is an engine-internal concept; it is dropped here
/// and never sent over the wire.
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OllamaToolCall>>,
}

/// Ollama tool call format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaToolCall {
    function: OllamaFunction,
}

/// Ollama function in tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaFunction {
    name: String,
    arguments: serde_json::Value,
}

/// Ollama generation options
#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

impl From<GenerateOptions> for OllamaOptions {
    fn from(opts: GenerateOptions) -> Self {
        Self {
            temperature: opts.temperature,
            num_predict: opts.max_tokens,
            stop: opts.stop,
        }
    }
}

/// Ollama chat response (non-streaming)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: OllamaMessage,
    model: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama models list response
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

/// Model information
#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

impl OllamaGateway {
    /// Create a new gateway client from configuration
    pub fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.gateway.connect_timeout_secs))
            .timeout(Duration::from_secs(config.gateway.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.gateway_url(),
        }
    }

    /// Create a client with custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(180))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Convert internal Message to Ollama format
    fn to_ollama_message(msg: &Message) -> OllamaMessage {
        OllamaMessage {
            role: msg.role.clone(),
            content: msg.content.clone(),
            tool_calls: msg.tool_calls.as_ref().map(|calls| {
                calls
                    .iter()
                    .map(|tc| OllamaToolCall {
                        function: OllamaFunction {
                            name: tc.name.clone(),
                            arguments: tc.arguments.clone(),
                        },
                    })
                    .collect()
            }),
        }
    }

    /// Convert Ollama response to GatewayResponse
    fn to_gateway_response(response: ChatResponse) -> GatewayResponse {
        let tool_calls = response
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let usage = match (response.prompt_eval_count, response.eval_count) {
            (Some(prompt), Some(completion)) => Some(TokenUsage {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: prompt + completion,
            }),
            _ => None,
        };

        GatewayResponse {
            content: response.message.content,
            tool_calls,
            usage,
            model: response.model,
        }
    }

    /// Send a chat request and parse the response
    async fn send_chat(&self, model: &str, request: &ChatRequest<'_>) -> Result<GatewayResponse> {
        let request_json = serde_json::to_string(request)?;
        debug!(target: "switchboard::gateway", model, request = %request_json, "chat request");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    EngineError::gateway(format!(
                        "Cannot connect to Ollama at {}. Is it running?",
                        self.base_url
                    ))
                } else {
                    EngineError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 && error_text.contains("not found") {
                return Err(EngineError::ModelNotFound(model.to_string()));
            }

            return Err(EngineError::gateway(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        debug!(target: "switchboard::gateway", response = %response_text, "chat response");

        let chat_response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| EngineError::gateway(format!("Failed to parse response: {}", e)))?;

        Ok(Self::to_gateway_response(chat_response))
    }
}

#[async_trait]
impl ChatGateway for OllamaGateway {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<GenerateOptions>,
    ) -> Result<GatewayResponse> {
        let request = ChatRequest {
            model,
            messages: messages.iter().map(Self::to_ollama_message).collect(),
            tools: None,
            format: None,
            options: options.map(OllamaOptions::from),
            stream: false,
        };

        self.send_chat(model, &request).await
    }

    async fn chat_with_tools(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: Option<GenerateOptions>,
    ) -> Result<GatewayResponse> {
        let request = ChatRequest {
            model,
            messages: messages.iter().map(Self::to_ollama_message).collect(),
            tools: Some(tools),
            format: None,
            options: options.map(OllamaOptions::from),
            // Tool calling doesn't support streaming well
            stream: false,
        };

        self.send_chat(model, &request).await
    }

    async fn classify(
        &self,
        model: &str,
        messages: &[Message],
        schema: &serde_json::Value,
        options: Option<GenerateOptions>,
    ) -> Result<GatewayResponse> {
        let request = ChatRequest {
            model,
            messages: messages.iter().map(Self::to_ollama_message).collect(),
            tools: None,
            format: Some(schema),
            options: options.map(OllamaOptions::from),
            stream: false,
        };

        self.send_chat(model, &request).await
    }

    async fn is_model_available(&self, model: &str) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(models
            .iter()
            .any(|m| m == model || m.split(':').next() == model.split(':').next()))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    EngineError::gateway(format!(
                        "Cannot connect to Ollama at {}. Is it running?",
                        self.base_url
                    ))
                } else {
                    EngineError::from(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(EngineError::gateway("Failed to list models"));
        }

        let models_response: ModelsResponse = response.json().await?;
        Ok(models_response.models.into_iter().map(|m| m.name).collect())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_creation() {
        let gateway = OllamaGateway::from_config(&Config::default());
        assert_eq!(gateway.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_message_conversion() {
        let msg = Message::user("Hello");
        let ollama_msg = OllamaGateway::to_ollama_message(&msg);
        assert_eq!(ollama_msg.role, "user");
        assert_eq!(ollama_msg.content, "Hello");
    }

    #[test]
    fn test_author_not_serialized() {
        let msg = Message::assistant("data").authored_by("property_agent");
        let ollama_msg = OllamaGateway::to_ollama_message(&msg);
        let wire = serde_json::to_string(&ollama_msg).unwrap();
        assert!(!wire.contains("property_agent"));
    }
}
