#![allow(dead_code)]
//! Shared test support: a scripted gateway stub
//!
//! Responses are queued per gateway method so tests can script an exact
//! exchange and assert how many calls each component made. An exhausted
//! queue is an error unless a repeating default was set for that method.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use switchboard::core::{EngineError, Message, Result, ToolCall, ToolDefinition};
use switchboard::gateway::{ChatGateway, GatewayResponse, GenerateOptions};

#[derive(Default)]
pub struct ScriptedGateway {
    classify_queue: Mutex<VecDeque<GatewayResponse>>,
    chat_queue: Mutex<VecDeque<GatewayResponse>>,
    with_tools_queue: Mutex<VecDeque<GatewayResponse>>,
    chat_default: Mutex<Option<GatewayResponse>>,
    with_tools_default: Mutex<Option<GatewayResponse>>,
    pub classify_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
    pub with_tools_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a routing answer naming the next worker
    pub fn route_to(&self, target: &str) {
        self.push_classify(GatewayResponse::text(format!(r#"{{"next": "{}"}}"#, target)));
    }

    pub fn push_classify(&self, response: GatewayResponse) {
        self.classify_queue.lock().unwrap().push_back(response);
    }

    pub fn push_chat(&self, response: GatewayResponse) {
        self.chat_queue.lock().unwrap().push_back(response);
    }

    pub fn push_with_tools(&self, response: GatewayResponse) {
        self.with_tools_queue.lock().unwrap().push_back(response);
    }

    /// Repeat this response whenever the chat queue is empty
    pub fn set_chat_default(&self, response: GatewayResponse) {
        *self.chat_default.lock().unwrap() = Some(response);
    }

    /// Repeat this response whenever the tools queue is empty
    pub fn set_with_tools_default(&self, response: GatewayResponse) {
        *self.with_tools_default.lock().unwrap() = Some(response);
    }

    fn next(
        queue: &Mutex<VecDeque<GatewayResponse>>,
        default: Option<&Mutex<Option<GatewayResponse>>>,
        method: &str,
    ) -> Result<GatewayResponse> {
        if let Some(response) = queue.lock().unwrap().pop_front() {
            return Ok(response);
        }
        if let Some(default) = default {
            if let Some(response) = default.lock().unwrap().clone() {
                return Ok(response);
            }
        }
        Err(EngineError::gateway(format!("script exhausted for {}", method)))
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    async fn chat(
        &self,
        _model: &str,
        _messages: &[Message],
        _options: Option<GenerateOptions>,
    ) -> Result<GatewayResponse> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.chat_queue, Some(&self.chat_default), "chat")
    }

    async fn chat_with_tools(
        &self,
        _model: &str,
        _messages: &[Message],
        _tools: &[ToolDefinition],
        _options: Option<GenerateOptions>,
    ) -> Result<GatewayResponse> {
        self.with_tools_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(
            &self.with_tools_queue,
            Some(&self.with_tools_default),
            "chat_with_tools",
        )
    }

    async fn classify(
        &self,
        _model: &str,
        _messages: &[Message],
        _schema: &serde_json::Value,
        _options: Option<GenerateOptions>,
    ) -> Result<GatewayResponse> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.classify_queue, None, "classify")
    }

    async fn is_model_available(&self, _model: &str) -> Result<bool> {
        Ok(true)
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Convenience: a tool-call response for the given tool and arguments
pub fn tool_call_response(name: &str, arguments: serde_json::Value) -> GatewayResponse {
    GatewayResponse::tool_call(ToolCall::new(name, arguments))
}
