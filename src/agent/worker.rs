//! Worker agents
//!
//! A worker agent is a bounded tool-using reasoning loop specialized to one
//! conversational sub-domain: a fixed persona, one gateway binding, and one
//! immutable tool registry, all set at construction time. Workers are plain
//! data records built through a builder; specialization is configuration,
//! not subclassing.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::agent::conversation::Conversation;
use crate::core::{Config, Message, Result};
use crate::gateway::{ChatGateway, GenerateOptions};
use crate::tools::ToolRegistry;

/// Reply returned when the tool loop exhausts its iteration cap
const DEGRADED_REPLY: &str =
    "I wasn't able to complete that request. Could you try rephrasing it?";

/// A specialized worker agent
pub struct Worker {
    /// Name of this worker (the supervisor routes by this identifier)
    name: String,
    /// Persona system instruction, fixed for the process lifetime
    persona: String,
    /// Gateway binding
    gateway: Arc<dyn ChatGateway>,
    /// Model to use
    model: String,
    /// Sampling temperature for this worker's calls
    temperature: f32,
    /// Tool registry, immutable after construction
    tools: Arc<ToolRegistry>,
    /// Maximum tool-loop iterations per run
    max_tool_iterations: usize,
}

/// Builder for creating Workers
pub struct WorkerBuilder {
    name: String,
    gateway: Arc<dyn ChatGateway>,
    persona: Option<String>,
    model: Option<String>,
    temperature: f32,
    tools: Option<Arc<ToolRegistry>>,
    max_tool_iterations: usize,
}

impl WorkerBuilder {
    /// Create a new builder with the given name and gateway binding
    pub fn new(name: impl Into<String>, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            name: name.into(),
            gateway,
            persona: None,
            model: None,
            temperature: 0.0,
            tools: None,
            max_tool_iterations: 8,
        }
    }

    /// Set the persona system instruction
    pub fn persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    /// Set the model to use
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the tool registry
    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set the maximum tool-loop iterations
    pub fn max_tool_iterations(mut self, max: usize) -> Self {
        self.max_tool_iterations = max;
        self
    }

    /// Build the Worker
    pub fn build(self) -> Worker {
        Worker {
            persona: self.persona.unwrap_or_else(|| {
                format!(
                    "You are a helpful assistant named '{}'. Complete the task you are given.",
                    self.name
                )
            }),
            model: self
                .model
                .unwrap_or_else(|| Config::default().models.worker),
            temperature: self.temperature,
            tools: self.tools.unwrap_or_else(|| Arc::new(ToolRegistry::new())),
            max_tool_iterations: self.max_tool_iterations,
            name: self.name,
            gateway: self.gateway,
        }
    }
}

impl Worker {
    /// Create a builder for a new worker
    pub fn builder(name: impl Into<String>, gateway: Arc<dyn ChatGateway>) -> WorkerBuilder {
        WorkerBuilder::new(name, gateway)
    }

    /// Get the name of this worker
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The model this worker is bound to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the worker against the current conversation state
    ///
    /// Reads the full history and returns exactly one new assistant message
    /// attributed to this worker; the conversation itself is never mutated
    /// here. The internal tool loop is bounded: when the cap is reached
    /// without a terminal reply, a degraded message is returned so the turn
    /// is never left unresolved.
    pub async fn run(&self, conversation: &Conversation) -> Result<Message> {
        let mut exchange: Vec<Message> = Vec::with_capacity(conversation.len() + 2);
        exchange.push(Message::system(&self.persona));
        exchange.extend(conversation.messages().cloned());

        let definitions = self.tools.definitions();

        for iteration in 0..self.max_tool_iterations {
            let options = Some(GenerateOptions {
                temperature: Some(self.temperature),
                ..Default::default()
            });

            let response = if definitions.is_empty() {
                self.gateway.chat(&self.model, &exchange, options).await?
            } else {
                self.gateway
                    .chat_with_tools(&self.model, &exchange, &definitions, options)
                    .await?
            };

            // Plain text means the model considers the task complete
            let Some(call) = response.tool_calls.first().cloned() else {
                if response.content.is_empty() {
                    return Ok(self.degraded_reply());
                }
                return Ok(Message::assistant(response.content).authored_by(&self.name));
            };

            debug!(
                target: "switchboard::worker",
                worker = %self.name,
                iteration,
                tool = %call.name,
                "dispatching tool"
            );

            let result = self.tools.dispatch(&call);

            // A direct-return tool's result is the answer: one phrasing call,
            // then done. The first tool call in the response is the one
            // honored. Failed dispatches (unknown tool, bad arguments) fall
            // through so the model can self-correct.
            if result.success && self.tools.is_direct_return(&call.name) {
                let reply = self.phrase(&result.output).await?;
                return Ok(Message::assistant(reply).authored_by(&self.name));
            }

            exchange.push(Message::assistant(response.content).with_tool_calls(vec![call]));
            exchange.push(Message::tool(result.output));
        }

        warn!(
            target: "switchboard::worker",
            worker = %self.name,
            cap = self.max_tool_iterations,
            "tool loop cap reached without a terminal reply"
        );
        Ok(self.degraded_reply())
    }

    /// Phrase raw tool data as a user-facing reply
    async fn phrase(&self, data: &str) -> Result<String> {
        let prompt = format!(
            "Respond to the user using the following data: <data>{}</data> \
             Do not use a tool call to answer, just respond to the user using \
             the data provided.",
            data
        );
        let messages = vec![Message::system(&self.persona), Message::user(prompt)];

        let response = self
            .gateway
            .chat(
                &self.model,
                &messages,
                Some(GenerateOptions {
                    temperature: Some(self.temperature),
                    ..Default::default()
                }),
            )
            .await?;

        if response.content.is_empty() {
            Ok(data.to_string())
        } else {
            Ok(response.content)
        }
    }

    /// The degraded reply for an unresolvable run, attributed to this worker
    fn degraded_reply(&self) -> Message {
        Message::assistant(DEGRADED_REPLY).authored_by(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::OllamaGateway;

    #[test]
    fn test_worker_builder_defaults() {
        let gateway = Arc::new(OllamaGateway::with_base_url("http://localhost:11434"));
        let worker = Worker::builder("test_agent", gateway)
            .max_tool_iterations(3)
            .build();

        assert_eq!(worker.name(), "test_agent");
        assert_eq!(worker.max_tool_iterations, 3);
        assert!(worker.persona.contains("test_agent"));
        assert!(worker.tools.is_empty());
    }

    #[test]
    fn test_worker_builder_persona() {
        let gateway = Arc::new(OllamaGateway::with_base_url("http://localhost:11434"));
        let worker = Worker::builder("property_agent", gateway)
            .persona("Act as a helpful assistant for property management")
            .temperature(0.7)
            .model("qwen3:4b")
            .build();

        assert_eq!(worker.persona, "Act as a helpful assistant for property management");
        assert_eq!(worker.model(), "qwen3:4b");
    }
}
