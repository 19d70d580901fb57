//! Gateway module - Language Model Gateway integrations
//!
//! Provides the chat gateway abstraction with Ollama as the primary backend.

pub mod ollama;
pub mod traits;

pub use ollama::OllamaGateway;
pub use traits::{ChatGateway, GatewayResponse, GenerateOptions, TokenUsage};
