//! Switchboard - supervisor-routed multi-agent conversation engine
//!
//! A reusable orchestration core for vertical assistant demos: a supervisor
//! routes each conversational turn to one of several specialized worker
//! agents, each of which may invoke domain tools against record stores and
//! return a reply that becomes part of the shared conversation state.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Gateway**: Language model gateway abstraction with Ollama implementation
//! - **Tools**: Tool registry with argument validation and direct-return dispatch
//! - **Agent**: Supervisor routing, worker tool loops, and the orchestrator
//! - **Domain**: Vertical assistant configurations (proptech, retail)
//! - **CLI**: Command-line chat surface
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use switchboard::core::Config;
//! use switchboard::domain::proptech::{self, PropertyStore};
//! use switchboard::gateway::OllamaGateway;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load();
//!     let gateway = Arc::new(OllamaGateway::from_config(&config));
//!     let store = Arc::new(PropertyStore::seeded());
//!
//!     let mut team = proptech::team(gateway, &config, store);
//!     let reply = team
//!         .handle_turn("demo-thread", "Is property 123 available?")
//!         .await
//!         .unwrap();
//!     println!("{}", reply);
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod domain;
pub mod gateway;
pub mod tools;

// Re-export commonly used items
pub use agent::{Conversation, Orchestrator, RoutingDecision, Supervisor, Worker};
pub use cli::Repl;
pub use core::{Config, EngineError, Result};
