//! Agent module - orchestration, routing, and conversation management
//!
//! Contains the supervisor that routes turns, the worker agents that run
//! bounded tool loops, and the orchestrator that drives the whole cycle.

pub mod conversation;
pub mod orchestrator;
pub mod supervisor;
pub mod turn_state;
pub mod worker;

pub use conversation::Conversation;
pub use orchestrator::Orchestrator;
pub use supervisor::{RoutingDecision, Supervisor};
pub use turn_state::{TurnPhase, TurnState};
pub use worker::{Worker, WorkerBuilder};
