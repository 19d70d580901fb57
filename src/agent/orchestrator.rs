//! Conversation orchestrator
//!
//! Composition root of the engine: drives the supervisor -> worker ->
//! supervisor loop for each user turn until the supervisor terminates or
//! the hop cap is reached, and owns the conversation state for every
//! thread.
//!
//! Commit semantics: a turn works on a scratch copy of the thread's
//! conversation and replaces the stored one only on success. A gateway
//! failure aborts the turn without committing, so a cancelled or failed
//! turn never surfaces a half-formed message.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::agent::conversation::Conversation;
use crate::agent::supervisor::{RoutingDecision, Supervisor};
use crate::agent::turn_state::TurnState;
use crate::agent::worker::Worker;
use crate::core::config::EngineConfig;
use crate::core::Result;

/// Reply surfaced when no worker ever ran during a turn
const NO_WORKER_FALLBACK: &str =
    "I couldn't find the right assistant for that request. Could you rephrase it?";

/// Drives turns through the supervisor and worker agents
pub struct Orchestrator {
    supervisor: Supervisor,
    workers: HashMap<String, Worker>,
    /// Conversation state per thread, keyed by an opaque conversation id
    conversations: HashMap<String, Conversation>,
    max_route_hops: usize,
    max_history: usize,
}

impl Orchestrator {
    /// Create an orchestrator over a supervisor and its worker agents
    pub fn new(supervisor: Supervisor, workers: Vec<Worker>, engine: &EngineConfig) -> Self {
        let workers = workers
            .into_iter()
            .map(|w| (w.name().to_string(), w))
            .collect();

        Self {
            supervisor,
            workers,
            conversations: HashMap::new(),
            max_route_hops: engine.max_route_hops,
            max_history: engine.max_history,
        }
    }

    /// Process one user turn for the given conversation thread
    ///
    /// Appends the user message, then loops: route, run the chosen worker,
    /// append its reply, route again. Returns the content of the last
    /// worker reply, or a fallback notice if no worker ran. Only gateway
    /// failures escape as errors; routing and tool problems are absorbed
    /// into best-effort replies.
    pub async fn handle_turn(&mut self, conversation_id: &str, user_text: &str) -> Result<String> {
        let mut scratch = self
            .conversations
            .get(conversation_id)
            .cloned()
            .unwrap_or_else(|| Conversation::new(self.max_history));
        scratch.add_user(user_text);

        let mut turn = TurnState::new(self.max_route_hops);

        while turn.should_continue() {
            match self.supervisor.route(&scratch).await? {
                RoutingDecision::Terminate => {
                    debug!(target: "switchboard::orchestrator", hop = turn.hop, "supervisor terminated turn");
                    turn.terminate();
                }
                RoutingDecision::Invalid(raw) => {
                    warn!(
                        target: "switchboard::orchestrator",
                        decision = %raw,
                        "supervisor returned a target outside the declared worker set"
                    );
                    turn.terminate();
                }
                RoutingDecision::Run(name) => {
                    let Some(worker) = self.workers.get(&name) else {
                        // The supervisor's declared set and the worker table
                        // disagree; absorb it the same way as an invalid route.
                        warn!(
                            target: "switchboard::orchestrator",
                            worker = %name,
                            "routed worker is not registered"
                        );
                        turn.terminate();
                        continue;
                    };

                    debug!(
                        target: "switchboard::orchestrator",
                        worker = %name,
                        hop = turn.hop,
                        "running worker"
                    );

                    turn.begin_worker();
                    let message = worker.run(&scratch).await?;
                    turn.record_reply(&message.content);
                    scratch.push(message);
                }
            }
        }

        if !turn.worker_ran() {
            debug!(target: "switchboard::orchestrator", "turn ended without a worker reply");
        }

        let reply = turn
            .reply()
            .unwrap_or(NO_WORKER_FALLBACK)
            .to_string();

        // Commit the scratch state only now that the turn succeeded
        self.conversations
            .insert(conversation_id.to_string(), scratch);

        Ok(reply)
    }

    /// Names of the registered workers
    pub fn worker_names(&self) -> Vec<&str> {
        self.workers.keys().map(|n| n.as_str()).collect()
    }

    /// The declared routing set
    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    /// The conversation state for a thread, if it exists
    pub fn conversation(&self, conversation_id: &str) -> Option<&Conversation> {
        self.conversations.get(conversation_id)
    }

    /// Number of messages stored for a thread
    pub fn conversation_len(&self, conversation_id: &str) -> usize {
        self.conversations
            .get(conversation_id)
            .map(Conversation::len)
            .unwrap_or(0)
    }

    /// Drop the conversation state for a thread
    pub fn clear_conversation(&mut self, conversation_id: &str) {
        self.conversations.remove(conversation_id);
    }
}
