//! Turn state management
//!
//! Tracks one user turn through the supervisor -> worker -> supervisor loop.
//! AwaitingRoute is both the initial phase (after the user message is
//! appended) and the phase re-entered after each worker run; Terminated is
//! the only terminal phase, reached by an explicit routing decision, an
//! invalid route, or hop-cap exhaustion.

/// Phase of turn processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Waiting for the supervisor's next routing decision
    AwaitingRoute,
    /// A worker agent is producing its reply
    RunningWorker,
    /// The turn is complete
    Terminated,
}

/// State of one turn through the routing loop
#[derive(Debug, Clone)]
pub struct TurnState {
    /// Completed supervisor -> worker hops
    pub hop: usize,
    /// Maximum allowed hops
    pub max_hops: usize,
    /// Current phase
    pub phase: TurnPhase,
    /// Content of the last worker reply this turn
    last_reply: Option<String>,
}

impl TurnState {
    /// Create a new turn state with the given hop cap
    pub fn new(max_hops: usize) -> Self {
        Self {
            hop: 0,
            max_hops,
            phase: TurnPhase::AwaitingRoute,
            last_reply: None,
        }
    }

    /// Check if the routing loop should continue
    pub fn should_continue(&self) -> bool {
        self.phase != TurnPhase::Terminated && self.hop < self.max_hops
    }

    /// Enter the worker-running phase
    pub fn begin_worker(&mut self) {
        self.phase = TurnPhase::RunningWorker;
    }

    /// Record a worker reply and return to routing
    pub fn record_reply(&mut self, content: impl Into<String>) {
        self.last_reply = Some(content.into());
        self.phase = TurnPhase::AwaitingRoute;
        self.hop += 1;
    }

    /// Terminate the turn
    pub fn terminate(&mut self) {
        self.phase = TurnPhase::Terminated;
    }

    /// Whether any worker produced a reply this turn
    pub fn worker_ran(&self) -> bool {
        self.last_reply.is_some()
    }

    /// The reply to surface to the caller, if any worker ran
    pub fn reply(&self) -> Option<&str> {
        self.last_reply.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_state_new() {
        let state = TurnState::new(6);
        assert_eq!(state.hop, 0);
        assert_eq!(state.max_hops, 6);
        assert_eq!(state.phase, TurnPhase::AwaitingRoute);
        assert!(!state.worker_ran());
    }

    #[test]
    fn test_should_continue_until_cap() {
        let mut state = TurnState::new(2);
        assert!(state.should_continue());

        state.begin_worker();
        state.record_reply("first");
        assert!(state.should_continue());

        state.begin_worker();
        state.record_reply("second");
        assert!(!state.should_continue()); // Reached hop cap
        assert_eq!(state.reply(), Some("second"));
    }

    #[test]
    fn test_terminate_is_terminal() {
        let mut state = TurnState::new(6);
        state.terminate();
        assert!(!state.should_continue());
        assert_eq!(state.phase, TurnPhase::Terminated);
    }

    #[test]
    fn test_phase_transitions() {
        let mut state = TurnState::new(6);
        assert_eq!(state.phase, TurnPhase::AwaitingRoute);

        state.begin_worker();
        assert_eq!(state.phase, TurnPhase::RunningWorker);

        state.record_reply("done");
        assert_eq!(state.phase, TurnPhase::AwaitingRoute);
    }
}
