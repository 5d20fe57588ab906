//! Session state machine.
//!
//! Enforces the valid transitions of a conversation session:
//! - AwaitingProfile -> Active (taste profile submitted)
//! - Active -> Sending (user input accepted, request issued)
//! - Sending -> Active (reply or failure handled)

use std::fmt;

use crate::error::ChatError;

/// Lifecycle state of a conversation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No taste profile yet. The conversation cannot start.
    AwaitingProfile,
    /// Ready for the next user turn.
    Active,
    /// One request is in flight; further input is refused.
    Sending,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::AwaitingProfile => write!(f, "AwaitingProfile"),
            SessionState::Active => write!(f, "Active"),
            SessionState::Sending => write!(f, "Sending"),
        }
    }
}

impl SessionState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::AwaitingProfile, SessionState::Active)
                | (SessionState::Active, SessionState::Sending)
                | (SessionState::Sending, SessionState::Active)
        )
    }
}

/// Owned state machine; mutated only by the session controller.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: SessionState,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine in `AwaitingProfile`.
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingProfile,
        }
    }

    /// Returns the current state.
    pub fn current(&self) -> SessionState {
        self.state
    }

    /// Attempt to transition to the target state.
    pub fn transition(&mut self, target: SessionState) -> Result<(), ChatError> {
        if self.state.can_transition_to(&target) {
            tracing::debug!("Session state: {} -> {}", self.state, target);
            self.state = target;
            Ok(())
        } else {
            Err(ChatError::InvalidTransition {
                from: self.state,
                to: target,
            })
        }
    }
}
