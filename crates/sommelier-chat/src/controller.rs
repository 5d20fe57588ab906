//! Session controller: accepts input, calls the service with the current
//! context, classifies the reply and appends it to the conversation.
//!
//! A turn is split in two so the request can run without holding the
//! controller: [`SessionController::begin_turn`] moves `Active -> Sending`
//! and yields the request, [`SessionController::complete_turn`] consumes the
//! outcome and moves back to `Active`. [`SessionController::send`] does both.

use std::sync::Arc;
use std::time::Duration;

use sommelier_core::config::ChatConfig;
use sommelier_core::types::{TasteProfile, TasteProfileCandidate, WineRecord};

use crate::classifier::ResponseClassifier;
use crate::error::{ChatError, TransportError};
use crate::message::Message;
use crate::service::{ChatRequest, SommelierService};
use crate::state::{SessionState, StateMachine};
use crate::store::ConversationSession;
use crate::welcome::welcome_text;

/// Runs one outbound request under the configured timeout.
///
/// Detached from the controller so a caller can keep handling input while
/// the request is in flight.
#[derive(Clone)]
pub struct TurnDispatcher {
    service: Arc<dyn SommelierService>,
    timeout: Duration,
}

impl TurnDispatcher {
    pub async fn dispatch(&self, request: ChatRequest) -> Result<String, TransportError> {
        match tokio::time::timeout(self.timeout, self.service.ask(&request)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(TransportError::Timeout(self.timeout.as_secs())),
        }
    }
}

/// Orchestrates a single conversation session.
pub struct SessionController {
    dispatcher: TurnDispatcher,
    classifier: ResponseClassifier,
    state: StateMachine,
    session: Option<ConversationSession>,
    config: ChatConfig,
}

impl SessionController {
    /// Create a controller awaiting a taste profile.
    pub fn new(service: Arc<dyn SommelierService>, config: ChatConfig, timeout: Duration) -> Self {
        Self {
            dispatcher: TurnDispatcher { service, timeout },
            classifier: ResponseClassifier::new(),
            state: StateMachine::new(),
            session: None,
            config,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.current()
    }

    pub fn session(&self) -> Option<&ConversationSession> {
        self.session.as_ref()
    }

    pub fn profile(&self) -> Option<&TasteProfile> {
        self.session.as_ref().map(|s| &s.profile)
    }

    /// Conversation history; empty before a profile is submitted.
    pub fn history(&self) -> &[Message] {
        self.session
            .as_ref()
            .map(|s| s.store.history())
            .unwrap_or_default()
    }

    pub fn last_recommendations(&self) -> Option<&[WineRecord]> {
        self.session
            .as_ref()
            .and_then(|s| s.store.last_recommendations())
    }

    /// A handle for running requests produced by [`Self::begin_turn`].
    pub fn dispatcher(&self) -> TurnDispatcher {
        self.dispatcher.clone()
    }

    // -- Profile --

    /// Validate a captured profile and start a fresh conversation with it.
    ///
    /// On validation failure nothing changes: no session is created and an
    /// existing one is kept.
    pub fn submit_profile(
        &mut self,
        candidate: TasteProfileCandidate,
    ) -> Result<&ConversationSession, ChatError> {
        if self.state.current() == SessionState::Sending {
            return Err(ChatError::Busy);
        }
        let profile = TasteProfile::submit(candidate)?;
        self.start_session(profile)
    }

    /// Start a conversation for an already validated profile, replacing any
    /// current session. The welcome message is the sole initial entry.
    pub fn start_session(
        &mut self,
        profile: TasteProfile,
    ) -> Result<&ConversationSession, ChatError> {
        match self.state.current() {
            SessionState::Sending => return Err(ChatError::Busy),
            SessionState::AwaitingProfile => self.state.transition(SessionState::Active)?,
            SessionState::Active => {
                if let Some(old) = &self.session {
                    tracing::info!(
                        session_id = %old.id,
                        history_len = old.store.len(),
                        "Taste profile changed, discarding conversation"
                    );
                }
            }
        }

        let mut session = ConversationSession::new(profile);
        let welcome = welcome_text(&session.profile);
        session.store.append(Message::text(welcome));
        tracing::info!(session_id = %session.id, "Conversation session started");
        Ok(self.session.insert(session))
    }

    // -- Turns --

    /// Accept user input and produce the request for this turn.
    ///
    /// Whitespace-only input is a no-op and returns `Ok(None)`. Otherwise the
    /// raw input is appended as a `User` message and the controller enters
    /// `Sending` until [`Self::complete_turn`] is called.
    pub fn begin_turn(&mut self, input: &str) -> Result<Option<ChatRequest>, ChatError> {
        match self.state.current() {
            SessionState::AwaitingProfile => return Err(ChatError::NoProfile),
            SessionState::Sending => {
                tracing::debug!("Input refused while a request is in flight");
                return Err(ChatError::Busy);
            }
            SessionState::Active => {}
        }

        if input.trim().is_empty() {
            return Ok(None);
        }
        if input.chars().count() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }

        let session = self.session.as_mut().ok_or(ChatError::NoProfile)?;
        self.state.transition(SessionState::Sending)?;
        session.store.append(Message::user(input));

        Ok(Some(ChatRequest {
            message: input.to_string(),
            taste_profile: session.profile.clone(),
            last_recommendations: session.store.last_recommendations().map(<[_]>::to_vec),
        }))
    }

    /// Finish the in-flight turn with the service outcome.
    ///
    /// A reply is classified and appended; a transport failure appends one
    /// `BotError`. Either way the controller returns to `Active`.
    pub fn complete_turn(
        &mut self,
        outcome: Result<String, TransportError>,
    ) -> Result<&Message, ChatError> {
        if self.state.current() != SessionState::Sending {
            return Err(ChatError::NotSending);
        }

        let message = match outcome {
            Ok(raw) => self.classifier.classify(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "Chat turn failed");
                Message::error(e.user_message(&self.config.error_message))
            }
        };

        let session = self.session.as_mut().ok_or(ChatError::NoProfile)?;
        self.state.transition(SessionState::Active)?;
        tracing::debug!(
            session_id = %session.id,
            kind = message.kind(),
            history_len = session.store.len() + 1,
            "Turn completed"
        );
        Ok(session.store.append(message))
    }

    /// Run a full turn: begin, dispatch, complete.
    ///
    /// Returns `Ok(None)` for whitespace-only input.
    pub async fn send(&mut self, input: &str) -> Result<Option<&Message>, ChatError> {
        let Some(request) = self.begin_turn(input)? else {
            return Ok(None);
        };
        let outcome = self.dispatcher.dispatch(request).await;
        self.complete_turn(outcome).map(Some)
    }
}

// =============================================================================
// Tests
// =============================================================================
