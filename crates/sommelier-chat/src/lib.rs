//! Conversational wine recommendation client.
//!
//! Tracks dialogue history for one taste profile, carries the most recent
//! recommendations forward as context for follow-up questions, classifies
//! service replies into message variants and renders them as text.

pub mod classifier;
pub mod client;
pub mod controller;
pub mod error;
pub mod message;
pub mod render;
pub mod service;
pub mod state;
pub mod store;
pub mod welcome;

pub use classifier::ResponseClassifier;
pub use client::HttpSommelierService;
pub use controller::{SessionController, TurnDispatcher};
pub use error::{ChatError, TransportError};
pub use message::{Characteristics, Message};
pub use service::{ChatRequest, SommelierService};
pub use state::SessionState;
pub use store::{ConversationSession, ConversationStore};
