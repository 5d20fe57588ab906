//! Conversation store.
//!
//! Append-only message log plus the "last recommendations" context that
//! follow-up turns send back to the service.

use chrono::{DateTime, Utc};
use sommelier_core::types::{TasteProfile, WineRecord};
use uuid::Uuid;

use crate::message::Message;

// =============================================================================
// ConversationStore
// =============================================================================

/// Ordered history of a single conversation.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    history: Vec<Message>,
    last_recommendations: Option<Vec<WineRecord>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return it.
    ///
    /// A `BotRecommendation` with at least one wine replaces the last
    /// recommendations; every other message leaves them untouched.
    pub fn append(&mut self, message: Message) -> &Message {
        if let Message::BotRecommendation { wines, .. } = &message {
            if !wines.is_empty() {
                tracing::debug!(wines = wines.len(), "Last recommendations replaced");
                self.last_recommendations = Some(wines.clone());
            }
        }
        self.history.push(message);
        &self.history[self.history.len() - 1]
    }

    /// Messages in chronological order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn last_recommendations(&self) -> Option<&[WineRecord]> {
        self.last_recommendations.as_deref()
    }
}

// =============================================================================
// ConversationSession
// =============================================================================

/// A conversation bound to one taste profile. Replaced wholesale when the
/// profile changes.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub profile: TasteProfile,
    pub store: ConversationStore,
}

impl ConversationSession {
    /// Create an empty session for `profile`.
    pub fn new(profile: TasteProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            profile,
            store: ConversationStore::new(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Characteristics;
    use sommelier_core::types::TasteProfileCandidate;

    fn wine(name: &str) -> WineRecord {
        WineRecord {
            name_localized: name.to_string(),
            name_original: String::new(),
            wine_type: None,
            winery: String::new(),
            country: String::new(),
            region: String::new(),
            price: Some(10000.0),
            sweetness: 3,
            acidity: 3,
            body: 3,
            tannin: 3,
            aroma: String::new(),
            food_pairing: String::new(),
            image_url: None,
            detail_url: None,
        }
    }

    fn recommendation(names: &[&str]) -> Message {
        Message::BotRecommendation {
            text: "추천".to_string(),
            characteristics: Characteristics::new(),
            wines: names.iter().map(|n| wine(n)).collect(),
        }
    }

    fn names(wines: Option<&[WineRecord]>) -> Vec<String> {
        wines
            .unwrap_or_default()
            .iter()
            .map(|w| w.name_localized.clone())
            .collect()
    }

    // ---- History ----

    #[test]
    fn test_new_store_is_empty() {
        let store = ConversationStore::new();
        assert!(store.is_empty());
        assert!(store.last_recommendations().is_none());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut store = ConversationStore::new();
        store.append(Message::text("welcome"));
        store.append(Message::user("first"));
        store.append(Message::text("reply"));
        store.append(Message::user("second"));

        let bodies: Vec<_> = store.history().iter().map(|m| m.body()).collect();
        assert_eq!(bodies, vec!["welcome", "first", "reply", "second"]);
        assert_eq!(store.len(), 4);
        assert_eq!(store.history()[3].body(), "second");
    }

    // ---- Last recommendations ----

    #[test]
    fn test_recommendation_sets_last_recommendations() {
        let mut store = ConversationStore::new();
        store.append(recommendation(&["a", "b"]));
        assert_eq!(names(store.last_recommendations()), vec!["a", "b"]);
    }

    #[test]
    fn test_new_recommendation_replaces_not_merges() {
        let mut store = ConversationStore::new();
        store.append(recommendation(&["a", "b"]));
        store.append(recommendation(&["c"]));
        assert_eq!(names(store.last_recommendations()), vec!["c"]);
    }

    #[test]
    fn test_text_and_error_keep_last_recommendations() {
        let mut store = ConversationStore::new();
        store.append(recommendation(&["a"]));
        store.append(Message::user("cheaper?"));
        store.append(Message::text("sure"));
        store.append(Message::error("fail"));
        assert_eq!(names(store.last_recommendations()), vec!["a"]);
    }

    #[test]
    fn test_empty_recommendation_keeps_previous() {
        let mut store = ConversationStore::new();
        store.append(recommendation(&["a"]));
        store.append(recommendation(&[]));
        assert_eq!(names(store.last_recommendations()), vec!["a"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_empty_recommendation_on_fresh_store_stays_absent() {
        let mut store = ConversationStore::new();
        store.append(recommendation(&[]));
        assert!(store.last_recommendations().is_none());
    }

    // ---- Session ----

    #[test]
    fn test_session_starts_empty_with_unique_id() {
        let profile = TasteProfile::submit(TasteProfileCandidate {
            preferred_sweetness: Some(3),
            preferred_acidity: Some(3),
            preferred_body: Some(3),
            preferred_tannin: Some(3),
            preferred_types: vec![],
            price_range: Some((0, 100000)),
        })
        .unwrap();
        let a = ConversationSession::new(profile.clone());
        let b = ConversationSession::new(profile);
        assert_ne!(a.id, b.id);
        assert!(a.store.is_empty());
    }
}
