//! Conversation message types.

use sommelier_core::types::WineRecord;

/// Ordered label -> display value pairs describing a recommendation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Characteristics(Vec<(String, String)>);

impl Characteristics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair, keeping insertion order.
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.0.push((label.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Characteristics {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One entry in the conversation history.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Text the user submitted.
    User { content: String },
    /// Plain prose from the assistant.
    BotText { text: String },
    /// Structured recommendation. The first wine is the top pick.
    BotRecommendation {
        text: String,
        characteristics: Characteristics,
        wines: Vec<WineRecord>,
    },
    /// User-facing description of a failed turn.
    BotError { text: String },
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Message::BotText { text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Message::BotError { text: text.into() }
    }

    /// Short tag, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::User { .. } => "user",
            Message::BotText { .. } => "text",
            Message::BotRecommendation { .. } => "recommendation",
            Message::BotError { .. } => "error",
        }
    }

    /// Primary text of the message regardless of variant.
    pub fn body(&self) -> &str {
        match self {
            Message::User { content } => content,
            Message::BotText { text }
            | Message::BotRecommendation { text, .. }
            | Message::BotError { text } => text,
        }
    }

    /// The top-pick wine of a recommendation.
    pub fn top_pick(&self) -> Option<&WineRecord> {
        match self {
            Message::BotRecommendation { wines, .. } => wines.first(),
            _ => None,
        }
    }

    /// Recommended wines, or `None` for non-recommendation variants.
    pub fn wines(&self) -> Option<&[WineRecord]> {
        match self {
            Message::BotRecommendation { wines, .. } => Some(wines),
            _ => None,
        }
    }
}
