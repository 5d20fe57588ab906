//! Response classification.
//!
//! Decodes the service's reply payload into a [`Message`] variant using the
//! `type` discriminator. Anything that does not decode, or carries an
//! unrecognized discriminator, is kept verbatim as [`Message::BotText`] so a
//! malformed or legacy reply still renders.

use serde::Deserialize;
use serde_json::{Map, Value};
use sommelier_core::types::WineRecord;

use crate::message::{Characteristics, Message};

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(rename = "type")]
    kind: Option<String>,
    text: Option<String>,
    characteristics: Option<Map<String, Value>>,
    wines: Option<Vec<Value>>,
}

/// Stateless classifier for reply payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseClassifier;

impl ResponseClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a raw payload string. Never fails.
    pub fn classify(&self, raw: &str) -> Message {
        let payload: RawPayload = match serde_json::from_str(raw) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(error = %e, "Reply is not a structured payload, keeping raw text");
                return Message::text(raw);
            }
        };

        match (payload.kind.as_deref(), payload.text) {
            (Some("text"), Some(text)) => Message::BotText { text },
            (Some("error"), Some(text)) => Message::BotError { text },
            (Some("recommendation"), text) => Message::BotRecommendation {
                text: text.unwrap_or_default(),
                characteristics: payload
                    .characteristics
                    .map(characteristics_from_map)
                    .unwrap_or_default(),
                wines: payload.wines.map(decode_wines).unwrap_or_default(),
            },
            (kind, _) => {
                tracing::debug!(kind = ?kind, "Unrecognized reply type, keeping raw text");
                Message::text(raw)
            }
        }
    }
}

fn characteristics_from_map(map: Map<String, Value>) -> Characteristics {
    let mut characteristics = Characteristics::new();
    for (label, value) in map {
        match value {
            Value::String(s) => characteristics.push(label, s),
            other => characteristics.push(label, other.to_string()),
        }
    }
    characteristics
}

/// Decode wines in service order. Only entries that are not JSON objects are
/// dropped; field values inside an object are read leniently by [`WineRecord`].
fn decode_wines(values: Vec<Value>) -> Vec<WineRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            if !value.is_object() {
                tracing::warn!(index, "Dropping wine entry that is not an object");
                return None;
            }
            match serde_json::from_value(value) {
                Ok(wine) => Some(wine),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Dropping undecodable wine record");
                    None
                }
            }
        })
        .collect()
}
