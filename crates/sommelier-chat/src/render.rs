//! Plain-text presentation of conversation messages.
//!
//! Every [`Message`] variant has a rendering; recommendations expand into a
//! characteristics block followed by one card per wine.

use sommelier_core::format;
use sommelier_core::types::{WineRecord, MAX_SCORE};

use crate::message::{Characteristics, Message};

/// Shown in place of a missing wine image.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x400?text=No+Image";

/// Render one history entry.
pub fn render_message(message: &Message) -> String {
    match message {
        Message::User { content } => format!("나> {}", content),
        Message::BotText { text } => format!("소믈리에> {}", text),
        Message::BotError { text } => format!("소믈리에 [오류]> {}", text),
        Message::BotRecommendation {
            text,
            characteristics,
            wines,
        } => {
            let mut sections = Vec::new();
            if !text.is_empty() {
                sections.push(format!("소믈리에> {}", text));
            }
            if !characteristics.is_empty() {
                sections.push(render_characteristics(characteristics));
            }
            if !wines.is_empty() {
                sections.push(render_wine_cards(wines));
            }
            sections.join("\n")
        }
    }
}

/// `와인 특성` block, one `label: value` line per entry in service order.
pub fn render_characteristics(characteristics: &Characteristics) -> String {
    let mut lines = vec!["[와인 특성]".to_string()];
    lines.extend(
        characteristics
            .iter()
            .map(|(label, value)| format!("  {}: {}", label, value)),
    );
    lines.join("\n")
}

/// Cards for a list of wines. The first is the best pick.
pub fn render_wine_cards(wines: &[WineRecord]) -> String {
    wines
        .iter()
        .enumerate()
        .map(|(i, wine)| render_wine_card(wine, i == 0))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_wine_card(wine: &WineRecord, best_pick: bool) -> String {
    let mut lines = vec!["-".repeat(40)];
    if best_pick {
        lines.push("★ Best Pick".to_string());
    }
    lines.push(wine.name_localized.clone());
    if !wine.name_original.is_empty() {
        lines.push(wine.name_original.clone());
    }
    lines.push(format!("{} | {} | {}", wine.winery, wine.country, wine.region));
    if let Some(price) = wine.price.filter(|p| *p > 0.0) {
        lines.push(format!("₩ {}", format::price(price)));
    }
    for (label, score) in [
        ("당도", wine.sweetness),
        ("산도", wine.acidity),
        ("바디", wine.body),
        ("타닌", wine.tannin),
    ] {
        lines.push(format!("{} {} {}/{}", label, score_bar(score), score, MAX_SCORE));
    }
    lines.push(format!("아로마: {}", wine.aroma));
    lines.push(format!("음식 페어링: {}", wine.food_pairing));
    lines.push(format!(
        "이미지: {}",
        wine.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    ));
    if let Some(url) = &wine.detail_url {
        lines.push(format!("상세: {}", url));
    }
    lines.join("\n")
}

/// Five-cell bar; out-of-range scores are clamped.
pub fn score_bar(score: u8) -> String {
    let filled = score.min(MAX_SCORE) as usize;
    let empty = MAX_SCORE as usize - filled;
    format!("{}{}", "●".repeat(filled), "○".repeat(empty))
}
