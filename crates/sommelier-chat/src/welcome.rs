//! Welcome message synthesized from a taste profile.

use sommelier_core::format;
use sommelier_core::types::{ScoreLevel, TasteProfile};

/// Summarize `profile` as the opening assistant message.
pub fn welcome_text(profile: &TasteProfile) -> String {
    let types = if profile.preferred_types().is_empty() {
        "상관없음".to_string()
    } else {
        profile
            .preferred_types()
            .iter()
            .map(|t| format!("{} ({})", t.code(), t.label()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut lines = vec![
        "취향 프로필이 저장되었습니다.".to_string(),
        format!("선호 종류: {}", types),
    ];
    for (label, score) in [
        ("당도", profile.sweetness()),
        ("산도", profile.acidity()),
        ("바디", profile.body()),
        ("타닌", profile.tannin()),
    ] {
        lines.push(format!(
            "{}: {} ({}/5)",
            label,
            ScoreLevel::from_score(score),
            score
        ));
    }
    lines.push(format!(
        "가격대: {}",
        format::price_range(profile.price_range())
    ));
    lines.push("어떤 와인을 찾으시나요?".to_string());
    lines.join("\n")
}
