use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

// =============================================================================
// Enums
// =============================================================================

/// Wine category a user can express a preference for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WineType {
    #[serde(alias = "레드")]
    Red,
    #[serde(alias = "화이트")]
    White,
    #[serde(alias = "스파클링")]
    Sparkling,
    #[serde(alias = "로제")]
    Rose,
}

impl WineType {
    /// All categories in display order.
    pub const ALL: [WineType; 4] = [
        WineType::Red,
        WineType::White,
        WineType::Sparkling,
        WineType::Rose,
    ];

    /// Upper-case category code, as sent over the wire.
    pub fn code(&self) -> &'static str {
        match self {
            WineType::Red => "RED",
            WineType::White => "WHITE",
            WineType::Sparkling => "SPARKLING",
            WineType::Rose => "ROSE",
        }
    }

    /// Korean display label.
    pub fn label(&self) -> &'static str {
        match self {
            WineType::Red => "레드",
            WineType::White => "화이트",
            WineType::Sparkling => "스파클링",
            WineType::Rose => "로제",
        }
    }

    /// Parse a category from its code or Korean label, case-insensitively.
    pub fn parse(value: &str) -> Option<WineType> {
        let value = value.trim();
        WineType::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(value) || t.label() == value)
    }
}

impl fmt::Display for WineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Qualitative descriptor for a 1-5 score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScoreLevel {
    Low,
    Medium,
    High,
}

impl ScoreLevel {
    /// 4 and above is high, 3 is medium, anything lower is low.
    pub fn from_score(score: u8) -> Self {
        if score >= 4 {
            ScoreLevel::High
        } else if score >= 3 {
            ScoreLevel::Medium
        } else {
            ScoreLevel::Low
        }
    }
}

impl fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreLevel::Low => write!(f, "low"),
            ScoreLevel::Medium => write!(f, "medium"),
            ScoreLevel::High => write!(f, "high"),
        }
    }
}

// =============================================================================
// Taste profile
// =============================================================================

/// Unvalidated taste-profile input as captured from a form, CLI flags or a
/// config file. Every field is optional so that a partial capture can be
/// reported precisely instead of failing to parse.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasteProfileCandidate {
    pub preferred_sweetness: Option<i64>,
    pub preferred_acidity: Option<i64>,
    pub preferred_body: Option<i64>,
    pub preferred_tannin: Option<i64>,
    pub preferred_types: Vec<WineType>,
    pub price_range: Option<(i64, i64)>,
}

/// Inclusive price bounds, serialized as a `[min, max]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PriceRange(u64, u64);

impl PriceRange {
    pub fn min(&self) -> u64 {
        self.0
    }

    pub fn max(&self) -> u64 {
        self.1
    }
}

/// Validated user preferences. Immutable once created; the only way to build
/// one is [`TasteProfile::submit`] (or deserializing, which runs the same
/// validation).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TasteProfileCandidate")]
pub struct TasteProfile {
    preferred_sweetness: u8,
    preferred_acidity: u8,
    preferred_body: u8,
    preferred_tannin: u8,
    preferred_types: BTreeSet<WineType>,
    price_range: PriceRange,
}

impl TasteProfile {
    /// Validate a candidate and produce a profile.
    ///
    /// All four scores and the price pair are mandatory. Scores must be within
    /// 1..=5, price bounds non-negative with `min <= max`. An empty type set
    /// means "no type preference".
    pub fn submit(candidate: TasteProfileCandidate) -> Result<Self, ValidationError> {
        let preferred_sweetness = score("preferred_sweetness", candidate.preferred_sweetness)?;
        let preferred_acidity = score("preferred_acidity", candidate.preferred_acidity)?;
        let preferred_body = score("preferred_body", candidate.preferred_body)?;
        let preferred_tannin = score("preferred_tannin", candidate.preferred_tannin)?;

        let (min, max) = candidate
            .price_range
            .ok_or(ValidationError::MissingField("price_range"))?;
        for value in [min, max] {
            if value < 0 {
                return Err(ValidationError::NegativePrice { value });
            }
        }
        if min > max {
            return Err(ValidationError::InvertedPriceRange { min, max });
        }

        Ok(Self {
            preferred_sweetness,
            preferred_acidity,
            preferred_body,
            preferred_tannin,
            preferred_types: candidate.preferred_types.into_iter().collect(),
            price_range: PriceRange(min as u64, max as u64),
        })
    }

    pub fn sweetness(&self) -> u8 {
        self.preferred_sweetness
    }

    pub fn acidity(&self) -> u8 {
        self.preferred_acidity
    }

    pub fn body(&self) -> u8 {
        self.preferred_body
    }

    pub fn tannin(&self) -> u8 {
        self.preferred_tannin
    }

    pub fn preferred_types(&self) -> &BTreeSet<WineType> {
        &self.preferred_types
    }

    pub fn price_range(&self) -> PriceRange {
        self.price_range
    }
}

impl TryFrom<TasteProfileCandidate> for TasteProfile {
    type Error = ValidationError;

    fn try_from(candidate: TasteProfileCandidate) -> Result<Self, Self::Error> {
        TasteProfile::submit(candidate)
    }
}

fn score(field: &'static str, value: Option<i64>) -> Result<u8, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField(field))?;
    if (1..=5).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ValidationError::OutOfRange { field, value })
    }
}

// =============================================================================
// Wine record
// =============================================================================

/// A wine as returned by the recommendation service. Read-only snapshot.
///
/// Field names on the wire follow the service (`name_ko`, `name_en`,
/// `food_matching`). Decoding never rejects a field value: `null` or missing
/// strings become empty, scores accept any number (rounded, clamped to 0..=5,
/// 0 when unknown) and an unreadable price is treated as absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WineRecord {
    #[serde(
        rename = "name_ko",
        alias = "name_localized",
        default,
        deserialize_with = "lenient_string"
    )]
    pub name_localized: String,
    #[serde(
        rename = "name_en",
        alias = "name_original",
        default,
        deserialize_with = "lenient_string"
    )]
    pub name_original: String,
    #[serde(
        default,
        deserialize_with = "non_empty_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub wine_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub winery: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub region: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub sweetness: u8,
    #[serde(default, deserialize_with = "lenient_score")]
    pub acidity: u8,
    #[serde(default, deserialize_with = "lenient_score")]
    pub body: u8,
    #[serde(default, deserialize_with = "lenient_score")]
    pub tannin: u8,
    #[serde(default, deserialize_with = "lenient_string")]
    pub aroma: String,
    #[serde(
        rename = "food_matching",
        alias = "food_pairing",
        default,
        deserialize_with = "lenient_string"
    )]
    pub food_pairing: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub image_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "non_empty_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub detail_url: Option<String>,
}

/// Highest value a characteristic score can take.
pub const MAX_SCORE: u8 = 5;

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// `null` reads as empty; non-string scalars keep their JSON text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_to_string)
}

/// Treat `""` and `null` the same as an absent value.
fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = value_to_string(Value::deserialize(deserializer)?);
    Ok(Some(value).filter(|s| !s.trim().is_empty()))
}

fn number_from(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from(&Value::deserialize(deserializer)?))
}

fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let score = number_from(&Value::deserialize(deserializer)?).unwrap_or(0.0);
    Ok(score.round().clamp(0.0, f64::from(MAX_SCORE)) as u8)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_candidate() -> TasteProfileCandidate {
        TasteProfileCandidate {
            preferred_sweetness: Some(2),
            preferred_acidity: Some(4),
            preferred_body: Some(3),
            preferred_tannin: Some(2),
            preferred_types: vec![WineType::Red],
            price_range: Some((20000, 60000)),
        }
    }

    // ---- Profile validation ----

    #[test]
    fn test_submit_valid_profile() {
        let profile = TasteProfile::submit(valid_candidate()).unwrap();
        assert_eq!(profile.sweetness(), 2);
        assert_eq!(profile.acidity(), 4);
        assert_eq!(profile.body(), 3);
        assert_eq!(profile.tannin(), 2);
        assert!(profile.preferred_types().contains(&WineType::Red));
        assert_eq!(profile.price_range().min(), 20000);
        assert_eq!(profile.price_range().max(), 60000);
    }

    #[test]
    fn test_submit_accepts_every_score_in_range() {
        for value in 1..=5 {
            let candidate = TasteProfileCandidate {
                preferred_sweetness: Some(value),
                preferred_acidity: Some(value),
                preferred_body: Some(value),
                preferred_tannin: Some(value),
                ..valid_candidate()
            };
            assert!(TasteProfile::submit(candidate).is_ok(), "score {value}");
        }
    }

    #[test]
    fn test_submit_rejects_out_of_range_scores() {
        for bad in [0, 6, -3, 100] {
            let candidate = TasteProfileCandidate {
                preferred_tannin: Some(bad),
                ..valid_candidate()
            };
            assert_eq!(
                TasteProfile::submit(candidate),
                Err(ValidationError::OutOfRange {
                    field: "preferred_tannin",
                    value: bad
                })
            );
        }
    }

    #[test]
    fn test_submit_rejects_missing_score() {
        let candidate = TasteProfileCandidate {
            preferred_body: None,
            ..valid_candidate()
        };
        assert_eq!(
            TasteProfile::submit(candidate),
            Err(ValidationError::MissingField("preferred_body"))
        );
    }

    #[test]
    fn test_submit_rejects_missing_price_range() {
        let candidate = TasteProfileCandidate {
            price_range: None,
            ..valid_candidate()
        };
        assert_eq!(
            TasteProfile::submit(candidate),
            Err(ValidationError::MissingField("price_range"))
        );
    }

    #[test]
    fn test_submit_rejects_negative_price() {
        let candidate = TasteProfileCandidate {
            price_range: Some((-1, 10000)),
            ..valid_candidate()
        };
        assert_eq!(
            TasteProfile::submit(candidate),
            Err(ValidationError::NegativePrice { value: -1 })
        );
    }

    #[test]
    fn test_submit_rejects_inverted_price_range() {
        let candidate = TasteProfileCandidate {
            price_range: Some((60000, 20000)),
            ..valid_candidate()
        };
        assert_eq!(
            TasteProfile::submit(candidate),
            Err(ValidationError::InvertedPriceRange {
                min: 60000,
                max: 20000
            })
        );
    }

    #[test]
    fn test_submit_accepts_equal_price_bounds_and_zero() {
        let candidate = TasteProfileCandidate {
            price_range: Some((0, 0)),
            ..valid_candidate()
        };
        let profile = TasteProfile::submit(candidate).unwrap();
        assert_eq!(profile.price_range().min(), 0);
        assert_eq!(profile.price_range().max(), 0);
    }

    #[test]
    fn test_submit_accepts_empty_types_and_dedups() {
        let empty = TasteProfileCandidate {
            preferred_types: vec![],
            ..valid_candidate()
        };
        assert!(TasteProfile::submit(empty)
            .unwrap()
            .preferred_types()
            .is_empty());

        let dupes = TasteProfileCandidate {
            preferred_types: vec![WineType::Rose, WineType::Red, WineType::Rose],
            ..valid_candidate()
        };
        let profile = TasteProfile::submit(dupes).unwrap();
        let types: Vec<_> = profile.preferred_types().iter().copied().collect();
        assert_eq!(types, vec![WineType::Red, WineType::Rose]);
    }

    // ---- Serialization ----

    #[test]
    fn test_profile_serializes_to_wire_shape() {
        let profile = TasteProfile::submit(valid_candidate()).unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["preferred_sweetness"], 2);
        assert_eq!(json["preferred_types"], serde_json::json!(["RED"]));
        assert_eq!(json["price_range"], serde_json::json!([20000, 60000]));
    }

    #[test]
    fn test_profile_deserialize_runs_validation() {
        let json = r#"{
            "preferred_sweetness": 9,
            "preferred_acidity": 3,
            "preferred_body": 3,
            "preferred_tannin": 3,
            "preferred_types": [],
            "price_range": [0, 10]
        }"#;
        let result: Result<TasteProfile, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_wine_type_accepts_korean_labels() {
        let types: Vec<WineType> =
            serde_json::from_str(r#"["레드", "WHITE", "스파클링", "로제"]"#).unwrap();
        assert_eq!(types, WineType::ALL.to_vec());
    }

    #[test]
    fn test_wine_type_parse() {
        assert_eq!(WineType::parse("red"), Some(WineType::Red));
        assert_eq!(WineType::parse(" Sparkling "), Some(WineType::Sparkling));
        assert_eq!(WineType::parse("로제"), Some(WineType::Rose));
        assert_eq!(WineType::parse("orange"), None);
    }

    // ---- Score levels ----

    #[test]
    fn test_score_level_thresholds() {
        assert_eq!(ScoreLevel::from_score(1), ScoreLevel::Low);
        assert_eq!(ScoreLevel::from_score(2), ScoreLevel::Low);
        assert_eq!(ScoreLevel::from_score(3), ScoreLevel::Medium);
        assert_eq!(ScoreLevel::from_score(4), ScoreLevel::High);
        assert_eq!(ScoreLevel::from_score(5), ScoreLevel::High);
        assert_eq!(ScoreLevel::High.to_string(), "high");
    }

    // ---- Wine record ----

    #[test]
    fn test_wine_record_from_service_fields() {
        let json = r#"{
            "name_ko": "샤또 마고",
            "name_en": "Chateau Margaux",
            "wine_type": "레드",
            "winery": "Chateau Margaux",
            "country": "France",
            "region": "Bordeaux",
            "price": 450000,
            "sweetness": 1,
            "acidity": 3,
            "body": 5,
            "tannin": 4,
            "aroma": "cassis",
            "food_matching": "steak",
            "image_url": "",
            "detail_url": "https://example.com/w/1"
        }"#;
        let wine: WineRecord = serde_json::from_str(json).unwrap();
        assert_eq!(wine.name_localized, "샤또 마고");
        assert_eq!(wine.name_original, "Chateau Margaux");
        assert_eq!(wine.price, Some(450000.0));
        assert_eq!(wine.food_pairing, "steak");
        assert_eq!(wine.image_url, None);
        assert_eq!(wine.detail_url.as_deref(), Some("https://example.com/w/1"));
    }

    #[test]
    fn test_wine_record_null_strings_read_as_empty() {
        let json = r#"{"name_ko": "a", "region": null, "aroma": null, "wine_type": null,
            "image_url": null, "sweetness": 2, "acidity": 2, "body": 2, "tannin": 2}"#;
        let wine: WineRecord = serde_json::from_str(json).unwrap();
        assert_eq!(wine.name_localized, "a");
        assert!(wine.region.is_empty());
        assert!(wine.aroma.is_empty());
        assert_eq!(wine.wine_type, None);
        assert_eq!(wine.image_url, None);
    }

    #[test]
    fn test_wine_record_float_scores_are_rounded() {
        let json = r#"{"sweetness": 2.0, "acidity": 3.6, "body": "4", "tannin": 9}"#;
        let wine: WineRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            (wine.sweetness, wine.acidity, wine.body, wine.tannin),
            (2, 4, 4, MAX_SCORE)
        );
    }

    #[test]
    fn test_wine_record_missing_scores_default_to_zero() {
        let wine: WineRecord = serde_json::from_str(r#"{"name_ko": "c", "aroma": "x"}"#).unwrap();
        assert_eq!(wine.name_localized, "c");
        assert_eq!((wine.sweetness, wine.acidity, wine.body, wine.tannin), (0, 0, 0, 0));
        assert_eq!(wine.price, None);
    }

    #[test]
    fn test_wine_record_backend_shape() {
        let json = r#"{"name_ko": "까베르네", "name_en": "Cabernet", "wine_type": "",
            "winery": "W", "country": "Chile", "region": "Maipo", "price": null,
            "sweetness": 1, "acidity": 3, "body": 4, "tannin": 4,
            "aroma": "blackcurrant", "food_matching": "lamb", "image_url": ""}"#;
        let wine: WineRecord = serde_json::from_str(json).unwrap();
        assert_eq!(wine.wine_type, None);
        assert_eq!(wine.price, None);
        assert_eq!(wine.image_url, None);
        assert_eq!(wine.food_pairing, "lamb");
    }

    #[test]
    fn test_wine_record_odd_price_values() {
        let parse = |price: &str| -> Option<f64> {
            let json = format!(r#"{{"price": {price}}}"#);
            serde_json::from_str::<WineRecord>(&json).unwrap().price
        };
        assert_eq!(parse("12500.5"), Some(12500.5));
        assert_eq!(parse(r#""35,000""#), Some(35000.0));
        assert_eq!(parse(r#""market price""#), None);
        assert_eq!(parse("true"), None);
    }

    #[test]
    fn test_wine_record_missing_optional_fields() {
        let json = r#"{"sweetness": 2, "acidity": 2, "body": 2, "tannin": 2, "price": null}"#;
        let wine: WineRecord = serde_json::from_str(json).unwrap();
        assert!(wine.name_localized.is_empty());
        assert_eq!(wine.price, None);
        assert_eq!(wine.image_url, None);
        assert_eq!(wine.wine_type, None);
    }
}
