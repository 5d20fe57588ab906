//! Display helpers for prices.

use crate::types::PriceRange;

/// Group an integer with `,` every three digits.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a service-supplied price as a grouped integer amount.
///
/// Fractions are rounded; negative input clamps to zero.
pub fn price(value: f64) -> String {
    thousands(value.max(0.0).round() as u64)
}

/// `20,000–60,000원`
pub fn price_range(range: PriceRange) -> String {
    format!("{}–{}원", thousands(range.min()), thousands(range.max()))
}
