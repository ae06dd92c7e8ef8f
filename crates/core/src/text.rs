// ABOUTME: Text helpers shared by extractors and presentation.
// ABOUTME: Whitespace collapsing, stripped-text joining, amount parsing, and number formatting.

use scraper::ElementRef;

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Joins every non-blank text node under `el`, each trimmed, with single spaces.
pub fn stripped_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a monetary string such as "$1,299.99" into a number.
///
/// Strips the currency sign, thousands separators, and surrounding whitespace.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .collect();
    let value = cleaned.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Parses a count such as "12,345" into an integer.
pub fn parse_count(s: &str) -> Option<u32> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<u32>().ok()
}

/// Rounds a monetary value to whole cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats an amount with a currency symbol and two decimals, e.g. "$1,299.99".
pub fn format_money(symbol: &str, value: f64) -> String {
    let cents = (value * 100.0).round() as u64;
    format!(
        "{}{}.{:02}",
        symbol,
        format_thousands(cents / 100),
        cents % 100
    )
}

/// Formats an integer with comma thousands separators.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
