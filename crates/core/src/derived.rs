// ABOUTME: Values computed from other listing fields: canonical affiliate URL, effective price, delivery lead time.
// ABOUTME: Every computation degrades to an absent value or the raw input instead of failing.

use chrono::{Datelike, Month, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{trace, warn};
use url::Url;

use crate::text::{parse_amount, round_cents};

static ITEM_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{10}$").unwrap());
static DP_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/dp/([A-Z0-9]{10})(?:/|\?|$)").unwrap());
static LEAD_DAYS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:delivery\s+)?in\s+(\d+)\s+days?$").unwrap());

/// Returns true for identifiers in the marketplace's ten-character format.
pub fn is_item_id(candidate: &str) -> bool {
    ITEM_ID_RE.is_match(candidate)
}

/// Pulls an item identifier out of a `/dp/<id>` link.
pub fn item_id_from_url(url: &str) -> Option<String> {
    DP_PATH_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Builds the outbound link for a listing.
///
/// With a recoverable identifier the link is `<origin>/dp/<id>?tag=<tag>`.
/// Otherwise the raw link is made absolute and the tag appended as an extra
/// query parameter.
pub fn canonical_url(origin: &str, affiliate_tag: &str, raw_url: &str, item_id: Option<&str>) -> String {
    let origin = origin.trim_end_matches('/');
    let id = item_id
        .filter(|id| is_item_id(id))
        .map(str::to_string)
        .or_else(|| item_id_from_url(raw_url));

    if let Some(id) = id {
        return format!("{origin}/dp/{id}?tag={affiliate_tag}");
    }

    let absolute = resolve_url(origin, raw_url);
    let sep = if absolute.contains('?') { '&' } else { '?' };
    format!("{absolute}{sep}tag={affiliate_tag}")
}

/// Resolves a possibly relative link against the origin.
pub fn resolve_url(origin: &str, raw_url: &str) -> String {
    let raw_url = raw_url.trim();
    if raw_url.starts_with("http://") || raw_url.starts_with("https://") {
        return raw_url.to_string();
    }
    match Url::parse(origin).and_then(|base| base.join(raw_url)) {
        Ok(resolved) => resolved.to_string(),
        Err(err) => {
            trace!(raw_url, %err, "could not resolve link against origin");
            format!("{}/{}", origin.trim_end_matches('/'), raw_url.trim_start_matches('/'))
        }
    }
}

/// Applies a coupon to a price.
///
/// Percent coupons ("20% off") scale the price; currency coupons ("$5 off")
/// subtract from it. The result is rounded to cents and kept only when it is
/// positive and below the nominal price.
pub fn effective_price(price: f64, coupon: &str) -> Option<f64> {
    let cleaned = coupon
        .to_lowercase()
        .replace("with coupon", "")
        .replace("off", "")
        .replace("discount", "");
    let cleaned = cleaned.trim();

    let discounted = if cleaned.contains('%') {
        match cleaned.replace('%', "").trim().parse::<f64>() {
            Ok(percent) => price * (1.0 - percent / 100.0),
            Err(err) => {
                warn!(coupon, %err, "could not parse percent coupon");
                return None;
            }
        }
    } else if cleaned.contains('$') {
        match parse_amount(cleaned) {
            Some(discount) => price - discount,
            None => {
                warn!(coupon, "could not parse amount coupon");
                return None;
            }
        }
    } else {
        return None;
    };

    let discounted = round_cents(discounted);
    (discounted.is_finite() && discounted > 0.0 && discounted < price).then_some(discounted)
}

/// Canonical label for a number of days until delivery.
pub fn format_lead_time(days: i64) -> String {
    match days {
        0 => "Delivery today".to_string(),
        1 => "Delivery tomorrow".to_string(),
        n => format!("Delivery in {n} days"),
    }
}

/// Turns "<weekday>, <month> <day>" into a lead-time label relative to `today`.
///
/// Dates already past this year roll into next year. Any text that does not
/// parse is returned unchanged.
pub fn delivery_label(date_text: &str, today: NaiveDate) -> String {
    match days_until(date_text, today) {
        Some(days) => format_lead_time(days),
        None => date_text.to_string(),
    }
}

fn days_until(date_text: &str, today: NaiveDate) -> Option<i64> {
    let without_commas = date_text.replace(',', " ");
    let parts: Vec<&str> = without_commas.split_whitespace().collect();
    let (month, day) = match parts.as_slice() {
        [_, month, day] | [month, day] => (*month, *day),
        _ => return None,
    };

    let month = month.trim_end_matches('.');
    // chrono knows "Sep" and "September" but not "Sept".
    let month = if month.eq_ignore_ascii_case("sept") { "sep" } else { month };
    let month = month.parse::<Month>().ok()?.number_from_month();
    let day = day.parse::<u32>().ok()?;

    let mut delivery = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if delivery < today {
        delivery = NaiveDate::from_ymd_opt(today.year() + 1, month, day)?;
    }
    Some((delivery - today).num_days())
}

/// Reverses a lead-time label into a day count.
///
/// Accepts "today", "tomorrow", and "in N days", with or without the leading
/// "Delivery". Anything else has no known lead time.
pub fn parse_lead_time(label: &str) -> Option<u32> {
    let label = label.trim();
    let lower = label.to_lowercase();
    let core = lower.strip_prefix("delivery").map(str::trim).unwrap_or(&lower);
    match core {
        "today" => Some(0),
        "tomorrow" => Some(1),
        _ => LEAD_DAYS_RE
            .captures(label)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok()),
    }
}
