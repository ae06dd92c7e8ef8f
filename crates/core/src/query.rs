// ABOUTME: Query modifier parsing (srt:, dl:) and filter/sort over assembled records.
// ABOUTME: Sorting is stable so equal keys keep page order.

//! Query pipeline.
//!
//! A raw query may carry two modifiers anywhere after (or between) the search
//! words:
//!
//! - `srt:<key><dir>`: `r` sorts by rating score, `p` by price; an optional
//!   `a`/`d` picks the direction. Rating defaults to descending, price to
//!   ascending. Any other key disables sorting.
//! - `dl:<N>`: keep only records whose delivery lead time is at most N days.
//!
//! Both are removed from the text before it is used as the search term.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::derived::parse_lead_time;
use crate::models::ProductRecord;
use crate::text::collapse_whitespace;

static SORT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\s)srt:(\S*)").unwrap());
static DELIVERY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\s)dl:(\S*)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    None,
    Price,
    Rating,
}

/// Parsed user input. Derived once per request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuerySpec {
    pub search_terms: String,
    pub sort_key: SortKey,
    pub sort_descending: bool,
    pub max_delivery_days: Option<u32>,
}

impl QuerySpec {
    /// Cache key for the result set of these search terms.
    pub fn cache_key(&self) -> String {
        format!("search_{}", self.search_terms.to_lowercase())
    }
}

/// Splits modifiers out of a raw query string.
///
/// `srt:` is taken out first; `dl:` is then read from what remains.
pub fn parse_query(raw: &str) -> QuerySpec {
    let (remainder, sort_spec) = take_modifier(&SORT_RE, raw);
    let (remainder, delivery_spec) = take_modifier(&DELIVERY_RE, &remainder);

    let (sort_key, sort_descending) = sort_spec
        .as_deref()
        .map(parse_sort_spec)
        .unwrap_or((SortKey::None, false));

    let max_delivery_days = delivery_spec
        .as_deref()
        .and_then(|spec| spec.parse::<i64>().ok())
        .and_then(|days| u32::try_from(days).ok());

    QuerySpec {
        search_terms: collapse_whitespace(&remainder),
        sort_key,
        sort_descending,
        max_delivery_days,
    }
}

fn take_modifier(re: &Regex, text: &str) -> (String, Option<String>) {
    match re.captures(text) {
        Some(caps) => {
            let value = caps.get(1).map(|m| m.as_str().to_string());
            let remainder = re.replace(text, " ").into_owned();
            (remainder, value)
        }
        None => (text.to_string(), None),
    }
}

fn parse_sort_spec(spec: &str) -> (SortKey, bool) {
    let mut chars = spec.chars();
    let (key, default_desc) = match chars.next() {
        Some('r') => (SortKey::Rating, true),
        Some('p') => (SortKey::Price, false),
        _ => return (SortKey::None, false),
    };
    let descending = match chars.next() {
        Some('a') => false,
        Some('d') => true,
        _ => default_desc,
    };
    (key, descending)
}

/// Rating × review count, with missing parts counted as zero.
pub fn rating_score(record: &ProductRecord) -> f64 {
    let rating = record.rating.map(f64::from).unwrap_or(0.0);
    let reviews = record.review_count.map(f64::from).unwrap_or(0.0);
    rating * reviews
}

/// Keeps records whose delivery lead time is known and within `max_days`.
pub fn filter_by_delivery(records: Vec<ProductRecord>, max_days: u32) -> Vec<ProductRecord> {
    records
        .into_iter()
        .filter(|r| {
            r.delivery
                .as_deref()
                .and_then(parse_lead_time)
                .is_some_and(|days| days <= max_days)
        })
        .collect()
}

/// Stable sort by the key in `spec`.
pub fn sort_records(records: Vec<ProductRecord>, spec: &QuerySpec) -> Vec<ProductRecord> {
    let key: fn(&ProductRecord) -> f64 = match spec.sort_key {
        SortKey::None => return records,
        SortKey::Price => |r: &ProductRecord| r.price,
        SortKey::Rating => rating_score,
    };

    let mut scored: Vec<(f64, ProductRecord)> =
        records.into_iter().map(|r| (key(&r), r)).collect();
    scored.sort_by(|(a, _), (b, _)| {
        let ord = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        if spec.sort_descending {
            ord.reverse()
        } else {
            ord
        }
    });
    scored.into_iter().map(|(_, r)| r).collect()
}

/// Applies the delivery filter and then the sort.
pub fn apply_query(records: Vec<ProductRecord>, spec: &QuerySpec) -> Vec<ProductRecord> {
    let before = records.len();
    let filtered = match spec.max_delivery_days {
        Some(max_days) => filter_by_delivery(records, max_days),
        None => records,
    };
    debug!(
        before,
        after = filtered.len(),
        sort = ?spec.sort_key,
        descending = spec.sort_descending,
        "applied query modifiers"
    );
    sort_records(filtered, spec)
}
