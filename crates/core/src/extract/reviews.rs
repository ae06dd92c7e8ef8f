// ABOUTME: Review-count extraction with three markup fallbacks.
// ABOUTME: Accessibility label, bare numeric span, then parenthesized count inside a reviews link.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

use super::{first_success, Strategy};
use crate::selectors;
use crate::text::stripped_text;

static ARIA_RATINGS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\d,]+)\s+ratings?").unwrap());
static BARE_COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([\d,]+)$").unwrap());
static PAREN_COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([\d,]+)\s*\)").unwrap());

/// Strategies in priority order.
pub const STRATEGIES: &[Strategy<String>] = &[from_aria_label, from_bare_span, from_parenthesized];

/// Raw review count text such as "1,234", from the first strategy that matches.
pub fn review_count(fragment: ElementRef<'_>) -> Option<String> {
    first_success(fragment, STRATEGIES)
}

/// "<N> ratings" in the aria-label of the first labelled span of the reviews link.
pub fn from_aria_label(fragment: ElementRef<'_>) -> Option<String> {
    let link = fragment.select(&selectors::REVIEWS_LINK).next()?;
    let span = link.select(&selectors::ARIA_LABELLED_SPAN).next()?;
    let label = span.value().attr("aria-label")?;
    ARIA_RATINGS_RE
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// A span whose entire text is a number.
pub fn from_bare_span(fragment: ElementRef<'_>) -> Option<String> {
    fragment
        .select(&selectors::REVIEW_COUNT_SPAN)
        .find_map(|span| {
            let text = stripped_text(span);
            BARE_COUNT_RE
                .captures(&text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
}

/// "(N)" inside any span nested in a link to the reviews section.
pub fn from_parenthesized(fragment: ElementRef<'_>) -> Option<String> {
    fragment.select(&selectors::ANY_SPAN).find_map(|span| {
        let text = stripped_text(span);
        let count = PAREN_COUNT_RE.captures(&text)?.get(1)?.as_str().to_string();
        inside_reviews_link(span).then_some(count)
    })
}

fn inside_reviews_link(el: ElementRef<'_>) -> bool {
    el.ancestors().filter_map(ElementRef::wrap).any(|ancestor| {
        ancestor.value().name() == "a"
            && ancestor
                .value()
                .attr("href")
                .is_some_and(|href| href.contains("customerReviews"))
    })
}
