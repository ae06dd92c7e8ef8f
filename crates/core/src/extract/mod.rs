// ABOUTME: Per-field extraction from one listing fragment of a results page.
// ABOUTME: Each field is an ordered list of strategies tried until the first one yields a value.

//! Field extraction.
//!
//! Every extractor is a pure function `ElementRef -> Option<T>`. Fields with
//! several markup variants list their strategies in priority order and go
//! through [`first_success`]; the first strategy that yields a value wins and
//! later strategies are never consulted, even if that value is rejected
//! further down the pipeline.
//!
//! Submodules:
//! - `fields`: title, URL, price, coupon, delivery, rating, and image extractors.
//! - `reviews`: the review-count fallback chain.
//! - `cleanup`: sponsorship detection and title boilerplate removal.

pub mod cleanup;
pub mod fields;
pub mod reviews;

use scraper::ElementRef;

use crate::models::RawListing;
use crate::selectors::ITEM_ID_ATTR;

/// A single extraction strategy for one field.
pub type Strategy<T> = fn(ElementRef<'_>) -> Option<T>;

/// Runs `strategies` in order and returns the first value produced.
pub fn first_success<T>(fragment: ElementRef<'_>, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(fragment))
}

/// Reads the item identifier from the listing card.
pub fn item_id(fragment: ElementRef<'_>) -> Option<String> {
    fragment
        .value()
        .attr(ITEM_ID_ATTR)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Runs every field extractor over one fragment.
///
/// The title goes through boilerplate cleanup here, so `title` is the display
/// text and `sponsored` reflects the marker found in the raw text.
pub fn extract_listing(fragment: ElementRef<'_>) -> RawListing {
    let (title, sponsored) = match fields::title(fragment) {
        Some(raw) => {
            let cleaned = cleanup::clean_title(&raw);
            (Some(cleaned.title), cleaned.sponsored)
        }
        None => (None, false),
    };

    RawListing {
        id: item_id(fragment),
        title,
        sponsored,
        url: fields::url(fragment),
        price: fields::price(fragment),
        coupon: fields::coupon(fragment),
        delivery_date: fields::delivery_date(fragment),
        rating: fields::rating(fragment),
        review_count: reviews::review_count(fragment),
        image_url: fields::image_url(fragment),
    }
}
