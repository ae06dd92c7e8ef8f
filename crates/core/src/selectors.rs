// ABOUTME: Pre-compiled CSS selectors for the marketplace results page.
// ABOUTME: One place to update when the listing markup shifts.

//! CSS selectors for search-result listings.
//!
//! Selector parsing is done once per process; every extractor borrows the
//! compiled selector from here.

use once_cell::sync::Lazy;
use scraper::Selector;

fn compile(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// One product card in the results grid.
pub static LISTING: Lazy<Selector> =
    Lazy::new(|| compile(r#"div[data-component-type="s-search-result"]"#));

/// Attribute on the listing card carrying the item identifier.
pub const ITEM_ID_ATTR: &str = "data-asin";

pub static TITLE_CONTAINER: Lazy<Selector> =
    Lazy::new(|| compile(r#"div[data-cy="title-recipe"]"#));

pub static TITLE_LINK: Lazy<Selector> = Lazy::new(|| compile("a.a-link-normal"));

pub static PRICE: Lazy<Selector> = Lazy::new(|| compile("span.a-price"));

pub static PRICE_OFFSCREEN: Lazy<Selector> = Lazy::new(|| compile("span.a-offscreen"));

pub static COUPON: Lazy<Selector> = Lazy::new(|| compile("span.s-coupon-unclipped"));

pub static DELIVERY_CONTAINER: Lazy<Selector> =
    Lazy::new(|| compile(r#"div[data-cy="delivery-recipe"]"#));

pub static RATING_ALT: Lazy<Selector> = Lazy::new(|| compile("span.a-icon-alt"));

pub static REVIEWS_LINK: Lazy<Selector> =
    Lazy::new(|| compile(r#"a[href*="customerReviews"]"#));

pub static ARIA_LABELLED_SPAN: Lazy<Selector> = Lazy::new(|| compile("span[aria-label]"));

pub static REVIEW_COUNT_SPAN: Lazy<Selector> =
    Lazy::new(|| compile("span.a-size-base, span.s-underline-text"));

pub static ANY_SPAN: Lazy<Selector> = Lazy::new(|| compile("span"));

pub static IMAGE: Lazy<Selector> = Lazy::new(|| compile("img.s-image"));
