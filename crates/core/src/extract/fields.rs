// ABOUTME: Single-strategy field extractors for a listing fragment.
// ABOUTME: Title, URL, price, coupon, delivery date, rating, and image each return the raw candidate value.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

use crate::selectors;
use crate::text::{collapse_whitespace, stripped_text};

/// "FREE delivery Tue, Mar 18" / "fastest delivery Mar 17"; captures the date part.
static DELIVERY_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:fastest|free) delivery\s+((?:[a-z]+,?\s+)?(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2})\b",
    )
    .unwrap()
});

static COUPON_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:Save|Get)\s+").unwrap());

fn title_container(fragment: ElementRef<'_>) -> Option<ElementRef<'_>> {
    fragment.select(&selectors::TITLE_CONTAINER).next()
}

/// All visible text inside the title container, whitespace-collapsed.
///
/// There is no fallback: a listing without the container has no title.
pub fn title(fragment: ElementRef<'_>) -> Option<String> {
    let container = title_container(fragment)?;
    let text = collapse_whitespace(&stripped_text(container));
    (!text.is_empty()).then_some(text)
}

/// The product link inside the title container, as written in the markup.
pub fn url(fragment: ElementRef<'_>) -> Option<String> {
    let container = title_container(fragment)?;
    container
        .select(&selectors::TITLE_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

/// The machine-readable amount of the first price element, e.g. "$24.99".
pub fn price(fragment: ElementRef<'_>) -> Option<String> {
    let price = fragment.select(&selectors::PRICE).next()?;
    let offscreen = price.select(&selectors::PRICE_OFFSCREEN).next()?;
    let text = stripped_text(offscreen);
    (!text.is_empty()).then_some(text)
}

/// Coupon badge text with "Save"/"Get" prefixes removed.
pub fn coupon(fragment: ElementRef<'_>) -> Option<String> {
    let badge = fragment.select(&selectors::COUPON).next()?;
    Some(normalize_coupon(&stripped_text(badge))).filter(|c| !c.is_empty())
}

/// Collapses whitespace and strips a leading "Save " or "Get ".
pub fn normalize_coupon(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    COUPON_PREFIX_RE.replace(&collapsed, "").trim().to_string()
}

/// The "<weekday>, <month> <day>" part of the delivery promise, if any.
pub fn delivery_date(fragment: ElementRef<'_>) -> Option<String> {
    let container = fragment.select(&selectors::DELIVERY_CONTAINER).next()?;
    find_delivery_date(&stripped_text(container))
}

/// Searches delivery text for a fastest/free delivery date.
pub fn find_delivery_date(text: &str) -> Option<String> {
    DELIVERY_DATE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First token of the star-rating alt text ("4.5 out of 5 stars" -> "4.5").
pub fn rating(fragment: ElementRef<'_>) -> Option<String> {
    let alt = fragment.select(&selectors::RATING_ALT).next()?;
    let text = stripped_text(alt);
    text.split_whitespace().next().map(str::to_string)
}

/// Source of the primary thumbnail.
pub fn image_url(fragment: ElementRef<'_>) -> Option<String> {
    fragment
        .select(&selectors::IMAGE)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::LISTING;
    use scraper::Html;

    fn with_card<R>(inner: &str, f: impl FnOnce(ElementRef<'_>) -> R) -> R {
        let html = Html::parse_document(&format!(
            r#"<div data-component-type="s-search-result" data-asin="B0ABCDEF12">{inner}</div>"#
        ));
        let card = html.select(&LISTING).next().unwrap();
        f(card)
    }

    #[test]
    fn title_concatenates_text_nodes_in_order() {
        let title = with_card(
            r#"<div data-cy="title-recipe"><h2><span>Acme</span></h2>
               <a class="a-link-normal" href="/x"><span>Desk   Lamp</span></a></div>"#,
            title,
        );
        assert_eq!(title.as_deref(), Some("Acme Desk Lamp"));
    }

    #[test]
    fn title_requires_container() {
        let title = with_card(r#"<h2><span>Acme Desk Lamp</span></h2>"#, title);
        assert_eq!(title, None);
    }

    #[test]
    fn url_must_live_inside_title_container() {
        let url = with_card(
            r#"<a class="a-link-normal" href="/outside">x</a>
               <div data-cy="title-recipe"><span>No link</span></div>"#,
            url,
        );
        assert_eq!(url, None);
    }

    #[test]
    fn price_reads_first_offscreen_amount() {
        let price = with_card(
            r#"<span class="a-price"><span class="a-offscreen">$1,049.00</span><span aria-hidden="true">$1,049</span></span>
               <span class="a-price a-text-price"><span class="a-offscreen">$1,299.00</span></span>"#,
            price,
        );
        assert_eq!(price.as_deref(), Some("$1,049.00"));
    }

    #[test]
    fn price_absent_without_element() {
        assert_eq!(with_card("<span>$5.00</span>", price), None);
    }

    #[test]
    fn coupon_strips_prefixes() {
        assert_eq!(normalize_coupon("  Save   20%\n on this "), "20% on this");
        assert_eq!(normalize_coupon("Get $5 off"), "$5 off");
        assert_eq!(normalize_coupon("Saved $5"), "Saved $5");
        let coupon = with_card(
            r#"<span class="s-coupon-unclipped"><span>Save</span> <span>$3.00</span> with coupon</span>"#,
            coupon,
        );
        assert_eq!(coupon.as_deref(), Some("$3.00 with coupon"));
    }

    #[test]
    fn delivery_date_patterns() {
        assert_eq!(
            find_delivery_date("FREE delivery Tue, Mar 18 on $35 of items shipped by Amazon"),
            Some("Tue, Mar 18".to_string())
        );
        assert_eq!(
            find_delivery_date("Or fastest delivery Mon, Mar 17"),
            Some("Mon, Mar 17".to_string())
        );
        assert_eq!(
            find_delivery_date("FREE delivery March 3"),
            Some("March 3".to_string())
        );
        assert_eq!(find_delivery_date("FREE delivery Today 2 PM - 6 PM"), None);
        assert_eq!(find_delivery_date("Ships to Canada"), None);
    }

    #[test]
    fn delivery_reads_container_text() {
        let date = with_card(
            r#"<div data-cy="delivery-recipe"><span>FREE delivery</span> <span class="a-text-bold">Thu, Jan 2</span></div>"#,
            delivery_date,
        );
        assert_eq!(date.as_deref(), Some("Thu, Jan 2"));
        assert_eq!(with_card("<div>FREE delivery Thu, Jan 2</div>", delivery_date), None);
    }

    #[test]
    fn rating_takes_first_token() {
        let rating = with_card(r#"<i><span class="a-icon-alt">4.3 out of 5 stars</span></i>"#, rating);
        assert_eq!(rating.as_deref(), Some("4.3"));
    }

    #[test]
    fn image_reads_src() {
        let img = with_card(r#"<img class="s-image" src="https://img.example/a.jpg">"#, image_url);
        assert_eq!(img.as_deref(), Some("https://img.example/a.jpg"));
        assert_eq!(with_card(r#"<img src="https://img.example/a.jpg">"#, image_url), None);
    }
}
