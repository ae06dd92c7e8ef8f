// ABOUTME: Turns listing fragments of a results page into validated ProductRecords.
// ABOUTME: Each fragment yields either a record or an inspectable skip reason.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use scraper::Html;
use tracing::{debug, trace};

use crate::derived::{canonical_url, delivery_label, effective_price};
use crate::extract::{extract_listing, item_id};
use crate::models::{ProductRecord, RawListing};
use crate::options::SearchOptions;
use crate::selectors;
use crate::text::{parse_amount, parse_count};

/// Why a listing fragment did not become a record.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingId,
    DuplicateId,
    MissingTitle,
    MissingUrl,
    MissingPrice,
    UnparseablePrice(String),
    NonPositivePrice(f64),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingId => write!(f, "missing item id"),
            SkipReason::DuplicateId => write!(f, "duplicate item id"),
            SkipReason::MissingTitle => write!(f, "missing title"),
            SkipReason::MissingUrl => write!(f, "missing url"),
            SkipReason::MissingPrice => write!(f, "missing price"),
            SkipReason::UnparseablePrice(raw) => write!(f, "unparseable price {raw:?}"),
            SkipReason::NonPositivePrice(value) => write!(f, "non-positive price {value}"),
        }
    }
}

/// A fragment that was dropped, with its position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedListing {
    pub position: usize,
    pub id: Option<String>,
    pub reason: SkipReason,
}

/// Result of processing one listing fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingOutcome {
    Record(ProductRecord),
    Skipped(SkippedListing),
}

impl ListingOutcome {
    pub fn record(&self) -> Option<&ProductRecord> {
        match self {
            ListingOutcome::Record(r) => Some(r),
            ListingOutcome::Skipped(_) => None,
        }
    }

    pub fn skipped(&self) -> Option<&SkippedListing> {
        match self {
            ListingOutcome::Record(_) => None,
            ListingOutcome::Skipped(s) => Some(s),
        }
    }
}

/// Validates raw field values and derives computed fields.
///
/// Rules apply in order: identifier, title, URL, positive price.
pub fn assemble(
    raw: RawListing,
    opts: &SearchOptions,
    today: NaiveDate,
) -> Result<ProductRecord, SkipReason> {
    let id = raw.id.ok_or(SkipReason::MissingId)?;
    let title = raw
        .title
        .filter(|t| !t.is_empty())
        .ok_or(SkipReason::MissingTitle)?;
    let raw_url = raw
        .url
        .filter(|u| !u.is_empty())
        .ok_or(SkipReason::MissingUrl)?;

    let raw_price = raw.price.ok_or(SkipReason::MissingPrice)?;
    let price = parse_amount(&raw_price).ok_or(SkipReason::UnparseablePrice(raw_price))?;
    if price <= 0.0 {
        return Err(SkipReason::NonPositivePrice(price));
    }

    let url = canonical_url(opts.origin_base(), &opts.affiliate_tag, &raw_url, Some(&id));
    let effective_price = raw
        .coupon
        .as_deref()
        .and_then(|coupon| effective_price(price, coupon));
    let delivery = raw
        .delivery_date
        .as_deref()
        .map(|date| delivery_label(date, today));
    let rating = raw
        .rating
        .as_deref()
        .and_then(|r| r.parse::<f32>().ok())
        .filter(|r| (0.0..=5.0).contains(r));
    let review_count = raw.review_count.as_deref().and_then(parse_count);

    Ok(ProductRecord {
        id,
        title,
        url,
        price,
        coupon: raw.coupon,
        effective_price,
        delivery,
        delivery_date: raw.delivery_date,
        rating,
        review_count,
        image_url: raw.image_url,
        sponsored: raw.sponsored,
    })
}

/// Processes up to `opts.max_results` listing fragments in page order.
pub fn parse_listings(html: &str, opts: &SearchOptions, today: NaiveDate) -> Vec<ListingOutcome> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();

    let outcomes: Vec<ListingOutcome> = document
        .select(&selectors::LISTING)
        .take(opts.max_results)
        .enumerate()
        .map(|(position, fragment)| {
            let skip = |id: Option<String>, reason: SkipReason| {
                trace!(position, id = ?id, %reason, "skipping listing");
                ListingOutcome::Skipped(SkippedListing {
                    position,
                    id,
                    reason,
                })
            };

            // The id gates everything else.
            let Some(id) = item_id(fragment) else {
                return skip(None, SkipReason::MissingId);
            };
            if !seen.insert(id.clone()) {
                return skip(Some(id), SkipReason::DuplicateId);
            }

            match assemble(extract_listing(fragment), opts, today) {
                Ok(record) => {
                    trace!(position, id = %record.id, title = %record.title, "parsed listing");
                    ListingOutcome::Record(record)
                }
                Err(reason) => skip(Some(id), reason),
            }
        })
        .collect();

    debug!(
        listings = outcomes.len(),
        records = outcomes.iter().filter(|o| o.record().is_some()).count(),
        "parsed results page"
    );
    outcomes
}

/// Records only, in page order.
pub fn extract_records(html: &str, opts: &SearchOptions, today: NaiveDate) -> Vec<ProductRecord> {
    parse_listings(html, opts, today)
        .into_iter()
        .filter_map(|outcome| match outcome {
            ListingOutcome::Record(record) => Some(record),
            ListingOutcome::Skipped(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 16).unwrap()
    }

    fn complete() -> RawListing {
        RawListing {
            id: Some("B0ABCDEF12".to_string()),
            title: Some("Acme LED Desk Lamp".to_string()),
            sponsored: false,
            url: Some("/Acme-Lamp/dp/B0ABCDEF12/ref=sr_1_1".to_string()),
            price: Some("$50.00".to_string()),
            coupon: Some("20% off".to_string()),
            delivery_date: Some("Tue, Mar 18".to_string()),
            rating: Some("4.5".to_string()),
            review_count: Some("1,234".to_string()),
            image_url: Some("https://img.example/lamp.jpg".to_string()),
        }
    }

    #[test]
    fn assembles_complete_listing() {
        let record = assemble(complete(), &SearchOptions::default(), today()).unwrap();
        assert_eq!(
            record,
            ProductRecord {
                id: "B0ABCDEF12".to_string(),
                title: "Acme LED Desk Lamp".to_string(),
                url: "https://www.amazon.com/dp/B0ABCDEF12?tag=dillz-20".to_string(),
                price: 50.0,
                coupon: Some("20% off".to_string()),
                effective_price: Some(40.0),
                delivery: Some("Delivery in 2 days".to_string()),
                delivery_date: Some("Tue, Mar 18".to_string()),
                rating: Some(4.5),
                review_count: Some(1234),
                image_url: Some("https://img.example/lamp.jpg".to_string()),
                sponsored: false,
            }
        );
    }

    #[test]
    fn each_mandatory_field_is_required() {
        let opts = SearchOptions::default();
        let cases: Vec<(fn(&mut RawListing), SkipReason)> = vec![
            (|r: &mut RawListing| r.id = None, SkipReason::MissingId),
            (|r: &mut RawListing| r.title = None, SkipReason::MissingTitle),
            (|r: &mut RawListing| r.title = Some(String::new()), SkipReason::MissingTitle),
            (|r: &mut RawListing| r.url = None, SkipReason::MissingUrl),
            (|r: &mut RawListing| r.price = None, SkipReason::MissingPrice),
            (
                |r: &mut RawListing| r.price = Some("See options".to_string()),
                SkipReason::UnparseablePrice("See options".to_string()),
            ),
            (|r: &mut RawListing| r.price = Some("$0.00".to_string()), SkipReason::NonPositivePrice(0.0)),
        ];
        for (mutate, expected) in cases {
            let mut raw = complete();
            mutate(&mut raw);
            assert_eq!(assemble(raw, &opts, today()), Err(expected));
        }
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let raw = RawListing {
            coupon: None,
            delivery_date: None,
            rating: Some("n/a".to_string()),
            review_count: None,
            image_url: None,
            ..complete()
        };
        let record = assemble(raw, &SearchOptions::default(), today()).unwrap();
        assert_eq!(record.effective_price, None);
        assert_eq!(record.delivery, None);
        assert_eq!(record.rating, None);
        assert_eq!(record.review_count, None);
    }

    fn card(asin: &str, title: &str, price: &str) -> String {
        format!(
            r#"<div data-component-type="s-search-result" data-asin="{asin}">
                 <div data-cy="title-recipe"><a class="a-link-normal" href="/dp/{asin}"><span>{title}</span></a></div>
                 <span class="a-price"><span class="a-offscreen">{price}</span></span>
               </div>"#
        )
    }

    #[test]
    fn parse_listings_reports_skips_in_page_order() {
        let html = format!(
            "<html><body>{}{}{}{}</body></html>",
            card("B000000001", "Good Lamp", "$10.00"),
            card("", "No Id Lamp", "$10.00"),
            card("B000000003", "Free Lamp", "$0.00"),
            card("B000000001", "Repeat Lamp", "$12.00"),
        );
        let outcomes = parse_listings(&html, &SearchOptions::default(), today());
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].record().map(|r| r.title.as_str()), Some("Good Lamp"));
        let reasons: Vec<_> = outcomes
            .iter()
            .filter_map(ListingOutcome::skipped)
            .map(|s| (s.position, s.reason.clone()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (1, SkipReason::MissingId),
                (2, SkipReason::NonPositivePrice(0.0)),
                (3, SkipReason::DuplicateId),
            ]
        );
    }

    #[test]
    fn extraction_stops_at_result_cap() {
        let cards: String = (0..40)
            .map(|i| card(&format!("B{i:09}"), &format!("Lamp {i}"), "$5.00"))
            .collect();
        let html = format!("<html><body>{cards}</body></html>");

        let records = extract_records(&html, &SearchOptions::default(), today());
        assert_eq!(records.len(), 30);
        assert_eq!(records[0].id, "B000000000");
        assert_eq!(records[29].id, "B000000029");

        let opts = SearchOptions::builder().max_results(3).build();
        assert_eq!(extract_records(&html, &opts, today()).len(), 3);
    }

    #[test]
    fn empty_page_yields_nothing() {
        assert!(parse_listings("", &SearchOptions::default(), today()).is_empty());
        assert!(parse_listings("<p>robot check</p>", &SearchOptions::default(), today()).is_empty());
    }
}
