// ABOUTME: Launcher feedback items built from product records.
// ABOUTME: Short title, subtitle with price/rating/delivery, canonical URL argument, and icon.

use serde::{Deserialize, Serialize};

use crate::collab::{cached, Cache, ImageStore};
use crate::models::ProductRecord;
use crate::options::SearchOptions;
use crate::text::{format_money, format_thousands};
use crate::title::shorten_title;

pub const SUBTITLE_SEPARATOR: &str = "   ";
const EMPTY_SUBTITLE: &str = "No additional information available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    pub path: String,
}

/// One row in the launcher's result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    pub valid: bool,
    pub icon: Icon,
}

/// Script-filter document: `{"items": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub items: Vec<FeedbackItem>,
}

impl FeedbackItem {
    fn placeholder(title: &str, subtitle: &str, icon: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            arg: None,
            valid: false,
            icon: Icon {
                path: icon.to_string(),
            },
        }
    }
}

/// Subtitle parts joined with [`SUBTITLE_SEPARATOR`], present-only, in fixed order:
/// sponsorship, price, rating, delivery.
pub fn subtitle(record: &ProductRecord, currency_symbol: &str) -> String {
    let sponsored = record.sponsored.then(|| "📢 Sponsored".to_string());

    let price = Some(match record.effective_price {
        Some(effective) => format!("🏷️ {}", format_money(currency_symbol, effective)),
        None => format!("💰 {}", format_money(currency_symbol, record.price)),
    });

    let rating = record.rating.map(|stars| match record.review_count {
        Some(count) => format!("{stars:.1} ⭐ ({})", format_thousands(u64::from(count))),
        None => format!("{stars:.1} ⭐"),
    });

    let delivery = record
        .delivery
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!("📦 {d}"));

    let parts: Vec<String> = [sponsored, price, rating, delivery]
        .into_iter()
        .flatten()
        .collect();
    if parts.is_empty() {
        EMPTY_SUBTITLE.to_string()
    } else {
        parts.join(SUBTITLE_SEPARATOR)
    }
}

/// Compressed title, falling back to the full title if compression leaves nothing.
pub fn display_title(record: &ProductRecord) -> String {
    let short = shorten_title(&record.title);
    if short.is_empty() {
        record.title.clone()
    } else {
        short
    }
}

/// Local icon path for a record, via the image cache; the default icon on any failure.
pub fn icon_for<C, I>(record: &ProductRecord, opts: &SearchOptions, cache: &C, images: &I) -> String
where
    C: Cache + ?Sized,
    I: ImageStore + ?Sized,
{
    let Some(image_url) = record.image_url.as_deref() else {
        return opts.default_icon.clone();
    };

    let path: Option<String> = cached(
        cache,
        &format!("img_{}", record.id),
        opts.image_max_age,
        || {
            images
                .fetch_image(image_url, &record.id)
                .map(|p| p.to_string_lossy().into_owned())
        },
        Option::is_some,
    );
    path.unwrap_or_else(|| opts.default_icon.clone())
}

pub fn item_for_record<C, I>(record: &ProductRecord, opts: &SearchOptions, cache: &C, images: &I) -> FeedbackItem
where
    C: Cache + ?Sized,
    I: ImageStore + ?Sized,
{
    FeedbackItem {
        title: display_title(record),
        subtitle: subtitle(record, &opts.currency_symbol),
        arg: Some(record.url.clone()),
        valid: true,
        icon: Icon {
            path: icon_for(record, opts, cache, images),
        },
    }
}

/// Placeholder shown before the user has typed anything.
pub fn prompt_feedback(opts: &SearchOptions) -> Feedback {
    Feedback {
        items: vec![FeedbackItem::placeholder(
            "Start typing to search Amazon...",
            "Your search will be processed with associate tag",
            &opts.default_icon,
        )],
    }
}

/// Feedback for a finished search; a placeholder row when nothing survived.
pub fn build_feedback<C, I>(records: &[ProductRecord], opts: &SearchOptions, cache: &C, images: &I) -> Feedback
where
    C: Cache + ?Sized,
    I: ImageStore + ?Sized,
{
    if records.is_empty() {
        return Feedback {
            items: vec![FeedbackItem::placeholder(
                "No results found",
                "Try a different search term",
                &opts.default_icon,
            )],
        };
    }

    Feedback {
        items: records
            .iter()
            .map(|record| item_for_record(record, opts, cache, images))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{NoCache, NoImages};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::path::PathBuf;

    fn record() -> ProductRecord {
        ProductRecord {
            id: "B0ABCDEF12".to_string(),
            title: "Acme Premium LED Desk Lamp with USB Port, Black, 2-Pack".to_string(),
            url: "https://www.amazon.com/dp/B0ABCDEF12?tag=dillz-20".to_string(),
            price: 50.0,
            coupon: None,
            effective_price: None,
            delivery: None,
            delivery_date: None,
            rating: None,
            review_count: None,
            image_url: None,
            sponsored: false,
        }
    }

    #[test]
    fn subtitle_with_only_price() {
        assert_eq!(subtitle(&record(), "$"), "💰 $50.00");
    }

    #[test]
    fn subtitle_all_parts_in_order() {
        let rec = ProductRecord {
            sponsored: true,
            coupon: Some("20% off".to_string()),
            effective_price: Some(40.0),
            rating: Some(4.5),
            review_count: Some(12034),
            delivery: Some("Delivery tomorrow".to_string()),
            ..record()
        };
        assert_eq!(
            subtitle(&rec, "$"),
            "📢 Sponsored   🏷️ $40.00   4.5 ⭐ (12,034)   📦 Delivery tomorrow"
        );
    }

    #[test]
    fn subtitle_rating_without_reviews() {
        let rec = ProductRecord {
            rating: Some(4.0),
            ..record()
        };
        assert_eq!(subtitle(&rec, "$"), "💰 $50.00   4.0 ⭐");
    }

    #[test]
    fn subtitle_rating_keeps_one_decimal() {
        let rec = ProductRecord {
            rating: Some(5.0),
            review_count: Some(12),
            ..record()
        };
        assert_eq!(subtitle(&rec, "$"), "💰 $50.00   5.0 ⭐ (12)");
    }

    #[test]
    fn item_uses_short_title_and_canonical_url() {
        let item = item_for_record(&record(), &SearchOptions::default(), &NoCache, &NoImages);
        assert_eq!(item.title, "Acme LED Desk Lamp USB Port Black (2pk)");
        assert_eq!(item.arg.as_deref(), Some("https://www.amazon.com/dp/B0ABCDEF12?tag=dillz-20"));
        assert!(item.valid);
        assert_eq!(item.icon.path, "icon.png");
    }

    struct CountingImages {
        calls: Cell<u32>,
        result: Option<PathBuf>,
    }

    impl ImageStore for CountingImages {
        fn fetch_image(&self, _image_url: &str, item_id: &str) -> Option<PathBuf> {
            assert_eq!(item_id, "B0ABCDEF12");
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    #[test]
    fn icon_falls_back_to_default_on_download_failure() {
        let rec = ProductRecord {
            image_url: Some("https://img.example/lamp.jpg".to_string()),
            ..record()
        };
        let images = CountingImages {
            calls: Cell::new(0),
            result: None,
        };
        assert_eq!(icon_for(&rec, &SearchOptions::default(), &NoCache, &images), "icon.png");
        assert_eq!(images.calls.get(), 1);

        let images = CountingImages {
            calls: Cell::new(0),
            result: Some(PathBuf::from("/tmp/B0ABCDEF12.png")),
        };
        assert_eq!(
            icon_for(&rec, &SearchOptions::default(), &NoCache, &images),
            "/tmp/B0ABCDEF12.png"
        );
    }

    #[test]
    fn empty_results_get_placeholder() {
        let feedback = build_feedback(&[], &SearchOptions::default(), &NoCache, &NoImages);
        assert_eq!(feedback.items.len(), 1);
        assert_eq!(feedback.items[0].title, "No results found");
        assert!(!feedback.items[0].valid);
        assert_eq!(feedback.items[0].arg, None);
    }

    #[test]
    fn feedback_serializes_as_script_filter_json() {
        let feedback = build_feedback(&[record()], &SearchOptions::default(), &NoCache, &NoImages);
        let json = serde_json::to_value(&feedback).unwrap();
        assert_eq!(json["items"][0]["arg"], "https://www.amazon.com/dp/B0ABCDEF12?tag=dillz-20");
        assert_eq!(json["items"][0]["icon"]["path"], "icon.png");
        assert_eq!(json["items"][0]["valid"], true);
    }
}
