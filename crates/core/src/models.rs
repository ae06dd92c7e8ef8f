// ABOUTME: Typed records produced by the extraction pipeline.
// ABOUTME: ProductRecord is the normalized listing; RawListing holds per-field extraction results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::derived::delivery_label;

/// One normalized product listing from a results page.
///
/// Created once per search response and never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub title: String,
    /// Canonical link carrying the affiliate tag.
    pub url: String,
    pub price: f64,
    pub coupon: Option<String>,
    pub effective_price: Option<f64>,
    /// One of "Delivery today", "Delivery tomorrow", "Delivery in N days",
    /// or the raw date text when it could not be resolved.
    pub delivery: Option<String>,
    /// The date text the delivery label was computed from, kept so the label
    /// can be recomputed for a later day.
    #[serde(default)]
    pub delivery_date: Option<String>,
    pub rating: Option<f32>,
    pub review_count: Option<u32>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub sponsored: bool,
}

impl ProductRecord {
    /// Price to show: the effective price when a coupon applies, the nominal price otherwise.
    pub fn display_price(&self) -> f64 {
        self.effective_price.unwrap_or(self.price)
    }

    /// Recomputes the delivery label relative to `today` from the stored date text.
    pub fn relabel_delivery(mut self, today: NaiveDate) -> Self {
        if let Some(date) = self.delivery_date.as_deref() {
            self.delivery = Some(delivery_label(date, today));
        }
        self
    }
}

/// Raw per-field extraction results for one listing fragment.
///
/// Every field is whatever the first successful strategy produced, before any
/// validation or derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub id: Option<String>,
    pub title: Option<String>,
    pub sponsored: bool,
    pub url: Option<String>,
    pub price: Option<String>,
    pub coupon: Option<String>,
    pub delivery_date: Option<String>,
    pub rating: Option<String>,
    pub review_count: Option<String>,
    pub image_url: Option<String>,
}
