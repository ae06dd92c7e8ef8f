// ABOUTME: Core library for extracting, normalizing, and ranking marketplace search listings.
// ABOUTME: Re-exports the pipeline entry points, record types, query parsing, and collaborator traits.

//! Shopscout core.
//!
//! Turns a marketplace results page into typed [`ProductRecord`]s, derives
//! effective prices, delivery lead times and affiliate links, applies the
//! `srt:`/`dl:` query modifiers, and renders launcher feedback items.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Local;
//! use shopscout_core::{extract_records, SearchOptions};
//!
//! let html = std::fs::read_to_string("results.html").unwrap();
//! let records = extract_records(&html, &SearchOptions::default(), Local::now().date_naive());
//! for record in records {
//!     println!("{} {}", record.price, record.title);
//! }
//! ```

pub mod assemble;
pub mod collab;
pub mod derived;
pub mod error;
pub mod extract;
pub mod models;
pub mod options;
pub mod pipeline;
pub mod present;
pub mod query;
pub mod selectors;
pub mod text;
pub mod title;

pub use crate::assemble::{
    assemble, extract_records, parse_listings, ListingOutcome, SkipReason, SkippedListing,
};
pub use crate::collab::{cached, Cache, Fetcher, ImageStore, NoCache, NoImages};
pub use crate::derived::{
    canonical_url, delivery_label, effective_price, format_lead_time, parse_lead_time,
};
pub use crate::error::ScoutError;
pub use crate::models::{ProductRecord, RawListing};
pub use crate::options::{SearchOptions, SearchOptionsBuilder};
pub use crate::pipeline::{fetch_records, search, SearchResults};
pub use crate::present::{build_feedback, prompt_feedback, Feedback, FeedbackItem, Icon};
pub use crate::query::{apply_query, parse_query, QuerySpec, SortKey};
pub use crate::title::{shorten_title, title_parts, TitleParts};
