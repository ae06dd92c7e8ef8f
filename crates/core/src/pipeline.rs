// ABOUTME: End-to-end search: parse the query, fetch and extract the results page, filter and sort.
// ABOUTME: A failed fetch yields an empty result set; no error escapes the search entry point.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::assemble::extract_records;
use crate::collab::{cached, Cache, Fetcher};
use crate::error::ScoutError;
use crate::models::ProductRecord;
use crate::options::SearchOptions;
use crate::query::{apply_query, parse_query, QuerySpec};

/// Outcome of one search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub query: QuerySpec,
    pub records: Vec<ProductRecord>,
}

/// Fetches the results page for `terms` and extracts its records.
pub fn fetch_records<F>(
    terms: &str,
    opts: &SearchOptions,
    fetcher: &F,
    today: NaiveDate,
) -> Result<Vec<ProductRecord>, ScoutError>
where
    F: Fetcher + ?Sized,
{
    let url = opts.search_url(terms)?;
    debug!(%url, "fetching results page");
    let body = fetcher.fetch(&url, &opts.headers)?;
    Ok(extract_records(&body, opts, today))
}

/// Runs a full search for a raw query string.
///
/// Results are cached under the normalized search terms before query
/// modifiers are applied, so `lamp srt:p` and `lamp dl:2` share one fetch.
/// Delivery labels are recomputed against `today` on every call.
pub fn search<F, C>(
    raw_query: &str,
    opts: &SearchOptions,
    fetcher: &F,
    cache: &C,
    today: NaiveDate,
) -> SearchResults
where
    F: Fetcher + ?Sized,
    C: Cache + ?Sized,
{
    let query = parse_query(raw_query);
    if query.search_terms.is_empty() {
        return SearchResults {
            query,
            records: Vec::new(),
        };
    }

    let records = cached(
        cache,
        &query.cache_key(),
        opts.results_max_age,
        || match fetch_records(&query.search_terms, opts, fetcher, today) {
            Ok(records) => records,
            Err(err) => {
                warn!(terms = %query.search_terms, %err, "search failed");
                Vec::new()
            }
        },
        |records: &Vec<ProductRecord>| !records.is_empty(),
    );

    // Cached labels are relative to the day they were fetched.
    let records: Vec<ProductRecord> = records
        .into_iter()
        .map(|record| record.relabel_delivery(today))
        .collect();
    let records = apply_query(records, &query);
    SearchResults { query, records }
}
