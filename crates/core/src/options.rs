// ABOUTME: Immutable search configuration: origin, affiliate tag, request headers, limits, cache ages.
// ABOUTME: SearchOptionsBuilder provides a fluent API for overriding individual settings.

use std::time::Duration;

use url::Url;

use crate::error::ScoutError;

pub const DEFAULT_ORIGIN: &str = "https://www.amazon.com";
pub const DEFAULT_AFFILIATE_TAG: &str = "dillz-20";
pub const DEFAULT_MAX_RESULTS: usize = 30;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.3 Safari/605.1.15";

/// Configuration passed into every pipeline entry point.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub origin: String,
    pub affiliate_tag: String,
    pub headers: Vec<(String, String)>,
    pub max_results: usize,
    pub results_max_age: Duration,
    pub image_max_age: Duration,
    pub currency_symbol: String,
    pub default_icon: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            affiliate_tag: DEFAULT_AFFILIATE_TAG.to_string(),
            headers: default_headers(),
            max_results: DEFAULT_MAX_RESULTS,
            results_max_age: Duration::from_secs(1800),
            image_max_age: Duration::from_secs(604_800),
            currency_symbol: "$".to_string(),
            default_icon: "icon.png".to_string(),
        }
    }
}

impl SearchOptions {
    /// Create a builder seeded with the default options.
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::new()
    }

    /// Origin without a trailing slash, ready for path concatenation.
    pub fn origin_base(&self) -> &str {
        self.origin.trim_end_matches('/')
    }

    /// Builds the results-page URL for the given search terms.
    pub fn search_url(&self, terms: &str) -> Result<String, ScoutError> {
        let base = format!("{}/s", self.origin_base());
        let url = Url::parse_with_params(&base, &[("k", terms)])
            .map_err(|e| ScoutError::invalid_url(base.clone(), e))?;
        Ok(url.to_string())
    }
}

/// Header set sent with every results-page fetch.
pub fn default_headers() -> Vec<(String, String)> {
    [
        ("User-Agent", DEFAULT_USER_AGENT),
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
        ("Accept-Language", "en-US,en;q=0.5"),
        ("Connection", "keep-alive"),
        ("Upgrade-Insecure-Requests", "1"),
        ("Cache-Control", "max-age=0"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Builder for constructing SearchOptions with custom configuration.
#[derive(Debug, Clone)]
pub struct SearchOptionsBuilder {
    opts: SearchOptions,
}

impl SearchOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            opts: SearchOptions::default(),
        }
    }

    /// Set the marketplace origin (scheme + host).
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.opts.origin = origin.into();
        self
    }

    /// Set the affiliate tag appended to outbound links.
    pub fn affiliate_tag(mut self, tag: impl Into<String>) -> Self {
        self.opts.affiliate_tag = tag.into();
        self
    }

    /// Replace a header value, or append it if not yet present.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self
            .opts
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(slot) => slot.1 = value,
            None => self.opts.headers.push((key, value)),
        }
        self
    }

    /// Cap the number of listings read from a results page.
    pub fn max_results(mut self, max: usize) -> Self {
        self.opts.max_results = max;
        self
    }

    pub fn results_max_age(mut self, age: Duration) -> Self {
        self.opts.results_max_age = age;
        self
    }

    pub fn image_max_age(mut self, age: Duration) -> Self {
        self.opts.image_max_age = age;
        self
    }

    pub fn currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.opts.currency_symbol = symbol.into();
        self
    }

    /// Icon used when a listing has no downloadable image.
    pub fn default_icon(mut self, icon: impl Into<String>) -> Self {
        self.opts.default_icon = icon.into();
        self
    }

    pub fn build(self) -> SearchOptions {
        self.opts
    }
}

impl Default for SearchOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
