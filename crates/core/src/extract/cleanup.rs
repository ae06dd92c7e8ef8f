// ABOUTME: Title cleanup for listing text: sponsorship detection and ad boilerplate removal.
// ABOUTME: Boilerplate is stripped whether or not the listing is sponsored.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::collapse_whitespace;

static SPONSORED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[?Sponsored\]?").unwrap());

/// Ad disclosure and feedback link text that leaks into the title container.
static AD_BOILERPLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"You[’']re seeing this ad based on the product[’']s relevance to your search query\.?|Leave ad feedback",
    )
    .unwrap()
});

static MERCH_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(?:New|Limited Time|Sale|Deal|Prime)\]").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanTitle {
    pub title: String,
    pub sponsored: bool,
}

/// Detects the sponsorship marker and strips it together with ad boilerplate
/// and merchandising tags.
pub fn clean_title(raw: &str) -> CleanTitle {
    let collapsed = collapse_whitespace(raw);
    let sponsored = SPONSORED_RE.is_match(&collapsed);

    let without_marker = SPONSORED_RE.replace_all(&collapsed, " ");
    let without_boilerplate = AD_BOILERPLATE_RE.replace_all(&without_marker, " ");
    let without_tags = MERCH_TAG_RE.replace_all(&without_boilerplate, " ");

    CleanTitle {
        title: collapse_whitespace(&without_tags),
        sponsored,
    }
}
