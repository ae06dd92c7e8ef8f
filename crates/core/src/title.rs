// ABOUTME: Rule-based shortening of long marketing titles into compact display labels.
// ABOUTME: Keeps brand, up to five core words, color, and pack quantity.

use once_cell::sync::Lazy;
use regex::Regex;

const MAX_CORE_WORDS: usize = 5;

/// Quantity patterns in priority order; capture group 1 is the count.
static QUANTITY_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:pack|set) of\s+(\d+)\b",
        r"(?i)\b(\d+)(?:-|\s+)?pack\b",
        r"(?i)\b(\d+)(?:-|\s+)?piece\b",
        r"(?i)\b(\d+)(?:-|\s+)?count\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\bin\s+|,\s*)?\b(rose gold|black|white|red|blue|green|yellow|purple|pink|brown|grey|gray|gold|silver|navy|beige|transparent|clear)\b(?:\s+color\b)?",
    )
    .unwrap()
});

/// Words that carry no identifying information.
const FILLERS: &[&str] = &[
    "with", "for", "and", "or", "the", "in", "on", "at", "by", "of", "premium", "new", "hot",
    "best", "latest", "100%", "high-quality", "professional",
];

/// Pieces recognized in a title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleParts {
    pub brand: Option<String>,
    pub core: Vec<String>,
    pub color: Option<String>,
    pub quantity: Option<String>,
}

impl TitleParts {
    /// Brand, core, color, and quantity joined in that order, skipping absent parts.
    pub fn render(&self) -> String {
        let core = (!self.core.is_empty()).then(|| self.core.join(" "));
        [self.brand.clone(), core, self.color.clone(), self.quantity.clone()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Splits a title into brand, core descriptor, color, and quantity.
pub fn title_parts(title: &str) -> TitleParts {
    let mut working = title.to_string();

    let quantity = take_quantity(&mut working);
    let color = take_color(&mut working);

    // Removing color and quantity spans can strand separators like ",".
    let mut words = working
        .split_whitespace()
        .map(|w| w.trim_end_matches(','))
        .filter(|w| w.chars().any(char::is_alphanumeric));
    let brand = words.next().map(str::to_string);
    let core = words
        .filter(|w| !is_filler(w) && !is_parenthesized(w))
        .take(MAX_CORE_WORDS)
        .map(str::to_string)
        .collect();

    TitleParts {
        brand,
        core,
        color,
        quantity,
    }
}

/// Shortens a title for display. Never fails; unrecognized pieces are omitted.
pub fn shorten_title(title: &str) -> String {
    title_parts(title).render()
}

fn take_quantity(working: &mut String) -> Option<String> {
    for re in QUANTITY_RES.iter() {
        let found = re.captures(working).and_then(|caps| {
            let span = caps.get(0)?.range();
            let count = caps.get(1)?.as_str().to_string();
            Some((span, count))
        });
        if let Some((span, count)) = found {
            working.replace_range(span, " ");
            return Some(format!("({count}pk)"));
        }
    }
    None
}

fn take_color(working: &mut String) -> Option<String> {
    let (span, color) = {
        let caps = COLOR_RE.captures(working)?;
        (caps.get(0)?.range(), title_case(caps.get(1)?.as_str()))
    };
    working.replace_range(span, " ");
    Some(color)
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn is_filler(word: &str) -> bool {
    FILLERS.iter().any(|f| f.eq_ignore_ascii_case(word))
}

fn is_parenthesized(word: &str) -> bool {
    word.len() >= 2 && word.starts_with('(') && word.ends_with(')')
}
