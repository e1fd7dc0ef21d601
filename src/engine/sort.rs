//! Ordering of merged results.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::artwork::Artwork;

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{4}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Keep the aggregator's order: dispatch order, then each source's own order.
    #[default]
    Relevance,
    DateAsc,
    DateDesc,
    Title,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::DateAsc => "date_asc",
            SortBy::DateDesc => "date_desc",
            SortBy::Title => "title",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown sort order: {0:?} (expected relevance, date_asc, date_desc or title)")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortBy {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SortBy::Relevance),
            "date_asc" => Ok(SortBy::DateAsc),
            "date_desc" => Ok(SortBy::DateDesc),
            "title" => Ok(SortBy::Title),
            other => Err(UnknownSortOrder(other.to_string())),
        }
    }
}

/// First run of four ASCII digits in a free-text date, read as a year.
///
/// "c. 1915–1926" gives 1915, "4th century BC" gives nothing, and so does
/// anything else without a literal four-digit run. A dimension-like string
/// that happens to contain one will still match.
pub fn extract_year(date: &str) -> Option<u32> {
    YEAR.find(date).and_then(|m| m.as_str().parse().ok())
}

/// Sort key approximating locale-aware collation: letters compare without
/// regard to case or accents first, then accents, then lowercase before
/// uppercase.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct TitleKey {
    primary: String,
    accents: String,
    case: Vec<bool>,
}

impl TitleKey {
    fn new(title: &str) -> Self {
        let decomposed: String = title.nfd().collect();
        let primary = decomposed
            .chars()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect();
        let accents = decomposed.chars().flat_map(char::to_lowercase).collect();
        let case = title.chars().map(char::is_uppercase).collect();
        Self {
            primary,
            accents,
            case,
        }
    }
}

/// Compare two titles the way [`SortBy::Title`] orders them.
///
/// Not full ICU collation: spaces and punctuation count as ordinary
/// characters, so "Apple pie" sorts before "Applepie".
pub fn compare_titles(a: &str, b: &str) -> std::cmp::Ordering {
    TitleKey::new(a).cmp(&TitleKey::new(b))
}

/// Order `artworks` by `sort_by`. Stable: equal keys keep their input order.
pub fn sort(artworks: Vec<Artwork>, sort_by: SortBy) -> Vec<Artwork> {
    match sort_by {
        SortBy::Relevance => artworks,
        SortBy::Title => sort_by_key(artworks, |a| TitleKey::new(&a.title), false),
        SortBy::DateAsc => sort_by_key(artworks, |a| extract_year(&a.date), false),
        // None < Some, so missing years end up last when descending
        SortBy::DateDesc => sort_by_key(artworks, |a| extract_year(&a.date), true),
    }
}

fn sort_by_key<K: Ord>(
    artworks: Vec<Artwork>,
    key: impl Fn(&Artwork) -> K,
    descending: bool,
) -> Vec<Artwork> {
    let mut keyed: Vec<(K, Artwork)> = artworks.into_iter().map(|a| (key(&a), a)).collect();
    if descending {
        keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
    } else {
        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
    keyed.into_iter().map(|(_, a)| a).collect()
}
