//! Search-and-filter queries over the catalog.

use std::collections::{BTreeMap, BTreeSet};

use super::{Facet, GameEntry};

/// Requested values grouped by one-letter facet prefix.
///
/// Keys are kept as strings so that unknown prefixes survive parsing; they
/// are ignored when matching.
pub type FilterMap = BTreeMap<String, BTreeSet<String>>;

/// Parse a `filters` parameter such as `g:fighting,t:co-op,t:neogeo`.
///
/// Each comma-separated token is split on its first colon into
/// `(prefix, value)`. Empty tokens and tokens without a colon are skipped.
pub fn parse_filter_param(param: &str) -> FilterMap {
    let mut filters = FilterMap::new();
    for token in param.split(',') {
        match token.split_once(':') {
            Some((prefix, value)) => {
                filters
                    .entry(prefix.to_string())
                    .or_default()
                    .insert(value.to_string());
            }
            None if token.is_empty() => {}
            None => tracing::debug!(token, "Ignoring filter token without prefix"),
        }
    }
    filters
}

/// A title search combined with facet filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameQuery {
    /// Case-insensitive substring of the title; empty matches everything.
    pub search: String,
    pub filters: FilterMap,
}

impl GameQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from raw `search` and `filters` request parameters.
    pub fn from_params(search: Option<&str>, filters: Option<&str>) -> Self {
        Self {
            search: search.unwrap_or_default().to_string(),
            filters: filters.map(parse_filter_param).unwrap_or_default(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, facet: Facet, value: impl Into<String>) -> Self {
        self.filters
            .entry(facet.prefix().to_string())
            .or_default()
            .insert(value.into());
        self
    }

    /// True when neither a search nor any filter was given.
    pub fn is_unconstrained(&self) -> bool {
        self.search.is_empty() && self.filters.is_empty()
    }

    pub(super) fn matcher(&self) -> QueryMatcher<'_> {
        QueryMatcher {
            search: self.search.to_lowercase(),
            filters: self
                .filters
                .iter()
                .filter_map(|(prefix, values)| {
                    Facet::from_prefix(prefix).map(|facet| (facet, values))
                })
                .collect(),
        }
    }
}

/// A query prepared for evaluation against many entries.
pub(super) struct QueryMatcher<'q> {
    search: String,
    filters: Vec<(Facet, &'q BTreeSet<String>)>,
}

impl QueryMatcher<'_> {
    /// Title match AND every recognised facet filter.
    pub(super) fn matches(&self, entry: &GameEntry) -> bool {
        if !self.search.is_empty() && !entry.title().to_lowercase().contains(&self.search) {
            return false;
        }

        self.filters
            .iter()
            .all(|(facet, requested)| facet_matches(*facet, requested, entry))
    }
}

/// Multi-valued facets need every requested value on the entry.
/// Single-valued facets need the requested set to equal the entry's
/// one value, so asking for two values never matches.
fn facet_matches(facet: Facet, requested: &BTreeSet<String>, entry: &GameEntry) -> bool {
    let values = facet.values(entry);
    if facet.is_multi_valued() {
        requested.iter().all(|v| values.contains(v))
    } else {
        requested.len() == 1 && values.iter().all(|v| requested.contains(v))
    }
}
