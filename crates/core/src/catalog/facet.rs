//! Facet dimensions and their membership indexes.

use serde::Serialize;
use std::collections::HashMap;

use super::GameEntry;

/// A classification dimension over catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Orientation,
    Platform,
    Genre,
    Tag,
    Series,
}

impl Facet {
    /// All dimensions, in the order the facet listing presents them.
    pub const ALL: [Facet; 5] = [
        Facet::Orientation,
        Facet::Platform,
        Facet::Genre,
        Facet::Tag,
        Facet::Series,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Facet::Orientation => "orientation",
            Facet::Platform => "platform",
            Facet::Genre => "genre",
            Facet::Tag => "tag",
            Facet::Series => "series",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Facet::Orientation => "Orientation",
            Facet::Platform => "Platform",
            Facet::Genre => "Genres",
            Facet::Tag => "Tags",
            Facet::Series => "Series",
        }
    }

    /// One-letter code used in `filters` query parameters.
    pub fn prefix(self) -> &'static str {
        match self {
            Facet::Orientation => "o",
            Facet::Platform => "p",
            Facet::Genre => "g",
            Facet::Tag => "t",
            Facet::Series => "s",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.prefix() == prefix)
    }

    /// Whether one entry may carry several values of this facet.
    pub fn is_multi_valued(self) -> bool {
        matches!(self, Facet::Genre | Facet::Tag | Facet::Series)
    }

    /// Whether the frontend may select several values at once.
    pub fn accepts_multiple_selections(self) -> bool {
        self == Facet::Tag
    }

    /// The entry's values for this facet. Single-valued facets yield
    /// exactly one element.
    pub fn values(self, entry: &GameEntry) -> &[String] {
        match self {
            Facet::Orientation => std::slice::from_ref(&entry.orientation),
            Facet::Platform => std::slice::from_ref(&entry.app_id),
            Facet::Genre => entry.genres(),
            Facet::Tag => entry.tags(),
            Facet::Series => entry.series(),
        }
    }
}

/// One option in a facet summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub name: String,
    pub count: usize,
}

/// Value -> entry ids for a single facet dimension.
///
/// Ids within a bucket keep the order in which entries were indexed.
#[derive(Debug, Clone, Default)]
pub struct FacetIndex {
    buckets: HashMap<String, Vec<String>>,
}

impl FacetIndex {
    fn insert(&mut self, value: &str, id: &str) {
        self.buckets
            .entry(value.to_string())
            .or_default()
            .push(id.to_string());
    }

    /// Entry ids carrying `value`, if any entry does.
    pub fn bucket(&self, value: &str) -> Option<&[String]> {
        self.buckets.get(value).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Every known value with its bucket size, sorted case-insensitively.
    pub fn summary(&self) -> Vec<FacetOption> {
        let mut options: Vec<FacetOption> = self
            .buckets
            .iter()
            .map(|(name, ids)| FacetOption {
                name: name.clone(),
                count: ids.len(),
            })
            .collect();
        options.sort_by_cached_key(|o| (o.name.to_lowercase(), o.name.clone()));
        options
    }
}

/// The five facet indexes, built together in a single pass.
#[derive(Debug, Clone, Default)]
pub struct FacetIndexes {
    // positioned by `Facet as usize`
    indexes: [FacetIndex; 5],
}

impl FacetIndexes {
    pub fn build<'a>(entries: impl IntoIterator<Item = &'a GameEntry>) -> Self {
        let mut built = Self::default();

        for entry in entries {
            for facet in Facet::ALL {
                let index = &mut built.indexes[facet as usize];
                for value in facet.values(entry) {
                    index.insert(value, entry.id());
                }
            }
        }

        built
    }

    pub fn get(&self, facet: Facet) -> &FacetIndex {
        &self.indexes[facet as usize]
    }
}
