//! Game catalog - the in-memory list of launchable titles.
//!
//! The catalog is loaded once at startup from a YAML list of records and
//! never changes afterwards. Each entry is indexed under five facets
//! (orientation, platform, genre, tag, series) so the frontend can list
//! filter options with counts, and queries combine a title search with
//! per-facet filters.
//!
//! # Example
//!
//! ```ignore
//! use cabinet_core::catalog::{Catalog, Facet, GameQuery};
//!
//! let catalog = Catalog::load(Path::new("games.yaml"))?;
//!
//! let query = GameQuery::new()
//!     .with_search("street")
//!     .with_filter(Facet::Genre, "fighting");
//! for game in catalog.query(&query) {
//!     println!("{} ({})", game.title(), game.id());
//! }
//! ```

mod entry;
mod facet;
mod query;

pub use entry::*;
pub use facet::*;
pub use query::*;

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::metrics::{CATALOG_QUERIES_TOTAL, CATALOG_QUERY_RESULTS};

/// Errors raised while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },

    #[error("Invalid catalog entry: {0}")]
    Validation(String),
}

/// Filter options for one facet, as listed to the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct FacetListing {
    pub id: &'static str,
    pub label: &'static str,
    pub options: Vec<FacetOption>,
    pub prefix: &'static str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

/// Read-only set of game entries plus their facet indexes.
///
/// Safe to share across request handlers behind an `Arc`; nothing mutates
/// it after construction.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<GameEntry>,
    by_id: HashMap<String, usize>,
    facets: FacetIndexes,
}

impl Catalog {
    /// Build a catalog from validated entries.
    ///
    /// A later entry with an already-seen id replaces the earlier one in
    /// place.
    pub fn from_entries(entries: impl IntoIterator<Item = GameEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            match catalog.by_id.get(entry.id()) {
                Some(&pos) => catalog.entries[pos] = entry,
                None => {
                    catalog
                        .by_id
                        .insert(entry.id().to_string(), catalog.entries.len());
                    catalog.entries.push(entry);
                }
            }
        }
        catalog.facets = FacetIndexes::build(&catalog.entries);
        catalog
    }

    /// Validate raw records and build a catalog from them.
    ///
    /// The first invalid record aborts the whole load.
    pub fn from_records(records: Vec<GameRecord>) -> Result<Self, CatalogError> {
        let entries = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                GameEntry::from_record(record).map_err(|e| match e {
                    CatalogError::Validation(msg) => {
                        CatalogError::Validation(format!("record {}: {}", i, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_entries(entries))
    }

    /// Load the catalog from a YAML file holding a list of game records.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let records = parse_records(&contents, &path.display().to_string())?;

        let catalog = Self::from_records(records)?;
        info!(
            "Loaded {} games from {:?} ({} platforms, {} genres, {} tags, {} series)",
            catalog.len(),
            path,
            catalog.facets.get(Facet::Platform).len(),
            catalog.facets.get(Facet::Genre).len(),
            catalog.facets.get(Facet::Tag).len(),
            catalog.facets.get(Facet::Series).len(),
        );
        Ok(catalog)
    }

    /// Parse a YAML catalog held in memory (useful for testing)
    pub fn load_from_str(yaml: &str) -> Result<Self, CatalogError> {
        Self::from_records(parse_records(yaml, "<string>")?)
    }

    pub fn get(&self, id: &str) -> Option<&GameEntry> {
        self.by_id.get(id).map(|&pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in load order.
    pub fn entries(&self) -> impl Iterator<Item = &GameEntry> {
        self.entries.iter()
    }

    pub fn facet_index(&self, facet: Facet) -> &FacetIndex {
        self.facets.get(facet)
    }

    /// Values of one facet with their entry counts, sorted by name
    /// ignoring case.
    pub fn facet_summary(&self, facet: Facet) -> Vec<FacetOption> {
        self.facets.get(facet).summary()
    }

    /// Filter options for every facet, in listing order.
    pub fn facets(&self) -> Vec<FacetListing> {
        Facet::ALL
            .into_iter()
            .map(|facet| FacetListing {
                id: facet.id(),
                label: facet.label(),
                options: self.facet_summary(facet),
                prefix: facet.prefix(),
                kind: facet.accepts_multiple_selections().then_some("multi"),
            })
            .collect()
    }

    /// Entries matching the query, sorted by title ignoring case.
    ///
    /// Ties keep load order.
    pub fn query(&self, query: &GameQuery) -> Vec<&GameEntry> {
        let mut games: Vec<&GameEntry> = if query.is_unconstrained() {
            self.entries.iter().collect()
        } else {
            let matcher = query.matcher();
            self.entries.iter().filter(|e| matcher.matches(e)).collect()
        };
        games.sort_by_cached_key(|e| e.title().to_lowercase());

        CATALOG_QUERIES_TOTAL.inc();
        CATALOG_QUERY_RESULTS.observe(games.len() as f64);
        games
    }
}

fn parse_records(yaml: &str, path: &str) -> Result<Vec<GameRecord>, CatalogError> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yml::from_str(yaml).map_err(|e| CatalogError::Parse {
        path: path.to_string(),
        source: e,
    })
}
