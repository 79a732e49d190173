//! Testing utilities and mock implementations.
//!
//! [`MockGateway`] stands in for the game server so the HTTP surface can be
//! exercised without ssh or real hardware.
//!
//! # Example
//!
//! ```rust,ignore
//! use cabinet_core::testing::{fixtures, MockGateway};
//!
//! let gateway = MockGateway::new();
//! gateway.set_launch_outcome(LaunchOutcome::failure(1, "rom missing")).await;
//!
//! let catalog = fixtures::catalog();
//! // Use in AppState...
//! ```

mod mock_gateway;

pub use mock_gateway::MockGateway;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{Catalog, GameEntry, GameRecord};

    /// A small catalog covering every facet.
    pub const CATALOG_YAML: &str = r#"
- app_id: fbneo
  title_id: sf2
  title: Street Fighter II
  tags: [capcom, cps1]
  genres: [fighting]
  series: [Street Fighter]
- app_id: fbneo
  title_id: pacman
  title: Pac-Man
  genres: [maze]
  orientation: vertical
- app_id: mame
  title_id: galaga
  title: Galaga
  tags: [namco]
  genres: [shooter]
  orientation: vertical
  extra_args: -nofilter
- app_id: fbneo
  title_id: mslug
  title: Metal Slug
  tags: [co-op, neogeo]
  genres: [run-and-gun]
  series: [Metal Slug]
"#;

    /// The catalog described by [`CATALOG_YAML`].
    pub fn catalog() -> Catalog {
        Catalog::load_from_str(CATALOG_YAML).expect("fixture catalog is valid")
    }

    /// A minimal entry with the given ids and title.
    pub fn game_entry(app_id: &str, title_id: &str, title: &str) -> GameEntry {
        GameEntry::from_record(GameRecord {
            app_id: Some(app_id.to_string()),
            title_id: Some(title_id.to_string()),
            title: Some(title.to_string()),
            ..Default::default()
        })
        .expect("fixture entry is valid")
    }
}
