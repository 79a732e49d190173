//! Catalog entries: one immutable record per game title.

use serde::{Deserialize, Serialize};

use super::CatalogError;

/// App id assumed when a record does not name one.
pub const DEFAULT_APP_ID: &str = "fbneo";

/// Orientation assumed when a record does not name one.
pub const DEFAULT_ORIENTATION: &str = "landscape";

/// A game as written in the catalog file, before defaults are applied.
///
/// Unknown keys are ignored, and so is any `id` key: the identifier is
/// always derived from `app_id` and `title_id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub title_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub series: Option<Vec<String>>,
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub extra_args: Option<String>,
}

/// A validated catalog entry.
///
/// Serializes with every empty field omitted, which is the shape the web
/// frontend expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEntry {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(super) id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(super) title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(super) app_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(super) title_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(super) tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(super) genres: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(super) series: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(super) orientation: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(super) extra_args: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(super) filters: Vec<String>,
}

/// Build the `"{app_id}:{title_id}"` identifier.
pub fn entry_id(app_id: &str, title_id: &str) -> String {
    format!("{}:{}", app_id, title_id)
}

impl GameEntry {
    /// Apply defaults to a raw record and validate it.
    ///
    /// Fails when `title_id` is missing or empty. A missing title falls
    /// back to the title id.
    pub fn from_record(record: GameRecord) -> Result<Self, CatalogError> {
        let title_id = record
            .title_id
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CatalogError::Validation("missing required field title_id".into()))?;

        let app_id = record
            .app_id
            .unwrap_or_else(|| DEFAULT_APP_ID.to_string());
        let title = record
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| title_id.clone());
        let tags = record.tags.unwrap_or_default();
        let genres = record.genres.unwrap_or_default();
        let series = record.series.unwrap_or_default();
        let orientation = record
            .orientation
            .unwrap_or_else(|| DEFAULT_ORIENTATION.to_string());

        let filters = tags
            .iter()
            .map(|v| format!("t:{}", v))
            .chain(genres.iter().map(|v| format!("g:{}", v)))
            .chain(series.iter().map(|v| format!("s:{}", v)))
            .chain(std::iter::once(format!("o:{}", orientation)))
            .collect();

        Ok(Self {
            id: entry_id(&app_id, &title_id),
            title,
            app_id,
            title_id,
            tags,
            genres,
            series,
            orientation,
            extra_args: record.extra_args.unwrap_or_default(),
            filters,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Code handed to the remote launcher.
    pub fn title_id(&self) -> &str {
        &self.title_id
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn series(&self) -> &[String] {
        &self.series
    }

    pub fn orientation(&self) -> &str {
        &self.orientation
    }

    pub fn extra_args(&self) -> &str {
        &self.extra_args
    }

    /// Every facet membership as prefixed tokens (`t:`, `g:`, `s:`, `o:`).
    ///
    /// Informational only; queries go through the per-facet rules.
    pub fn filters(&self) -> &[String] {
        &self.filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title_id: &str) -> GameRecord {
        GameRecord {
            title_id: Some(title_id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let entry = GameEntry::from_record(record("sf2")).unwrap();

        assert_eq!(entry.app_id(), "fbneo");
        assert_eq!(entry.id(), "fbneo:sf2");
        assert_eq!(entry.title(), "sf2");
        assert!(entry.tags().is_empty());
        assert!(entry.genres().is_empty());
        assert!(entry.series().is_empty());
        assert_eq!(entry.orientation(), "landscape");
        assert_eq!(entry.extra_args(), "");
        assert_eq!(entry.filters(), &["o:landscape".to_string()]);
    }

    #[test]
    fn test_identifier_matches_sub_fields() {
        let entry = GameEntry::from_record(GameRecord {
            app_id: Some("mame".to_string()),
            title_id: Some("galaga".to_string()),
            title: Some("Galaga".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(entry.id(), entry_id(entry.app_id(), entry.title_id()));
        assert_eq!(entry.id(), "mame:galaga");
    }

    #[test]
    fn test_missing_title_id_is_rejected() {
        let result = GameEntry::from_record(GameRecord {
            title: Some("Nameless".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(CatalogError::Validation(_))));

        let result = GameEntry::from_record(record(""));
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_filter_tokens_in_facet_order() {
        let entry = GameEntry::from_record(GameRecord {
            title_id: Some("mslug".to_string()),
            tags: Some(vec!["co-op".to_string(), "neogeo".to_string()]),
            genres: Some(vec!["run-and-gun".to_string()]),
            series: Some(vec!["Metal Slug".to_string()]),
            orientation: Some("landscape".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            entry.filters(),
            &[
                "t:co-op".to_string(),
                "t:neogeo".to_string(),
                "g:run-and-gun".to_string(),
                "s:Metal Slug".to_string(),
                "o:landscape".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_omits_empty_fields() {
        let entry = GameEntry::from_record(GameRecord {
            title_id: Some("pacman".to_string()),
            title: Some("Pac-Man".to_string()),
            genres: Some(vec!["maze".to_string()]),
            orientation: Some("vertical".to_string()),
            ..Default::default()
        })
        .unwrap();

        let json = serde_json::to_value(&entry).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["id"], "fbneo:pacman");
        assert_eq!(obj["title"], "Pac-Man");
        assert_eq!(obj["app_id"], "fbneo");
        assert_eq!(obj["title_id"], "pacman");
        assert_eq!(obj["genres"], serde_json::json!(["maze"]));
        assert_eq!(obj["orientation"], "vertical");
        assert_eq!(obj["filters"], serde_json::json!(["g:maze", "o:vertical"]));
        assert!(!obj.contains_key("series"));
        assert!(!obj.contains_key("tags"));
        assert!(!obj.contains_key("extra_args"));
    }

    #[test]
    fn test_render_keeps_non_empty_series() {
        let entry = GameEntry::from_record(GameRecord {
            title_id: Some("sf2".to_string()),
            series: Some(vec!["Street Fighter".to_string()]),
            extra_args: Some("-autofire".to_string()),
            ..Default::default()
        })
        .unwrap();

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["series"], serde_json::json!(["Street Fighter"]));
        assert_eq!(json["extra_args"], "-autofire");
    }

    #[test]
    fn test_record_ignores_supplied_id() {
        let record: GameRecord =
            serde_yml::from_str("id: bogus\ntitle_id: dkong\napp_id: mame\n").unwrap();
        let entry = GameEntry::from_record(record).unwrap();
        assert_eq!(entry.id(), "mame:dkong");
    }
}
