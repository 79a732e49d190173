use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchStoreError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for LaunchStoreError {
    fn from(e: rusqlite::Error) -> Self {
        LaunchStoreError::Database(e.to_string())
    }
}

/// One game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchRecord {
    pub id: i64,
    /// Identity that requested the launch.
    pub user_id: String,
    /// Catalog id (`app_id:title_id`).
    pub entry_id: String,
    pub app_id: String,
    pub launched_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
}

impl LaunchRecord {
    pub fn is_running(&self) -> bool {
        self.stopped_at.is_none()
    }
}

/// How many times a game has been launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchCount {
    pub entry_id: String,
    pub count: u64,
}

/// Trait for launch history storage
pub trait LaunchStore: Send + Sync {
    /// Record a new launch starting now.
    fn start_launch(
        &self,
        user_id: &str,
        entry_id: &str,
        app_id: &str,
    ) -> Result<LaunchRecord, LaunchStoreError>;

    /// Mark the most recent launch as stopped.
    ///
    /// Returns `None` when there is no launch or it was already stopped.
    fn end_latest(&self) -> Result<Option<LaunchRecord>, LaunchStoreError>;

    /// The most recent launch, stopped or not.
    fn latest(&self) -> Result<Option<LaunchRecord>, LaunchStoreError>;

    /// Up to `limit` launches, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<LaunchRecord>, LaunchStoreError>;

    /// Bump the play count of a game, returning the new count.
    fn increment_count(&self, entry_id: &str) -> Result<u64, LaunchStoreError>;

    fn count_for(&self, entry_id: &str) -> Result<u64, LaunchStoreError>;

    /// Most played games first; ties by entry id.
    fn top_counts(&self, limit: usize) -> Result<Vec<LaunchCount>, LaunchStoreError>;
}
