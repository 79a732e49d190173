//! Launch history: who launched what, when it stopped, and how often
//! each game has been played.

mod sqlite;
mod store;

pub use sqlite::SqliteLaunchStore;
pub use store::{LaunchCount, LaunchRecord, LaunchStore, LaunchStoreError};
