//! Mock launch gateway for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::GameEntry;
use crate::gateway::{
    ClientLaunchResult, GatewayError, LaunchGateway, LaunchOutcome, ServerStatus, MAX_VOLUME,
};

/// Mock implementation of the LaunchGateway trait.
///
/// Behaves like a single game server: a successful launch makes the game
/// the running one, a stop clears it, and the volume is remembered.
/// Launches and stops are recorded for assertions.
#[derive(Debug)]
pub struct MockGateway {
    /// Ids of every entry passed to `launch`.
    launches: Arc<RwLock<Vec<String>>>,
    stops: Arc<RwLock<usize>>,
    running: Arc<RwLock<Option<String>>>,
    volume: Arc<RwLock<u8>>,
    /// Returned by the next launches; success by default.
    launch_outcome: Arc<RwLock<LaunchOutcome>>,
    client_hosts: Arc<RwLock<Vec<String>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<GatewayError>>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            launches: Arc::new(RwLock::new(Vec::new())),
            stops: Arc::new(RwLock::new(0)),
            running: Arc::new(RwLock::new(None)),
            volume: Arc::new(RwLock::new(50)),
            launch_outcome: Arc::new(RwLock::new(LaunchOutcome::success(""))),
            client_hosts: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Ids of launched entries, oldest first.
    pub async fn recorded_launches(&self) -> Vec<String> {
        self.launches.read().await.clone()
    }

    pub async fn stop_count(&self) -> usize {
        *self.stops.read().await
    }

    pub async fn running(&self) -> Option<String> {
        self.running.read().await.clone()
    }

    /// Pretend a game was started outside the gateway.
    pub async fn set_running(&self, entry_id: Option<&str>) {
        *self.running.write().await = entry_id.map(str::to_string);
    }

    pub async fn set_launch_outcome(&self, outcome: LaunchOutcome) {
        *self.launch_outcome.write().await = outcome;
    }

    /// Hosts reported by `launch_clients`, all successful.
    pub async fn set_client_hosts(&self, hosts: &[&str]) {
        *self.client_hosts.write().await = hosts.iter().map(|h| h.to_string()).collect();
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: GatewayError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Result<(), GatewayError> {
        match self.next_error.write().await.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LaunchGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn launch(&self, entry: &GameEntry) -> Result<LaunchOutcome, GatewayError> {
        self.take_error().await?;
        self.launches.write().await.push(entry.id().to_string());

        let outcome = self.launch_outcome.read().await.clone();
        if outcome.is_success() {
            *self.running.write().await = Some(entry.id().to_string());
        }
        Ok(outcome)
    }

    async fn stop(&self) -> Result<(), GatewayError> {
        self.take_error().await?;
        *self.stops.write().await += 1;
        *self.running.write().await = None;
        Ok(())
    }

    async fn status(&self) -> Result<ServerStatus, GatewayError> {
        self.take_error().await?;
        Ok(ServerStatus {
            entry_id: self.running.read().await.clone(),
            volume: Some(*self.volume.read().await),
        })
    }

    async fn set_volume(&self, volume: u8) -> Result<Option<u8>, GatewayError> {
        if volume > MAX_VOLUME {
            return Err(GatewayError::InvalidVolume(volume));
        }
        self.take_error().await?;
        *self.volume.write().await = volume;
        Ok(Some(volume))
    }

    async fn launch_clients(&self) -> Vec<ClientLaunchResult> {
        self.client_hosts
            .read()
            .await
            .iter()
            .map(|host| ClientLaunchResult {
                host: host.clone(),
                success: true,
                error: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_launch_and_stop_track_running_game() {
        let gateway = MockGateway::new();
        let entry = fixtures::game_entry("fbneo", "sf2", "Street Fighter II");

        let outcome = gateway.launch(&entry).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(gateway.running().await.as_deref(), Some("fbneo:sf2"));
        assert!(gateway.status().await.unwrap().is_running());

        gateway.stop().await.unwrap();
        assert_eq!(gateway.stop_count().await, 1);
        assert!(!gateway.status().await.unwrap().is_running());
        assert_eq!(gateway.recorded_launches().await, vec!["fbneo:sf2"]);
    }

    #[tokio::test]
    async fn test_failed_launch_leaves_nothing_running() {
        let gateway = MockGateway::new();
        gateway
            .set_launch_outcome(LaunchOutcome::failure(2, "rom missing"))
            .await;

        let entry = fixtures::game_entry("fbneo", "sf2", "Street Fighter II");
        let outcome = gateway.launch(&entry).await.unwrap();
        assert_eq!(outcome.exit_code, 2);
        assert!(gateway.running().await.is_none());
    }

    #[tokio::test]
    async fn test_next_error_applies_once() {
        let gateway = MockGateway::new();
        gateway
            .set_next_error(GatewayError::Timeout { timeout_secs: 30 })
            .await;

        assert!(gateway.status().await.is_err());
        assert!(gateway.status().await.is_ok());
    }

    #[tokio::test]
    async fn test_volume() {
        let gateway = MockGateway::new();
        assert_eq!(gateway.set_volume(80).await.unwrap(), Some(80));
        assert_eq!(gateway.status().await.unwrap().volume, Some(80));
        assert!(matches!(
            gateway.set_volume(120).await,
            Err(GatewayError::InvalidVolume(120))
        ));
    }
}
