//! Trait definitions for the gateway module.

use async_trait::async_trait;

use super::error::GatewayError;
use super::types::{ClientLaunchResult, LaunchOutcome, ServerStatus};
use crate::catalog::GameEntry;

/// Starts, stops and inspects emulator sessions on the game server.
///
/// Request handlers resolve the entry from the catalog first; the gateway
/// never looks anything up itself.
#[async_trait]
pub trait LaunchGateway: Send + Sync {
    /// Returns the name of this gateway implementation.
    fn name(&self) -> &str;

    /// Launch the given game. A non-zero exit code is reported in the
    /// outcome, not as an error.
    async fn launch(&self, entry: &GameEntry) -> Result<LaunchOutcome, GatewayError>;

    /// Stop whatever is running.
    async fn stop(&self) -> Result<(), GatewayError>;

    /// Ask the game server what is running and at what volume.
    async fn status(&self) -> Result<ServerStatus, GatewayError>;

    /// Set the output volume (0-100); returns the volume the server reports.
    async fn set_volume(&self, volume: u8) -> Result<Option<u8>, GatewayError>;

    /// Start the display client on every configured host.
    ///
    /// Failures are reported per host and never abort the others.
    async fn launch_clients(&self) -> Vec<ClientLaunchResult>;
}
